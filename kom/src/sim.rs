//! Frame-driven simulation.
//!
//! The whole state of a running simulation is the [`Sim`] value. The host
//! calls [`step()`] once per frame with the elapsed time, so the same code runs
//! under a render loop, a timer or a test.
//!
//! ```
//! use kom::{sim::*, FourBar};
//!
//! let mut sim = Sim::new(FourBar::example(), 30.);
//! for _ in 0..200 {
//!     sim = step(sim, 1. / 60.);
//! }
//! assert_eq!(sim.history.len(), HISTORY_CAP);
//! ```
use crate::{omega, FourBar, GearTrain, SliderCrank};
use std::collections::VecDeque;

/// Capacity of the history window.
pub const HISTORY_CAP: usize = 100;

/// A bounded FIFO buffer, the oldest entry is dropped on overflow.
#[derive(Clone, Debug, PartialEq)]
pub struct History<T> {
    buf: VecDeque<T>,
    cap: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> History<T> {
    /// Create a new buffer with [`HISTORY_CAP`].
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAP)
    }

    /// Create a new buffer with a capacity, at least one.
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.max(1);
        Self { buf: VecDeque::with_capacity(cap), cap }
    }

    /// Append a value, return the evicted value if the buffer is full.
    pub fn push(&mut self, v: T) -> Option<T> {
        let evicted = if self.buf.len() == self.cap {
            self.buf.pop_front()
        } else {
            None
        };
        self.buf.push_back(v);
        evicted
    }

    /// Capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Number of the values.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Return true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The oldest value.
    pub fn first(&self) -> Option<&T> {
        self.buf.front()
    }

    /// The latest value.
    pub fn last(&self) -> Option<&T> {
        self.buf.back()
    }

    /// Iterate from the oldest to the latest value.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.buf.iter()
    }

    /// Remove all values.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Copy out the values from the oldest to the latest.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.buf.iter().cloned().collect()
    }
}

impl<'a, T> IntoIterator for &'a History<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}

/// Driver state, the input angle advanced by the crank speed.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Driver {
    /// Input angle (rad)
    pub angle: f64,
    /// Input speed (rpm)
    pub rpm: f64,
    /// Elapsed time (s)
    pub time: f64,
}

impl Driver {
    /// Create a driver at zero angle.
    pub const fn new(rpm: f64) -> Self {
        Self { angle: 0., rpm, time: 0. }
    }

    /// Angular velocity (rad/s).
    pub fn omega(&self) -> f64 {
        omega(self.rpm)
    }

    /// Advance by a time step.
    ///
    /// There is no re-stabilization, a long step makes a large jump.
    /// Negative or non-finite steps count as zero.
    pub fn advance(self, dt: f64) -> Self {
        let dt = if dt.is_finite() { dt.max(0.) } else { 0. };
        Self {
            angle: self.angle + self.omega() * dt,
            time: self.time + dt,
            ..self
        }
    }
}

/// A mechanism that can be sampled by a [`Driver`].
pub trait Simulate {
    /// The recorded value of a frame.
    type Sample: Record + Clone + std::fmt::Debug;

    /// Sample the mechanism at the driver state.
    ///
    /// The `prev` value is the latest recorded sample. Return `None` if the
    /// mechanism has no valid position in this frame.
    fn sample(&self, driver: &Driver, prev: Option<&Self::Sample>) -> Option<Self::Sample>;
}

/// A recorded sample with named values.
pub trait Record {
    /// Time of the sample (s).
    fn time(&self) -> f64;
    /// Named values except the time.
    fn fields(&self) -> Vec<(&'static str, f64)>;
}

/// Simulation state.
#[derive(Clone, Debug)]
pub struct Sim<M: Simulate> {
    /// The mechanism
    pub mech: M,
    /// The driver
    pub driver: Driver,
    /// Recent samples
    pub history: History<M::Sample>,
}

impl<M: Simulate> Sim<M> {
    /// Create a new simulation at zero angle.
    pub fn new(mech: M, rpm: f64) -> Self {
        Self { mech, driver: Driver::new(rpm), history: History::new() }
    }

    /// Advance one frame, see [`step()`].
    pub fn step(self, dt: f64) -> Self {
        step(self, dt)
    }

    /// Sample the current driver state without recording it.
    pub fn current(&self) -> Option<M::Sample> {
        self.mech.sample(&self.driver, self.history.last())
    }
}

impl Sim<SliderCrank> {
    /// Create a new simulation driven at the speed of the mechanism.
    pub fn slider_crank(sc: SliderCrank) -> Self {
        let rpm = sc.rpm;
        Self::new(sc, rpm)
    }
}

/// Advance a simulation by `dt` seconds and record the new frame.
///
/// The frames without a valid position are not recorded.
pub fn step<M: Simulate>(mut sim: Sim<M>, dt: f64) -> Sim<M> {
    sim.driver = sim.driver.advance(dt);
    match sim.mech.sample(&sim.driver, sim.history.last()) {
        Some(sample) => {
            sim.history.push(sample);
        }
        None => tracing::trace!(
            angle = sim.driver.angle,
            time = sim.driver.time,
            "mechanism has no position"
        ),
    }
    sim
}

/// Sample of a four-bar linkage, the coupler end.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FourBarSample {
    /// Time (s)
    pub time: f64,
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// X velocity, finite difference from the previous sample
    pub vx: f64,
    /// Y velocity, finite difference from the previous sample
    pub vy: f64,
}

impl Simulate for FourBar {
    type Sample = FourBarSample;

    fn sample(&self, driver: &Driver, prev: Option<&Self::Sample>) -> Option<Self::Sample> {
        let [_, [x, y]] = self.solve(driver.angle).closed()?;
        let time = driver.time;
        let [vx, vy] = match prev {
            Some(p) if time > p.time => {
                let dt = time - p.time;
                [(x - p.x) / dt, (y - p.y) / dt]
            }
            _ => [0.; 2],
        };
        Some(FourBarSample { time, x, y, vx, vy })
    }
}

impl Record for FourBarSample {
    fn time(&self) -> f64 {
        self.time
    }

    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![("x", self.x), ("y", self.y), ("vx", self.vx), ("vy", self.vy)]
    }
}

/// Sample of a slider-crank, the slider.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SliderCrankSample {
    /// Time (s)
    pub time: f64,
    /// Position
    pub x: f64,
    /// Velocity
    pub v: f64,
    /// Acceleration
    pub a: f64,
}

impl Simulate for SliderCrank {
    type Sample = SliderCrankSample;

    fn sample(&self, driver: &Driver, _prev: Option<&Self::Sample>) -> Option<Self::Sample> {
        // The driver speed overrides the mechanism speed
        let sc = Self { rpm: driver.rpm, ..*self };
        match sc.solve(driver.angle) {
            Ok(s) => Some(SliderCrankSample {
                time: driver.time,
                x: s.slider_x,
                v: s.velocity,
                a: s.acceleration,
            }),
            Err(e) => {
                tracing::trace!("{e}");
                None
            }
        }
    }
}

impl Record for SliderCrankSample {
    fn time(&self) -> f64 {
        self.time
    }

    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![("x", self.x), ("v", self.v), ("a", self.a)]
    }
}

/// Sample of a gear train, the input and output speeds.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GearSample {
    /// Time (s)
    pub time: f64,
    /// Speed of the first gear (rpm)
    pub input: f64,
    /// Speed of the last gear (rpm)
    pub output: f64,
}

impl Simulate for GearTrain {
    type Sample = GearSample;

    fn sample(&self, driver: &Driver, _prev: Option<&Self::Sample>) -> Option<Self::Sample> {
        let output = *self.speeds(driver.rpm).last()?;
        Some(GearSample { time: driver.time, input: driver.rpm, output })
    }
}

impl Record for GearSample {
    fn time(&self) -> f64 {
        self.time
    }

    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![("input", self.input), ("output", self.output)]
    }
}
