//! Simple gear trains.
use crate::{error::check_length, Error, Result};

/// A spur gear.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gear {
    /// Number of teeth
    pub teeth: u32,
    /// Pitch radius
    pub radius: f64,
}

impl Gear {
    /// Teeth per unit radius of [`Gear::from_radius()`].
    pub const TEETH_PER_RADIUS: f64 = 10.;

    /// Create a new gear.
    pub const fn new(teeth: u32, radius: f64) -> Self {
        Self { teeth, radius }
    }

    /// Create a gear with the teeth proportional to the radius.
    pub fn from_radius(radius: f64) -> Result<Self> {
        let radius = check_length("gear radius", radius)?;
        let teeth = (radius * Self::TEETH_PER_RADIUS).round().max(1.) as u32;
        Ok(Self { teeth, radius })
    }
}

/// A chain of meshing gears, the first gear is the driver.
///
/// Each gear meshes with the next one, so the rotation direction alternates.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Gear>", into = "Vec<Gear>"))]
#[derive(Clone, Debug, PartialEq)]
pub struct GearTrain {
    gears: Vec<Gear>,
}

impl Default for GearTrain {
    fn default() -> Self {
        Self::example()
    }
}

impl TryFrom<Vec<Gear>> for GearTrain {
    type Error = Error;

    fn try_from(gears: Vec<Gear>) -> Result<Self> {
        Self::new(gears)
    }
}

impl From<GearTrain> for Vec<Gear> {
    fn from(train: GearTrain) -> Self {
        train.gears
    }
}

impl GearTrain {
    /// Minimum number of gears.
    pub const MIN_GEARS: usize = 2;
    /// Maximum number of gears.
    pub const MAX_GEARS: usize = 5;
    /// Efficiency of one meshing pair.
    pub const MESH_EFFICIENCY: f64 = 0.98;

    /// Create a new gear train.
    pub fn new(gears: Vec<Gear>) -> Result<Self> {
        check_count(gears.len())?;
        for (i, g) in gears.iter().enumerate() {
            if g.teeth == 0 {
                return Err(Error::NoTeeth(i));
            }
            check_length("gear radius", g.radius)?;
        }
        Ok(Self { gears })
    }

    /// Create from teeth counts, the radius is proportional to the teeth.
    pub fn from_teeth(teeth: &[u32]) -> Result<Self> {
        let gears = teeth
            .iter()
            .map(|&t| Gear::new(t, t as f64 / Gear::TEETH_PER_RADIUS))
            .collect();
        Self::new(gears)
    }

    /// An example pair, 20 to 40 teeth.
    pub fn example() -> Self {
        Self { gears: vec![Gear::new(20, 2.), Gear::new(40, 4.)] }
    }

    /// The gears.
    pub fn gears(&self) -> &[Gear] {
        &self.gears
    }

    /// Number of the gears.
    pub fn len(&self) -> usize {
        self.gears.len()
    }

    /// Always false, a gear train has at least two gears.
    pub fn is_empty(&self) -> bool {
        self.gears.is_empty()
    }

    /// Append a gear to the end of the chain.
    pub fn add_gear(&mut self, gear: Gear) -> Result<()> {
        check_count(self.gears.len() + 1)?;
        if gear.teeth == 0 {
            return Err(Error::NoTeeth(self.gears.len()));
        }
        check_length("gear radius", gear.radius)?;
        self.gears.push(gear);
        Ok(())
    }

    /// Remove the last gear of the chain.
    pub fn remove_gear(&mut self) -> Result<Gear> {
        check_count(self.gears.len().saturating_sub(1))?;
        self.gears.pop().ok_or_else(|| count_error(0))
    }

    /// Speeds of all gears (rpm) from the speed of the driver.
    ///
    /// `n[i] = n[i - 1] * T[i - 1] / T[i]`
    pub fn speeds(&self, driving_rpm: f64) -> Vec<f64> {
        let mut speeds = Vec::with_capacity(self.gears.len());
        let mut n = driving_rpm;
        speeds.push(n);
        for w in self.gears.windows(2) {
            n *= w[0].teeth as f64 / w[1].teeth as f64;
            speeds.push(n);
        }
        speeds
    }

    /// Overall speed ratio, output speed over input speed.
    pub fn ratio(&self) -> f64 {
        match (self.gears.first(), self.gears.last()) {
            (Some(first), Some(last)) => first.teeth as f64 / last.teeth as f64,
            _ => 1.,
        }
    }

    /// Speed ratio of each meshing pair, `T[i] / T[i + 1]`.
    pub fn mesh_ratios(&self) -> Vec<f64> {
        self.gears
            .windows(2)
            .map(|w| w[0].teeth as f64 / w[1].teeth as f64)
            .collect()
    }

    /// Torque ratio, output torque over input torque of a lossless train.
    pub fn torque_ratio(&self) -> f64 {
        self.ratio().recip()
    }

    /// Transmission efficiency, [`Self::MESH_EFFICIENCY`] for each mesh.
    pub fn efficiency(&self) -> f64 {
        let meshes = self.gears.len().saturating_sub(1);
        Self::MESH_EFFICIENCY.powi(meshes as i32)
    }

    /// Rotation angles of all gears when the driver is at `angle`.
    ///
    /// The meshing gears turn in alternating directions.
    pub fn angles(&self, angle: f64) -> Vec<f64> {
        let t0 = self.gears.first().map_or(1., |g| g.teeth as f64);
        self.gears
            .iter()
            .enumerate()
            .map(|(i, g)| {
                let dir = if i % 2 == 0 { 1. } else { -1. };
                dir * angle * t0 / g.teeth as f64
            })
            .collect()
    }

    /// Centers of the gears, laid out on the x axis from the origin.
    pub fn centers(&self) -> Vec<[f64; 2]> {
        let mut x = 0.;
        let mut centers = Vec::with_capacity(self.gears.len());
        for (i, g) in self.gears.iter().enumerate() {
            if i > 0 {
                x += self.gears[i - 1].radius + g.radius;
            }
            centers.push([x, 0.]);
        }
        centers
    }
}

fn check_count(len: usize) -> Result<()> {
    if (GearTrain::MIN_GEARS..=GearTrain::MAX_GEARS).contains(&len) {
        Ok(())
    } else {
        Err(count_error(len))
    }
}

fn count_error(len: usize) -> Error {
    Error::GearCount {
        min: GearTrain::MIN_GEARS,
        max: GearTrain::MAX_GEARS,
        len,
    }
}
