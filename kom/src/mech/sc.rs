//! Slider-crank mechanisms.
#[doc(no_inline)]
pub use super::*;
use crate::{
    error::{check_length, check_speed},
    Error, Point, Result,
};

/// In-line slider-crank mechanism.
///
/// The crank turns about the origin and the slider moves on the x axis.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderCrank {
    /// Length of the crank `r`
    pub crank: f64,
    /// Length of the connecting rod `l`
    pub rod: f64,
    /// Crank speed in rpm
    pub rpm: f64,
}

impl Default for SliderCrank {
    fn default() -> Self {
        Self::example()
    }
}

/// Kinematic state of a slider-crank at an input angle.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderCrankState {
    /// End of the crank
    pub crank_end: [f64; 2],
    /// Slider position on the x axis
    pub slider_x: f64,
    /// Slider velocity
    pub velocity: f64,
    /// Slider acceleration (approximated, see [`SliderCrank::solve()`])
    pub acceleration: f64,
}

impl SliderCrank {
    /// Create a new instance.
    ///
    /// The rod must not be shorter than the crank.
    pub fn new(crank: f64, rod: f64, rpm: f64) -> Result<Self> {
        let crank = check_length("crank", crank)?;
        let rod = check_length("rod", rod)?;
        if rod < crank {
            return Err(Error::RodTooShort { crank, rod });
        }
        Ok(Self { crank, rod, rpm: check_speed(rpm)? })
    }

    /// An example mechanism.
    pub const fn example() -> Self {
        Self { crank: 2., rod: 6., rpm: 30. }
    }

    /// Check the parameters again, the fields are public.
    pub fn validate(&self) -> Result<()> {
        Self::new(self.crank, self.rod, self.rpm).map(|_| ())
    }

    /// Solve the slider at the crank angle `angle`.
    ///
    /// + `x = r cos(t) + sqrt(l^2 - (r sin(t))^2)`
    /// + `v = -r w sin(t) / cos(b)`, `b = asin(r sin(t) / l)`
    /// + `a = -r w^2 (cos(t) + r / l cos(2t))`
    ///
    /// The acceleration is the first-order approximation of the exact
    /// derivative, the `sin^2 / cos^3(b)` term is left out.
    ///
    /// The parameters are checked first, the fields are public. A rod shorter
    /// than the crank is an error. So is the dead center of a rod as long as
    /// the crank, where the velocity is unbounded.
    pub fn solve(&self, angle: f64) -> Result<SliderCrankState> {
        self.validate()?;
        let Self { crank: r, rod: l, rpm } = *self;
        let crank_end = [0f64; 2].pla(r, angle);
        let [crank_x, crank_y] = crank_end;
        let slider_x = crank_x + (l * l - crank_y * crank_y).max(0.).sqrt();
        let beta = (crank_y / l).clamp(-1., 1.).asin();
        let cos_beta = beta.cos();
        if cos_beta.abs() < f64::EPSILON {
            return Err(Error::DeadCenter(angle));
        }
        let w = omega(rpm);
        let velocity = -r * w * angle.sin() / cos_beta;
        let acceleration = -r * w * w * (angle.cos() + r / l * (2. * angle).cos());
        Ok(SliderCrankState { crank_end, slider_x, velocity, acceleration })
    }

    /// Slider stroke, the travel between the dead centers.
    pub fn stroke(&self) -> f64 {
        2. * self.crank
    }
}
