//! Mechanism types.
pub use self::{
    fb::{CouplerPoint, FourBar, FourBarState},
    gear::{Gear, GearTrain},
    sc::{SliderCrank, SliderCrankState},
    stat::*,
};

pub mod fb;
pub mod gear;
pub mod sc;
mod stat;

/// Angular velocity (rad/s) from a speed in rpm.
pub fn omega(rpm: f64) -> f64 {
    rpm * std::f64::consts::TAU / 60.
}
