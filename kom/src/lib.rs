//! KOM is a kinematics library for planar four-bar linkages, slider-cranks
//! and simple gear trains, with a frame-driven simulation loop.
#![cfg_attr(doc_cfg, feature(doc_cfg))]
#![warn(missing_docs)]
pub use crate::error::*;
pub use crate::mech::*;
pub use crate::point::*;
pub use crate::sim::{step, Driver, History, Record, Sim, Simulate};

#[cfg(feature = "csv")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "csv")))]
pub mod csv;
mod error;
pub mod mech;
#[cfg(feature = "plot")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "plot")))]
pub mod plot;
mod point;
pub mod sim;
#[cfg(test)]
mod tests;
