//! Planar four-bar linkages.
#[doc(no_inline)]
pub use super::*;
use crate::{error::check_length, Point, Result};

/// Four-bar linkage with the crank pivot at the origin and the follower pivot
/// on the positive x axis.
///
/// # Parameters
///
/// + Crank link `crank`
/// + Coupler link `coupler`
/// + Follower link `follower`
/// + Ground link `ground`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FourBar {
    /// Length of the crank (driver) link
    pub crank: f64,
    /// Length of the coupler link
    pub coupler: f64,
    /// Length of the follower link
    pub follower: f64,
    /// Length of the ground link
    pub ground: f64,
}

impl Default for FourBar {
    fn default() -> Self {
        Self::example()
    }
}

impl FourBar {
    /// Create a new instance, all lengths must be positive.
    pub fn new(crank: f64, coupler: f64, follower: f64, ground: f64) -> Result<Self> {
        Ok(Self {
            crank: check_length("crank", crank)?,
            coupler: check_length("coupler", coupler)?,
            follower: check_length("follower", follower)?,
            ground: check_length("ground", ground)?,
        })
    }

    /// An example crank rocker.
    pub const fn example() -> Self {
        Self { crank: 2., coupler: 5., follower: 4., ground: 7. }
    }

    /// Check the lengths again, the fields are public.
    pub fn validate(&self) -> Result<()> {
        Self::new(self.crank, self.coupler, self.follower, self.ground).map(|_| ())
    }

    /// The fixed pivot of the follower.
    pub const fn follower_pivot(&self) -> [f64; 2] {
        [self.ground, 0.]
    }

    /// Planar loop `[ground, crank, coupler, follower]`.
    pub const fn planar_loop(&self) -> [f64; 4] {
        [self.ground, self.crank, self.coupler, self.follower]
    }

    /// Solve the joint positions at the crank angle `angle`.
    ///
    /// Only one assembly mode is traced: the coupler end is always on the left
    /// side of the line from the crank end to the follower pivot.
    ///
    /// Invalid lengths never close, see [`FourBar::validate()`].
    pub fn solve(&self, angle: f64) -> FourBarState {
        let crank_end = [0f64; 2].pla(self.crank, angle);
        if let Err(e) = self.validate() {
            tracing::trace!("{e}");
            return FourBarState::Open { crank_end };
        }
        match crank_end.pllp(self.coupler, self.follower, &self.follower_pivot()) {
            Some(coupler_end) => FourBarState::Closed { crank_end, coupler_end },
            None => FourBarState::Open { crank_end },
        }
    }

    /// Return the type of this linkage.
    pub fn ty(&self) -> FourBarTy {
        FourBarTy::from_loop(self.planar_loop())
    }

    /// Input angle bounds of the linkage.
    pub fn angle_bound(&self) -> AngleBound {
        AngleBound::from_loop(self.planar_loop())
    }

    /// Return true if the shortest and longest links sum exactly to the
    /// others. The linkage can fold flat.
    pub fn is_change_point(&self) -> bool {
        let mut v = self.planar_loop();
        v.sort_unstable_by(f64::total_cmp);
        let [s, p, q, l] = v;
        (p + q - s - l).abs() <= f64::EPSILON * l * 4.
    }

    /// Generator for the coupler curve in one crank revolution.
    ///
    /// The positions which cannot close are skipped.
    pub fn curve(&self, res: usize) -> Vec<[f64; 2]> {
        linspace(res)
            .filter_map(|t| self.solve(t).closed())
            .map(|[_, p]| p)
            .collect()
    }

    /// Generator for the path of a coupler point in one crank revolution.
    pub fn curve_with(&self, res: usize, cp: &CouplerPoint) -> Vec<[f64; 2]> {
        linspace(res)
            .filter_map(|t| self.solve(t).coupler_point(cp))
            .collect()
    }
}

fn linspace(res: usize) -> impl Iterator<Item = f64> {
    use std::f64::consts::TAU;
    let step = TAU / res as f64;
    (0..res).map(move |n| n as f64 * step)
}

/// Joint positions of a four-bar linkage at an input angle.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FourBarState {
    /// The chain closes
    Closed {
        /// End of the crank (coupler and crank joint)
        crank_end: [f64; 2],
        /// End of the coupler (coupler and follower joint)
        coupler_end: [f64; 2],
    },
    /// The coupler and follower circles do not intersect
    Open {
        /// End of the crank (coupler and crank joint)
        crank_end: [f64; 2],
    },
}

impl FourBarState {
    /// Return true if the chain closes.
    pub const fn valid(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    /// End of the crank.
    pub const fn crank_end(&self) -> [f64; 2] {
        match self {
            Self::Closed { crank_end, .. } | Self::Open { crank_end } => *crank_end,
        }
    }

    /// End of the coupler.
    ///
    /// An open chain has no coupler end, the crank end is returned instead.
    pub const fn coupler_end(&self) -> [f64; 2] {
        match self {
            Self::Closed { coupler_end, .. } => *coupler_end,
            Self::Open { crank_end } => *crank_end,
        }
    }

    /// Turn into `Option` type, `[crank_end, coupler_end]`.
    pub const fn closed(self) -> Option<[[f64; 2]; 2]> {
        match self {
            Self::Closed { crank_end, coupler_end } => Some([crank_end, coupler_end]),
            Self::Open { .. } => None,
        }
    }

    /// Position of a coupler point.
    pub fn coupler_point(&self, cp: &CouplerPoint) -> Option<[f64; 2]> {
        let [p1, p2] = self.closed()?;
        Some(p1.plap(cp.offset, cp.angle, &p2))
    }
}

/// A point rigidly attached on the coupler link.
///
/// It is measured from the crank end: `offset` along the coupler, rotated by
/// `angle` (radians, counterclockwise) from the coupler line.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CouplerPoint {
    /// Distance from the crank end
    pub offset: f64,
    /// Angle from the coupler line
    pub angle: f64,
}

impl CouplerPoint {
    /// Create a new instance.
    pub const fn new(offset: f64, angle: f64) -> Self {
        Self { offset, angle }
    }

    /// The coupler end of the linkage.
    pub const fn coupler_end(fb: &FourBar) -> Self {
        Self::new(fb.coupler, 0.)
    }
}
