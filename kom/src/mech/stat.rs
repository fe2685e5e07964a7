use std::f64::consts::TAU;

/// Links of a four-bar loop.
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Link {
    /// Ground link
    Ground,
    /// Crank (driver) link
    Crank,
    /// Coupler link
    Coupler,
    /// Follower link
    Follower,
}

impl Link {
    /// The order of a planar loop.
    pub const ALL: [Self; 4] = [Self::Ground, Self::Crank, Self::Coupler, Self::Follower];

    /// Get the lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Crank => "crank",
            Self::Coupler => "coupler",
            Self::Follower => "follower",
        }
    }
}

/// Type of the four-bar linkage.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum FourBarTy {
    /// Grashof double crank (Drag-link), the ground link is the shortest
    DoubleCrank,
    /// Grashof crank rocker, the crank link is the shortest
    CrankRocker,
    /// Grashof double rocker, the coupler link is the shortest
    DoubleRocker,
    /// Grashof rocker crank, the follower link is the shortest
    RockerCrank,
    /// Non-Grashof triple rocker, named by the longest link
    TripleRocker(Link),
    /// The loop cannot be assembled
    Invalid,
}

impl FourBarTy {
    /// Detect from four-bar loop `[ground, crank, coupler, follower]`.
    ///
    /// Grashof's law: `S + L <= P + Q`.
    pub fn from_loop(fb_loop: [f64; 4]) -> Self {
        let mut sorted = fb_loop;
        sorted.sort_unstable_by(f64::total_cmp);
        let [s, p, q, l] = sorted;
        if l > s + p + q {
            return Self::Invalid;
        }
        if s + l <= p + q {
            match pick(&fb_loop, |a, b| a < b) {
                Link::Ground => Self::DoubleCrank,
                Link::Crank => Self::CrankRocker,
                Link::Coupler => Self::DoubleRocker,
                Link::Follower => Self::RockerCrank,
            }
        } else {
            Self::TripleRocker(pick(&fb_loop, |a, b| a > b))
        }
    }

    /// Name of the type.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DoubleCrank => "Grashof double crank (Drag-link)",
            Self::CrankRocker => "Grashof crank rocker",
            Self::DoubleRocker => "Grashof double rocker",
            Self::RockerCrank => "Grashof rocker crank",
            Self::TripleRocker(Link::Ground) => "Non-Grashof triple rocker (longest ground)",
            Self::TripleRocker(Link::Crank) => "Non-Grashof triple rocker (longest crank)",
            Self::TripleRocker(Link::Coupler) => "Non-Grashof triple rocker (longest coupler)",
            Self::TripleRocker(Link::Follower) => "Non-Grashof triple rocker (longest follower)",
            Self::Invalid => "Invalid",
        }
    }

    /// Check if the type is valid.
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Return true if the type is Grashof linkage.
    pub const fn is_grashof(&self) -> bool {
        matches!(
            self,
            Self::DoubleCrank | Self::CrankRocker | Self::DoubleRocker | Self::RockerCrank
        )
    }

    /// Return true if the crank can turn a full revolution.
    pub const fn is_full_rotation(&self) -> bool {
        matches!(self, Self::DoubleCrank | Self::CrankRocker)
    }
}

impl std::fmt::Display for FourBarTy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// First link that wins against all others, ties keep the earlier link
fn pick(fb_loop: &[f64; 4], wins: impl Fn(f64, f64) -> bool) -> Link {
    let i = (1..4).fold(0, |i, j| if wins(fb_loop[j], fb_loop[i]) { j } else { i });
    Link::ALL[i]
}

/// Angle boundary types. The input angles which the linkage can close.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub enum AngleBound {
    /// Full revolution
    Full,
    /// One range (`[start, end]`)
    Range([f64; 2]),
    /// Two ranges mirrored about the ground link (`[[start, end]; 2]`)
    Split([[f64; 2]; 2]),
    /// Cannot be assembled
    #[default]
    Invalid,
}

impl AngleBound {
    /// Check angle bound from a planar loop `[ground, crank, coupler, follower]`.
    pub fn from_loop(fb_loop: [f64; 4]) -> Self {
        let [l1, l2, l3, l4] = fb_loop;
        let mut sorted = fb_loop;
        sorted.sort_unstable_by(f64::total_cmp);
        if sorted[3] > sorted[..3].iter().sum::<f64>() {
            return Self::Invalid;
        }
        // Distance between the crank end and the follower pivot:
        // d^2 = l1^2 + l2^2 - 2 l1 l2 cos(t)
        let angle_at = |d: f64| {
            let c = (l1 * l1 + l2 * l2 - d * d) / (2. * l1 * l2);
            c.clamp(-1., 1.).acos()
        };
        let d_min = (l3 - l4).abs();
        let d_max = l3 + l4;
        match (l1 + l2 <= d_max, (l1 - l2).abs() >= d_min) {
            (true, true) => Self::Full,
            (true, false) => {
                let t = angle_at(d_min);
                Self::Range([t, TAU - t])
            }
            (false, true) => {
                let t = angle_at(d_max);
                Self::Range([-t, t])
            }
            (false, false) => {
                let t1 = angle_at(d_min);
                let t2 = angle_at(d_max);
                Self::Split([[t1, t2], [TAU - t2, TAU - t1]])
            }
        }
    }

    /// Name of the angle bound.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Full => "Full revolution",
            Self::Range(_) => "Limited to one range",
            Self::Split(_) => "Limited to two ranges",
            Self::Invalid => "Invalid",
        }
    }

    /// Return true if the linkage closes at the angle.
    pub fn contains(&self, angle: f64) -> bool {
        let in_range = |[start, end]: [f64; 2]| (angle - start).rem_euclid(TAU) <= end - start;
        match *self {
            Self::Full => true,
            Self::Range(r) => in_range(r),
            Self::Split([r1, r2]) => in_range(r1) || in_range(r2),
            Self::Invalid => false,
        }
    }

    /// Check if the data is valid.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}
