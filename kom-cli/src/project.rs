//! Project files, a mechanism and the host settings in RON format.
use anyhow::Context as _;
use kom::{FourBar, GearTrain, SliderCrank};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default crank speed (rpm)
pub(crate) const RPM: f64 = 30.;

/// The simulated mechanism.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) enum Mech {
    FourBar(FourBar),
    SliderCrank(SliderCrank),
    GearTrain(GearTrain),
}

impl Mech {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::FourBar(_) => "Four-bar linkage",
            Self::SliderCrank(_) => "Slider-crank",
            Self::GearTrain(_) => "Gear train",
        }
    }

    // The gear train is checked on deserialization
    fn validate(&self) -> kom::Result<()> {
        match self {
            Self::FourBar(fb) => fb.validate(),
            Self::SliderCrank(sc) => sc.validate(),
            Self::GearTrain(_) => Ok(()),
        }
    }
}

/// Settings of the host loop.
#[derive(clap::Args, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub(crate) struct Host {
    /// Number of frames
    #[clap(long, default_value_t = Host::default().frames)]
    pub(crate) frames: usize,
    /// Time step of a frame (s)
    #[clap(long, default_value_t = Host::default().dt)]
    pub(crate) dt: f64,
    /// Measure the time step with the wall clock, `dt` is the frame interval
    #[clap(long)]
    pub(crate) realtime: bool,
    /// Write the history window to a CSV file
    #[clap(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Chart the history window to an SVG file
    #[clap(long)]
    pub(crate) svg: Option<PathBuf>,
}

impl Default for Host {
    fn default() -> Self {
        Self { frames: 600, dt: 1. / 60., realtime: false, csv: None, svg: None }
    }
}

/// A project file.
///
/// ```ron
/// (
///     mech: FourBar((crank: 2.0, coupler: 5.0, follower: 4.0, ground: 7.0)),
///     rpm: 30.0,
///     host: (frames: 120, svg: Some("history.svg")),
/// )
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Project {
    pub(crate) mech: Mech,
    /// Input speed (rpm), the slider-crank uses its own speed
    #[serde(default = "default_rpm")]
    pub(crate) rpm: f64,
    #[serde(default)]
    pub(crate) host: Host,
}

fn default_rpm() -> f64 {
    RPM
}

impl Project {
    pub(crate) fn new(mech: Mech, rpm: f64, host: Host) -> Self {
        Self { mech, rpm, host }
    }

    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::from_ron(&s).with_context(|| format!("invalid project {}", path.display()))
    }

    pub(crate) fn from_ron(s: &str) -> anyhow::Result<Self> {
        let proj = ron::from_str::<Self>(s)?;
        proj.mech.validate()?;
        anyhow::ensure!(proj.rpm.is_finite(), "invalid speed: {} rpm", proj.rpm);
        Ok(proj)
    }

    pub(crate) fn to_ron(&self) -> anyhow::Result<String> {
        Ok(ron::ser::to_string_pretty(self, Default::default())?)
    }
}
