use crate::project::{Host, Mech, Project, RPM};
use anyhow::Context as _;
use kom::{plot, AngleBound, CouplerPoint, FourBar, FourBarTy, GearTrain, SliderCrank};
use std::path::PathBuf;

pub(crate) mod host;

const APP_NAME: &str = env!("CARGO_BIN_NAME");

#[derive(clap::Parser)]
#[clap(name = APP_NAME, version, author, about)]
pub(crate) struct Entry {
    #[clap(subcommand)]
    pub(crate) cmd: Cmd,
    /// Show more logs, `-vv` to trace every frame
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,
}

#[derive(clap::Subcommand)]
pub(crate) enum Cmd {
    /// Play a four-bar linkage, trace the coupler end
    FourBar {
        #[clap(flatten)]
        fb: FourBarArgs,
        /// Crank speed (rpm)
        #[clap(long, default_value_t = RPM, allow_negative_numbers = true)]
        rpm: f64,
        #[clap(flatten)]
        play: Play,
    },
    /// Play a slider-crank mechanism, trace the slider
    SliderCrank {
        /// Length of the crank
        #[clap(long, default_value_t = SliderCrank::example().crank)]
        crank: f64,
        /// Length of the connecting rod
        #[clap(long, default_value_t = SliderCrank::example().rod)]
        rod: f64,
        /// Crank speed (rpm)
        #[clap(long, default_value_t = RPM, allow_negative_numbers = true)]
        rpm: f64,
        #[clap(flatten)]
        play: Play,
    },
    /// Play a gear train, trace the input and output speeds
    GearTrain {
        /// Teeth of the gears from the driver, 2 to 5 gears
        #[clap(long, value_delimiter = ',', default_values_t = [20, 40])]
        teeth: Vec<u32>,
        /// Speed of the driver (rpm)
        #[clap(long, default_value_t = RPM, allow_negative_numbers = true)]
        rpm: f64,
        #[clap(flatten)]
        play: Play,
    },
    /// Classify a four-bar linkage and draw its coupler curve
    Curve {
        #[clap(flatten)]
        fb: FourBarArgs,
        /// Distance of the coupler point from the crank end, default to the
        /// coupler end
        #[clap(long)]
        offset: Option<f64>,
        /// Angle of the coupler point from the coupler line (rad)
        #[clap(long, default_value_t = 0., allow_negative_numbers = true)]
        angle: f64,
        /// Number of the points (resolution) in curve production
        #[clap(long, default_value_t = 360)]
        res: usize,
        /// Write the curve to a CSV file
        #[clap(long)]
        csv: Option<PathBuf>,
        /// Draw the curve to an SVG file
        #[clap(long)]
        svg: Option<PathBuf>,
    },
    /// Play a project file (in RON format)
    Run {
        /// Project file path
        file: PathBuf,
    },
}

#[derive(clap::Args)]
pub(crate) struct FourBarArgs {
    /// Length of the crank link
    #[clap(long, default_value_t = FourBar::example().crank)]
    crank: f64,
    /// Length of the coupler link
    #[clap(long, default_value_t = FourBar::example().coupler)]
    coupler: f64,
    /// Length of the follower link
    #[clap(long, default_value_t = FourBar::example().follower)]
    follower: f64,
    /// Length of the ground link
    #[clap(long, default_value_t = FourBar::example().ground)]
    ground: f64,
}

impl FourBarArgs {
    fn build(&self) -> kom::Result<FourBar> {
        FourBar::new(self.crank, self.coupler, self.follower, self.ground)
    }
}

#[derive(clap::Args)]
pub(crate) struct Play {
    #[clap(flatten)]
    host: Host,
    /// Save the settings to a project file (in RON format) before playing
    #[clap(long)]
    save: Option<PathBuf>,
}

impl Entry {
    pub(crate) fn main() -> anyhow::Result<()> {
        let entry = <Self as clap::Parser>::parse_from(wild::args());
        register_panic_hook();
        init_logger(entry.verbose);
        entry.cmd.exec()
    }
}

impl Cmd {
    fn exec(self) -> anyhow::Result<()> {
        match self {
            Self::Curve { fb, offset, angle, res, csv, svg } => {
                let fb = fb.build()?;
                let cp = CouplerPoint::new(offset.unwrap_or(fb.coupler), angle);
                curve(fb, cp, res, csv, svg)
            }
            Self::Run { file } => play(Project::open(&file)?),
            cmd => {
                let (proj, save) = cmd.project()?;
                if let Some(path) = save {
                    std::fs::write(&path, proj.to_ron()?)
                        .with_context(|| format!("cannot write {}", path.display()))?;
                    tracing::info!("project saved to {}", path.display());
                }
                play(proj)
            }
        }
    }

    /// Turn a playing command into a project, with the path to save.
    pub(crate) fn project(self) -> anyhow::Result<(Project, Option<PathBuf>)> {
        let (mech, rpm, Play { host, save }) = match self {
            Self::FourBar { fb, rpm, play } => (Mech::FourBar(fb.build()?), rpm, play),
            Self::SliderCrank { crank, rod, rpm, play } => {
                (Mech::SliderCrank(SliderCrank::new(crank, rod, rpm)?), rpm, play)
            }
            Self::GearTrain { teeth, rpm, play } => {
                (Mech::GearTrain(GearTrain::from_teeth(&teeth)?), rpm, play)
            }
            Self::Curve { .. } | Self::Run { .. } => anyhow::bail!("not a playing command"),
        };
        anyhow::ensure!(rpm.is_finite(), "invalid speed: {rpm} rpm");
        Ok((Project::new(mech, rpm, host), save))
    }
}

fn play(proj: Project) -> anyhow::Result<()> {
    let Project { mech, rpm, host } = proj;
    let title = mech.name();
    match mech {
        Mech::FourBar(fb) => {
            println!("type: {}", fb.ty());
            println!("angle bound: {}", fb.angle_bound().description());
            if fb.angle_bound() != AngleBound::Full {
                tracing::warn!("the crank cannot turn a full revolution, open frames are skipped");
            }
            host::play(kom::Sim::new(fb, rpm), &host, title)?;
        }
        Mech::SliderCrank(sc) => {
            println!("stroke: {}", sc.stroke());
            host::play(kom::Sim::slider_crank(sc), &host, title)?;
        }
        Mech::GearTrain(gt) => {
            println!("ratio: {:.4}", gt.ratio());
            println!("mesh ratios: {:.4?}", gt.mesh_ratios());
            println!("torque ratio: {:.4}", gt.torque_ratio());
            println!("efficiency: {:.1}%", gt.efficiency() * 100.);
            println!("speeds: {:.4?}", gt.speeds(rpm));
            host::play(kom::Sim::new(gt, rpm), &host, title)?;
        }
    }
    Ok(())
}

fn curve(
    fb: FourBar,
    cp: CouplerPoint,
    res: usize,
    csv: Option<PathBuf>,
    svg: Option<PathBuf>,
) -> anyhow::Result<()> {
    let bound = fb.angle_bound();
    let ty = fb.ty();
    println!("type: {ty}");
    if let FourBarTy::TripleRocker(link) = ty {
        println!("longest link: {}", link.name());
    }
    println!("change point: {}", fb.is_change_point());
    match bound {
        AngleBound::Range([start, end]) => println!("angle bound: [{start:.4}, {end:.4}]"),
        AngleBound::Split([[a, b], [c, d]]) => {
            println!("angle bound: [{a:.4}, {b:.4}] and [{c:.4}, {d:.4}]")
        }
        _ => println!("angle bound: {}", bound.description()),
    }
    let curve = fb.curve_with(res, &cp);
    println!("points: {}/{res}", curve.len());
    if !bound.is_valid() {
        tracing::warn!("the linkage cannot be assembled");
    }
    if let Some(path) = csv {
        let file = std::fs::File::create(&path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        kom::csv::write_csv(file, &curve)?;
        tracing::info!("curve saved to {}", path.display());
    }
    if let Some(path) = svg {
        let svg = plot::SVGBackend::new(&path, (800, 800));
        plot::plot_curve(svg, "Coupler curve", &fb, &[("coupler point", &curve[..])])?;
        tracing::info!("curve drawn to {}", path.display());
    }
    Ok(())
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn register_panic_hook() {
    // Print panic messages without stack trace
    std::panic::set_hook(Box::new(|info| {
        match info.payload().downcast_ref::<&str>() {
            Some(s) => eprintln!("{s}"),
            None => eprintln!("{info}"),
        }
        std::process::exit(1);
    }));
}
