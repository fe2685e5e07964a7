//! The host loop, calls the simulation step once per frame.
use crate::project::Host;
use anyhow::Context as _;
use indicatif::{ProgressBar, ProgressStyle};
use kom::{
    plot,
    sim::{step, Record, Sim, Simulate},
};
use serde::Serialize;
use std::time::{Duration, Instant};

const STYLE: &str = "{spinner} {wide_bar} {pos}/{len} [{elapsed_precise}]";

pub(crate) fn play<M>(sim: Sim<M>, host: &Host, title: &str) -> anyhow::Result<Sim<M>>
where
    M: Simulate,
    M::Sample: Serialize,
{
    let Host { frames, dt, realtime, csv, svg } = host;
    tracing::info!(frames, dt, realtime, "{title}");
    let t0 = Instant::now();
    let sim = if *realtime {
        wall_clock(sim, *frames, *dt)
    } else {
        fixed(sim, *frames, *dt)
    };
    tracing::debug!("time spent: {:?}", t0.elapsed());
    match sim.history.last() {
        Some(last) => {
            print!("t={:.4}", last.time());
            for (name, v) in last.fields() {
                print!(", {name}={v:.4}");
            }
            println!();
        }
        None => tracing::warn!("no valid frame recorded"),
    }
    if let Some(path) = csv {
        let file = std::fs::File::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        kom::csv::write_csv(file, &sim.history)?;
        tracing::info!("{} samples saved to {}", sim.history.len(), path.display());
    }
    if let Some(path) = svg {
        let svg = plot::SVGBackend::new(path, (1200, 800));
        plot::plot_history(svg, title, &sim.history)?;
        tracing::info!("history drawn to {}", path.display());
    }
    Ok(sim)
}

/// Advance with a fixed step, the result is reproducible.
pub(crate) fn fixed<M: Simulate>(sim: Sim<M>, frames: usize, dt: f64) -> Sim<M> {
    let pb = ProgressBar::new(frames as u64);
    if let Ok(style) = ProgressStyle::with_template(STYLE) {
        pb.set_style(style);
    }
    let sim = (0..frames).fold(sim, |sim, _| {
        pb.inc(1);
        step(sim, dt)
    });
    pb.finish_and_clear();
    sim
}

/// Advance with the measured time between frames, paced by `interval` seconds.
pub(crate) fn wall_clock<M: Simulate>(mut sim: Sim<M>, frames: usize, interval: f64) -> Sim<M> {
    let interval = Duration::try_from_secs_f64(interval).unwrap_or_default();
    let mut last = Instant::now();
    for _ in 0..frames {
        std::thread::sleep(interval);
        let now = Instant::now();
        sim = step(sim, now.duration_since(last).as_secs_f64());
        last = now;
    }
    sim
}
