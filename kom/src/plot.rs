//! The functions used to chart the history window and the coupler curves.
//!
//! ```
//! use kom::{plot::*, FourBar};
//!
//! let fb = FourBar::example();
//! let curve = fb.curve(90);
//! let mut buf = String::new();
//! let svg = SVGBackend::with_string(&mut buf, (800, 800));
//! plot_curve(svg, "Coupler curve", &fb, &[("coupler end", &curve[..])]).unwrap();
//! ```
use crate::{
    sim::{History, Record},
    FourBar,
};
#[doc(no_inline)]
pub use plotters::{prelude::*, *};

/// Get font setting.
pub fn font() -> TextStyle<'static> {
    ("sans-serif", 20).into_font().color(&BLACK)
}

/// Plot the history window, one line for each field of the samples.
pub fn plot_history<B, S>(backend: B, title: &str, history: &History<S>) -> anyhow::Result<()>
where
    B: DrawingBackend,
    B::ErrorType: 'static,
    S: Record,
{
    let labels = history
        .last()
        .map(|s| s.fields().into_iter().map(|(k, _)| k).collect::<Vec<_>>())
        .unwrap_or_default();
    let series = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let line = history
                .iter()
                .map(|s| [s.time(), s.fields()[i].1])
                .collect::<Vec<_>>();
            (*label, line)
        })
        .collect::<Vec<_>>();
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;
    let [t_min, t_max] = span(series.iter().flat_map(|(_, l)| l.iter().map(|[t, _]| *t)));
    let [v_min, v_max] = span(series.iter().flat_map(|(_, l)| l.iter().map(|[_, v]| *v)));
    let mut chart = ChartBuilder::on(&root)
        .caption(title, font())
        .set_label_area_size(LabelAreaPosition::Left, (10).percent())
        .set_label_area_size(LabelAreaPosition::Bottom, (6).percent())
        .margin((5).percent())
        .build_cartesian_2d(t_min..t_max, v_min..v_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Time (s)")
        .x_label_style(font())
        .y_label_style(font())
        .draw()?;
    for (i, (label, line)) in series.iter().enumerate() {
        let color = Palette99::pick(i);
        chart
            .draw_series(LineSeries::new(line.iter().map(|&[t, v]| (t, v)), &color))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    chart
        .configure_series_labels()
        .background_style(&WHITE)
        .border_style(&BLACK)
        .label_font(font())
        .draw()?;
    root.present()?;
    Ok(())
}

/// Plot the coupler curves of a four-bar linkage with its ground link.
///
/// The fixed pivots are drawn as triangles and the first point of each curve,
/// the position at zero input angle, as a cross. Both axes have the same
/// scale.
pub fn plot_curve<B>(
    backend: B,
    title: &str,
    fb: &FourBar,
    curves: &[(&str, &[[f64; 2]])],
) -> anyhow::Result<()>
where
    B: DrawingBackend,
    B::ErrorType: 'static,
{
    let pivots = [[0., 0.], fb.follower_pivot()];
    let mut shapes = curves.to_vec();
    shapes.push(("ground", &pivots[..]));
    let [x_min, x_max, y_min, y_max] = bounding_box(&shapes);
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, font())
        .x_label_area_size(40)
        .y_label_area_size(50)
        .margin(20)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_label_style(font())
        .y_label_style(font())
        .draw()?;
    let ground = BLACK.stroke_width(3);
    chart
        .draw_series(LineSeries::new(pivots.iter().map(|&[x, y]| (x, y)), ground))?
        .label(format!("ground ({})", fb.ty()))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ground));
    chart.draw_series(
        pivots
            .iter()
            .map(|&[x, y]| TriangleMarker::new((x, y), 10, BLACK.filled())),
    )?;
    for (i, &(label, curve)) in curves.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(
                curve.iter().map(|&[x, y]| (x, y)),
                color.stroke_width(2),
            ))?
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        if let Some(&[x, y]) = curve.first() {
            chart.draw_series(std::iter::once(Cross::new((x, y), 6, color.stroke_width(2))))?;
        }
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE)
        .border_style(&BLACK)
        .label_font(font())
        .draw()?;
    root.present()?;
    Ok(())
}

/// Get the square bounding box `[x_min, x_max, y_min, y_max]` of the curves.
pub fn bounding_box(curves: &[(&str, &[[f64; 2]])]) -> [f64; 4] {
    let points = || curves.iter().flat_map(|(_, c)| c.iter());
    let [x_min, x_max] = span(points().map(|[x, _]| *x));
    let [y_min, y_max] = span(points().map(|[_, y]| *y));
    let r = (x_max - x_min).max(y_max - y_min) * 0.5;
    let [xc, yc] = [(x_min + x_max) * 0.5, (y_min + y_max) * 0.5];
    [xc - r, xc + r, yc - r, yc + r]
}

// Range of the values, widened if empty or flat
fn span(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let [min, max] = values
        .filter(|v| v.is_finite())
        .fold([f64::INFINITY, f64::NEG_INFINITY], |[min, max], v| {
            [min.min(v), max.max(v)]
        });
    if min > max {
        [0., 1.]
    } else if max - min < f64::EPSILON {
        [min - 0.5, max + 0.5]
    } else {
        [min, max]
    }
}
