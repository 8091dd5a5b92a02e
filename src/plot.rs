use std::ops::Range;
use std::path::Path;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info};

use crate::annotate::{Annotation, Tone};
use crate::error::{draw_err, ChartError, Result};
use crate::inset::{inset_rect, INSET_Y};
use crate::slack::{Metric, MetricSeries, RunSet};

const FONT: &str = "sans-serif";

const WNS_COLOR: RGBColor = RGBColor(240, 128, 128); // lightcoral
const TNS_COLOR: RGBColor = RGBColor(135, 206, 235); // skyblue
const IMPROVED_COLOR: RGBColor = RGBColor(0, 128, 0);
const WORSENED_COLOR: RGBColor = RGBColor(255, 0, 0);

/// Horizontal breathing room around the first and last run, in runs.
const X_MARGIN: f64 = 0.25;

type SlackChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn series_color(metric: Metric) -> RGBColor {
    match metric {
        Metric::Wns => WNS_COLOR,
        Metric::Tns => TNS_COLOR,
    }
}

fn tone_color(tone: Tone) -> RGBColor {
    match tone {
        Tone::Neutral => BLACK,
        Tone::Improved => IMPROVED_COLOR,
        Tone::Worsened => WORSENED_COLOR,
    }
}

fn series_points(runs: &[u32], series: &MetricSeries) -> Vec<(f64, f64)> {
    runs.iter()
        .map(|&run| run as f64)
        .zip(series.values.iter().copied())
        .collect()
}

/// Tick labels only for whole runs.
fn run_label(v: &f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        String::new()
    }
}

/// Main y-range: every value and every label anchor, padded by a tenth of the span.
pub fn y_bounds(set: &RunSet, annotations: &[Annotation]) -> Range<f64> {
    let values = set.series().into_iter().flat_map(|s| s.values.iter().copied());
    let anchors = annotations.iter().map(|a| a.anchor_y);

    let (lo, hi) = values
        .chain(anchors)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

    let span = hi - lo;
    let pad = if span > 0.0 { span / 10.0 } else { 1.0 };

    (lo - pad)..(hi + pad)
}

fn inset_x_range(set: &RunSet) -> Range<f64> {
    let (first, last) = (set.first_run() as f64, set.last_run() as f64);
    if first < last {
        first..last
    } else {
        (first - 0.5)..(last + 0.5)
    }
}

/// Renders the chart to `path`, picking the backend from its extension.
pub fn write_plot(
    set: &RunSet,
    annotations: &[Annotation],
    caption: &str,
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("svg") => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_chart(&root, set, annotations, caption)?;
            root.present().map_err(draw_err)?;
        }
        Some("png") => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_chart(&root, set, annotations, caption)?;
            root.present().map_err(draw_err)?;
        }
        _ => return Err(ChartError::UnsupportedFormat(path.to_path_buf())),
    }

    info!(path = %path.display(), width = size.0, height = size.1, "chart written");
    Ok(())
}

/// Opens a written chart in the system viewer.
pub fn show_plot(path: &Path) -> Result<()> {
    open::that(path)?;
    info!(path = %path.display(), "chart opened in viewer");
    Ok(())
}

/// Margins and label areas of the main chart, without the caption.
fn main_frame<'a, 'b, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
) -> ChartBuilder<'a, 'b, DB> {
    let mut builder = ChartBuilder::on(root);
    builder
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 50);
    builder
}

pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    set: &RunSet,
    annotations: &[Annotation],
    caption: &str,
) -> Result<()> {
    root.fill(&WHITE).map_err(draw_err)?;

    let x_range = (set.first_run() as f64 - X_MARGIN)..(set.last_run() as f64 + X_MARGIN);
    let y_range = y_bounds(set, annotations);
    debug!(?x_range, ?y_range, "main chart ranges");

    let mut chart = main_frame(root)
        .caption(caption, (FONT, 20))
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(set.len())
        .x_label_formatter(&run_label)
        .y_label_formatter(&|v| format!("{:.1}", v))
        .label_style((FONT, 12))
        .axis_desc_style((FONT, 14))
        .x_desc("# of runs")
        .y_desc("Slack (ns)")
        .draw()
        .map_err(draw_err)?;

    draw_traces(&mut chart, set)?;

    chart
        .draw_series(annotations.iter().map(|a| {
            let style = (FONT, 10)
                .into_font()
                .color(&tone_color(a.tone))
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            Text::new(a.text.clone(), (a.run as f64, a.anchor_y), style)
        }))
        .map_err(draw_err)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerLeft)
        .label_font((FONT, 12))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;

    let inset = inset_area(root, chart.plotting_area().get_pixel_range());
    draw_inset(&inset, set)
}

/// Both series as lines with a marker on every run.
fn draw_traces<DB: DrawingBackend>(chart: &mut SlackChart<'_, DB>, set: &RunSet) -> Result<()> {
    for series in set.series() {
        let color = series_color(series.metric);
        let points = series_points(set.runs, &series);

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(draw_err)?
            .label(series.metric.name())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });

        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))
            .map_err(draw_err)?;
    }

    Ok(())
}

/// Sub-area of `root` for the inset, given the main plotting area in backend pixels.
fn inset_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    (plot_x, plot_y): (Range<i32>, Range<i32>),
) -> DrawingArea<DB, Shift> {
    let (root_x, root_y) = root.get_pixel_range();
    let rect = inset_rect(
        (plot_x.start - root_x.start)..(plot_x.end - root_x.start),
        (plot_y.start - root_y.start)..(plot_y.end - root_y.start),
    );
    debug!(?rect, "inset placement");

    root.clone()
        .shrink((rect.left, rect.top), (rect.width, rect.height))
}

/// Zoomed view of the band around zero slack.
fn draw_inset<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, set: &RunSet) -> Result<()> {
    area.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(area)
        .margin(4)
        .set_label_area_size(LabelAreaPosition::Left, 40)
        .set_label_area_size(LabelAreaPosition::Bottom, 20)
        .build_cartesian_2d(inset_x_range(set), INSET_Y.range())
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_labels(set.len())
        .y_labels(6)
        .x_label_formatter(&run_label)
        .y_label_formatter(&|v| format!("{:.2}", v))
        .label_style((FONT, 9))
        .draw()
        .map_err(draw_err)?;

    draw_inset_traces(&mut chart, set)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, 8))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;

    Ok(())
}

/// Clipped series plus the dashed zero-slack reference line.
fn draw_inset_traces<DB: DrawingBackend>(
    chart: &mut SlackChart<'_, DB>,
    set: &RunSet,
) -> Result<()> {
    for series in set.series() {
        let color = series_color(series.metric);
        let points = series_points(set.runs, &series);

        for piece in INSET_Y.clip_polyline(&points) {
            chart
                .draw_series(LineSeries::new(piece, color.stroke_width(2)))
                .map_err(draw_err)?;
        }

        chart
            .draw_series(
                INSET_Y
                    .visible_points(&points)
                    .into_iter()
                    .map(|p| Circle::new(p, 3, color.filled())),
            )
            .map_err(draw_err)?;
    }

    let x_range = chart.x_range();
    chart
        .draw_series(DashedLineSeries::new(
            vec![(x_range.start, 0.0), (x_range.end, 0.0)],
            6,
            4,
            IMPROVED_COLOR.stroke_width(1),
        ))
        .map_err(draw_err)?
        .label("Timing Met")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], IMPROVED_COLOR));

    Ok(())
}
