use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{error, info};

use crate::args::default_charts_path;
use crate::error::AppResult;
use crate::series::{Sample, TimeSeries};

use super::naming::resolve_chart_path;

pub const DEFAULT_UNITS: &str = "milliseconds";

const CHART_SIZE: (u32, u32) = (900, 700);

#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Image path; when unset a timestamped file is created in `charts_dir`.
    pub output: Option<PathBuf>,
    pub charts_dir: PathBuf,
    /// Y axis caption.
    pub units: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            output: None,
            charts_dir: PathBuf::from(default_charts_path()),
            units: DEFAULT_UNITS.to_owned(),
        }
    }
}

impl ChartOptions {
    #[must_use]
    pub fn output_path(&self, title: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| resolve_chart_path(&self.charts_dir, title))
    }
}

/// Draw one line per series, indexed by run, and write it as a PNG.
///
/// Failed samples are not plotted and split their line into separate
/// segments.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or the chart
/// cannot be drawn.
pub fn chart_times(
    series: &TimeSeries,
    title: &str,
    options: &ChartOptions,
) -> AppResult<PathBuf> {
    let path = options.output_path(title);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        error!(
            "Failed to create chart directory '{}': {}",
            parent.display(),
            e
        );
        return Err(e.into());
    }

    info!("Plotting {} series to {}...", series.len(), path.display());
    draw(series, title, &options.units, &path)?;
    Ok(path)
}

fn draw(series: &TimeSeries, title: &str, units: &str, path: &Path) -> AppResult<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_max, y_max) = axis_bounds(series);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 26))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("run index")
        .y_desc(units)
        .draw()?;

    for (idx, (label, samples)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).mix(1.0);
        let style = color.stroke_width(2);
        // Empty series carrying the legend entry, so all-failed labels still show.
        chart
            .draw_series(LineSeries::new(Vec::<(usize, f64)>::new(), style))?
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x.saturating_add(20), y)], color)
            });
        for segment in series_segments(samples) {
            chart.draw_series(LineSeries::new(segment, style).point_size(3))?;
        }
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Runs of consecutive successful samples as `(index, latency)` points.
/// A failed sample ends the current run.
pub(super) fn series_segments(samples: &[Sample]) -> Vec<Vec<(usize, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (idx, sample) in samples.iter().enumerate() {
        match sample.latency_ms() {
            Some(ms) => current.push((idx, ms)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Exclusive x bound and y bound with ten percent headroom.
pub(super) fn axis_bounds(series: &TimeSeries) -> (usize, f64) {
    let x_max = series
        .iter()
        .map(|(_, samples)| samples.len())
        .max()
        .unwrap_or(0)
        .max(1);
    let y_max = series
        .iter()
        .flat_map(|(_, samples)| samples.iter().filter_map(Sample::latency_ms))
        .fold(0.0_f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
    (x_max, y_max)
}
