use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::{error, info};

use crate::args::ChartArgs;
use crate::charts::ChartOptions;
use crate::error::{AppError, AppResult, SeriesError};
use crate::series::{DumpOptions, FailurePolicy, TimeSeries};

/// What to do with a finished series store.
pub(super) struct ReportPlan<'args> {
    pub(super) chart: &'args ChartArgs,
    pub(super) policy: FailurePolicy,
    pub(super) dump: Option<&'args str>,
}

/// Print the statistics, then dump and chart as requested.
pub(super) fn finish_report(series: &TimeSeries, plan: &ReportPlan<'_>) -> AppResult<()> {
    let report = series.pprint_with(plan.chart.title.as_deref(), plan.policy)?;
    print!("{}", report);

    if let Some(path) = plan.dump {
        dump_series(series, path)?;
        info!("Series written to {}", path);
    }

    if plan.chart.no_chart || series.is_empty() {
        return Ok(());
    }
    let options = ChartOptions {
        output: plan.chart.chart.as_ref().map(PathBuf::from),
        charts_dir: PathBuf::from(&plan.chart.charts_path),
        units: plan.chart.units.clone(),
    };
    let path = series.display(plan.chart.title.as_deref(), &options)?;
    info!("Chart written to {}", path.display());
    Ok(())
}

fn dump_series(series: &TimeSeries, path: &str) -> AppResult<()> {
    let file = File::create(path).map_err(|err| {
        error!("Failed to create dump file '{}': {}", path, err);
        AppError::from(err)
    })?;
    let mut writer = BufWriter::new(file);
    series.dump(&mut writer, DumpOptions { pretty: true })?;
    writer.flush().map_err(|err| AppError::series(SeriesError::Flush { source: err }))?;
    Ok(())
}
