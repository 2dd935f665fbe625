use std::fmt::Write as _;

use crate::error::SeriesError;

use super::{FailurePolicy, SeriesStatistics, TimeSeries};

impl TimeSeries {
    /// Human-readable statistics for every series, failures excluded.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be formatted.
    pub fn pprint(&self, title: Option<&str>) -> Result<String, SeriesError> {
        self.pprint_with(title, FailurePolicy::default())
    }

    /// # Errors
    ///
    /// Returns an error if the report cannot be formatted.
    pub fn pprint_with(
        &self,
        title: Option<&str>,
        policy: FailurePolicy,
    ) -> Result<String, SeriesError> {
        let mut output = String::new();
        if let Some(title) = title {
            write_line(&mut output, title)?;
        }
        for (label, stats) in self.statistics_with(policy) {
            write_block(&mut output, &label, &stats)?;
        }
        Ok(output)
    }
}

fn write_block(
    output: &mut String,
    label: &str,
    stats: &SeriesStatistics,
) -> Result<(), SeriesError> {
    write_line(output, &format!("Statistics for the {} series:", label))?;
    match stats.summary {
        Some(summary) => {
            let rows = [
                ("Mean", summary.mean),
                ("Median", summary.median),
                ("Stddev", summary.stddev),
                ("Variance", summary.variance),
                ("Max", summary.max),
                ("Min", summary.min),
            ];
            for (name, value) in rows {
                write_line(output, &format!("    {}: {:.3}", name, value))?;
            }
        }
        None => write_line(output, "    No successful samples.")?,
    }
    write_line(
        output,
        &format!("    Failures: {} of {}", stats.failures, stats.count),
    )
}

fn write_line(output: &mut String, line: &str) -> Result<(), SeriesError> {
    writeln!(output, "{}", line).map_err(|err| SeriesError::Report { source: err })
}
