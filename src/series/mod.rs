//! Label-keyed latency series with statistics and JSON persistence.
mod persist;
mod report;
mod sample;
mod stats;


use std::collections::HashMap;
use std::path::PathBuf;

use crate::charts::{ChartOptions, chart_times};
use crate::error::{AppResult, SeriesError};

pub use persist::DumpOptions;
pub use sample::{FAILED_SENTINEL, FailurePolicy, Sample};
pub use stats::{SeriesStatistics, Summary};

/// Ordered mapping from series label to the samples recorded under it.
///
/// Labels iterate in the order they were first created. A series is
/// created by the first `append`/`extend` to its label and only goes away
/// through `pop`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    order: Vec<String>,
    data: HashMap<String, Vec<Sample>>,
}

impl TimeSeries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, label: &str, sample: Sample) {
        self.samples_mut(label).push(sample);
    }

    pub fn extend<I>(&mut self, label: &str, samples: I)
    where
        I: IntoIterator<Item = Sample>,
    {
        self.samples_mut(label).extend(samples);
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&[Sample]> {
        self.data.get(label).map(Vec::as_slice)
    }

    #[must_use]
    pub fn get_or<'series>(
        &'series self,
        label: &str,
        default: &'series [Sample],
    ) -> &'series [Sample] {
        self.get(label).unwrap_or(default)
    }

    /// Samples of a series that must exist.
    ///
    /// # Errors
    ///
    /// Returns `SeriesError::MissingSeries` when no series has this label.
    pub fn series(&self, label: &str) -> Result<&[Sample], SeriesError> {
        self.get(label).ok_or_else(|| SeriesError::MissingSeries {
            label: label.to_owned(),
        })
    }

    pub fn pop(&mut self, label: &str) -> Option<Vec<Sample>> {
        let samples = self.data.remove(label)?;
        self.order.retain(|existing| existing != label);
        Some(samples)
    }

    pub fn pop_or(&mut self, label: &str, default: Vec<Sample>) -> Vec<Sample> {
        self.pop(label).unwrap_or(default)
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.data.contains_key(label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            order: self.order.iter(),
            data: &self.data,
        }
    }

    /// Statistics for every series, failures excluded.
    #[must_use]
    pub fn statistics(&self) -> Vec<(String, SeriesStatistics)> {
        self.statistics_with(FailurePolicy::default())
    }

    #[must_use]
    pub fn statistics_with(&self, policy: FailurePolicy) -> Vec<(String, SeriesStatistics)> {
        self.iter()
            .map(|(label, samples)| {
                (
                    label.to_owned(),
                    SeriesStatistics::from_samples(samples, policy),
                )
            })
            .collect()
    }

    /// Summary of a single series under `policy`.
    ///
    /// # Errors
    ///
    /// Returns `SeriesError::MissingSeries` when no series has this label.
    pub fn summary_with(
        &self,
        label: &str,
        policy: FailurePolicy,
    ) -> Result<Option<Summary>, SeriesError> {
        let samples = self.series(label)?;
        Ok(SeriesStatistics::from_samples(samples, policy).summary)
    }

    /// # Errors
    ///
    /// Returns `SeriesError::MissingSeries` when no series has this label.
    pub fn mean(&self, label: &str) -> Result<Option<f64>, SeriesError> {
        Ok(self.summary_with(label, FailurePolicy::default())?.map(|s| s.mean))
    }

    /// # Errors
    ///
    /// Returns `SeriesError::MissingSeries` when no series has this label.
    pub fn median(&self, label: &str) -> Result<Option<f64>, SeriesError> {
        Ok(self.summary_with(label, FailurePolicy::default())?.map(|s| s.median))
    }

    /// # Errors
    ///
    /// Returns `SeriesError::MissingSeries` when no series has this label.
    pub fn stddev(&self, label: &str) -> Result<Option<f64>, SeriesError> {
        Ok(self.summary_with(label, FailurePolicy::default())?.map(|s| s.stddev))
    }

    /// # Errors
    ///
    /// Returns `SeriesError::MissingSeries` when no series has this label.
    pub fn variance(&self, label: &str) -> Result<Option<f64>, SeriesError> {
        Ok(self.summary_with(label, FailurePolicy::default())?.map(|s| s.variance))
    }

    /// # Errors
    ///
    /// Returns `SeriesError::MissingSeries` when no series has this label.
    pub fn max(&self, label: &str) -> Result<Option<f64>, SeriesError> {
        Ok(self.summary_with(label, FailurePolicy::default())?.map(|s| s.max))
    }

    /// # Errors
    ///
    /// Returns `SeriesError::MissingSeries` when no series has this label.
    pub fn min(&self, label: &str) -> Result<Option<f64>, SeriesError> {
        Ok(self.summary_with(label, FailurePolicy::default())?.map(|s| s.min))
    }

    /// Draw every series as a line chart and return the image path.
    ///
    /// # Errors
    ///
    /// Returns an error if the chart cannot be rendered or written.
    pub fn display(&self, title: Option<&str>, options: &ChartOptions) -> AppResult<PathBuf> {
        let title = title.map_or_else(
            || format!("Statistics for {} series", self.len()),
            str::to_owned,
        );
        chart_times(self, &title, options)
    }

    fn samples_mut(&mut self, label: &str) -> &mut Vec<Sample> {
        let order = &mut self.order;
        self.data.entry(label.to_owned()).or_insert_with(|| {
            order.push(label.to_owned());
            Vec::new()
        })
    }
}

/// Iterator over `(label, samples)` pairs in label creation order.
#[derive(Debug, Clone)]
pub struct Iter<'series> {
    order: std::slice::Iter<'series, String>,
    data: &'series HashMap<String, Vec<Sample>>,
}

impl<'series> Iterator for Iter<'series> {
    type Item = (&'series str, &'series [Sample]);

    fn next(&mut self) -> Option<Self::Item> {
        let label = self.order.next()?;
        let samples = self.data.get(label)?;
        Some((label.as_str(), samples.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<'series> IntoIterator for &'series TimeSeries {
    type Item = (&'series str, &'series [Sample]);
    type IntoIter = Iter<'series>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
