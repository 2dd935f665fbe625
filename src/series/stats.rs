use serde::Serialize;

use super::sample::{FailurePolicy, Sample};

/// Aggregates over the counted samples of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    /// Population variance.
    pub variance: f64,
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStatistics {
    pub count: usize,
    pub failures: usize,
    /// `None` when no sample survived the failure policy.
    pub summary: Option<Summary>,
}

impl SeriesStatistics {
    #[must_use]
    pub fn from_samples(samples: &[Sample], policy: FailurePolicy) -> Self {
        let values: Vec<f64> = samples
            .iter()
            .filter_map(|sample| sample.value(policy))
            .collect();
        Self {
            count: samples.len(),
            failures: samples.iter().filter(|sample| sample.is_failed()).count(),
            summary: Summary::from_values(values),
        }
    }
}

impl Summary {
    #[must_use]
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values
            .iter()
            .map(|value| {
                let delta = value - mean;
                delta * delta
            })
            .sum::<f64>()
            / count;

        Some(Self {
            mean,
            median: median_of_sorted(&values)?,
            stddev: variance.sqrt(),
            variance,
            max: *values.last()?,
            min: *values.first()?,
        })
    }
}

fn median_of_sorted(values: &[f64]) -> Option<f64> {
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        return values.get(mid).copied();
    }
    let upper = values.get(mid)?;
    let lower = values.get(mid.checked_sub(1)?)?;
    Some((lower + upper) / 2.0)
}
