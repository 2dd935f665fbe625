use std::fmt;

use serde::de::{self, Visitor};
use serde::ser;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number written to disk in place of a failed call.
pub const FAILED_SENTINEL: f64 = -1.0;

/// How failed samples take part in statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Drop failed samples before aggregating.
    #[default]
    Exclude,
    /// Aggregate failed samples as [`FAILED_SENTINEL`].
    Include,
}

/// One timed call: its latency in milliseconds, or a failure.
///
/// Build samples from untrusted numbers with [`Sample::from_millis`]; a
/// `Latency` must be finite and non-negative to be dumped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Latency(f64),
    Failed,
}

impl Sample {
    /// Build a sample from a persisted number; negative values are failures.
    #[must_use]
    pub fn from_millis(value: f64) -> Self {
        if value < 0.0 {
            Sample::Failed
        } else {
            Sample::Latency(value)
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Sample::Failed)
    }

    #[must_use]
    pub const fn latency_ms(&self) -> Option<f64> {
        match self {
            Sample::Latency(ms) => Some(*ms),
            Sample::Failed => None,
        }
    }

    /// The value this sample contributes to statistics under `policy`.
    #[must_use]
    pub const fn value(&self, policy: FailurePolicy) -> Option<f64> {
        match (self, policy) {
            (Sample::Latency(ms), _) => Some(*ms),
            (Sample::Failed, FailurePolicy::Include) => Some(FAILED_SENTINEL),
            (Sample::Failed, FailurePolicy::Exclude) => None,
        }
    }
}

impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Sample::from_millis(value)
    }
}

impl Serialize for Sample {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Sample::Latency(ms) if ms.is_finite() && *ms >= 0.0 => serializer.serialize_f64(*ms),
            Sample::Latency(ms) => Err(ser::Error::custom(format!(
                "latency {} ms would not load back as a latency",
                ms
            ))),
            Sample::Failed => serializer.serialize_i64(-1),
        }
    }
}

struct SampleVisitor;

impl Visitor<'_> for SampleVisitor {
    type Value = Sample;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a latency in milliseconds or -1")
    }

    fn visit_f64<E>(self, value: f64) -> Result<Sample, E>
    where
        E: de::Error,
    {
        if value.is_finite() {
            Ok(Sample::from_millis(value))
        } else {
            Err(E::custom("latency must be a finite number"))
        }
    }

    fn visit_i64<E>(self, value: i64) -> Result<Sample, E>
    where
        E: de::Error,
    {
        if value < 0 {
            Ok(Sample::Failed)
        } else {
            Ok(Sample::Latency(value as f64))
        }
    }

    fn visit_u64<E>(self, value: u64) -> Result<Sample, E>
    where
        E: de::Error,
    {
        Ok(Sample::Latency(value as f64))
    }
}

impl<'de> Deserialize<'de> for Sample {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SampleVisitor)
    }
}
