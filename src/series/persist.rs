use std::fmt;
use std::io::{Read, Write};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SeriesError;

use super::{Sample, TimeSeries};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpOptions {
    /// Indent the JSON output.
    pub pretty: bool,
}

impl TimeSeries {
    /// Write the `label -> [samples]` mapping as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    pub fn dump<W>(&self, writer: W, options: DumpOptions) -> Result<(), SeriesError>
    where
        W: Write,
    {
        let written = if options.pretty {
            serde_json::to_writer_pretty(writer, self)
        } else {
            serde_json::to_writer(writer, self)
        };
        written.map_err(|err| SeriesError::Encode { source: err })
    }

    /// Rebuild a series store from the output of [`TimeSeries::dump`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON object of number arrays.
    pub fn load<R>(reader: R) -> Result<Self, SeriesError>
    where
        R: Read,
    {
        serde_json::from_reader(reader).map_err(|err| SeriesError::Decode { source: err })
    }
}

impl Serialize for TimeSeries {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (label, samples) in self {
            map.serialize_entry(label, samples)?;
        }
        map.end()
    }
}

struct TimeSeriesVisitor;

impl<'de> Visitor<'de> for TimeSeriesVisitor {
    type Value = TimeSeries;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping series labels to arrays of numbers")
    }

    fn visit_map<A>(self, mut access: A) -> Result<TimeSeries, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut series = TimeSeries::new();
        while let Some((label, samples)) = access.next_entry::<String, Vec<Sample>>()? {
            series.extend(&label, samples);
        }
        Ok(series)
    }
}

impl<'de> Deserialize<'de> for TimeSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TimeSeriesVisitor)
    }
}
