//! Line charts of latency series.
mod naming;
mod times;


pub use times::{ChartOptions, DEFAULT_UNITS, chart_times};
