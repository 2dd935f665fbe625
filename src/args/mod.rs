//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::{ChartArgs, Command, DriftArgs, ReportArgs};
pub use types::{HttpMethod, PositiveUsize};

pub(crate) use defaults::{DEFAULT_USER_AGENT, default_charts_path};
pub(crate) use parsers::parse_duration_arg;
