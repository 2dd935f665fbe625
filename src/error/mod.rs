mod app;
mod config;
mod http;
mod runner;
mod series;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use runner::RunnerError;
pub use series::SeriesError;
pub use validation::ValidationError;
