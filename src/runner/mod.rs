//! Sequential endpoint runner that times repeated calls into a
//! [`TimeSeries`].
mod endpoints;
mod progress;
mod timing;


use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::args::PositiveUsize;
use crate::charts::ChartOptions;
use crate::config::Settings;
use crate::error::{AppError, AppResult, RunnerError, SeriesError, ValidationError};
use crate::http::{ApiCall, ApiClient};
use crate::series::{DumpOptions, FailurePolicy, Sample, SeriesStatistics, TimeSeries};

use progress::Progress;

pub use endpoints::{BUILTIN_ENDPOINTS, Endpoint, EndpointRegistry};
pub use timing::{Stopwatch, timed};

pub const DEFAULT_RUNS: usize = 100;

/// Calls an endpoint `runs` times in a row and records one sample per call.
///
/// Timeouts and connection failures become [`Sample::Failed`]; any other
/// client error stops the current endpoint and is returned.
#[derive(Debug)]
pub struct Runner<C> {
    client: C,
    runs: usize,
    wait: Option<Duration>,
    debug: bool,
    endpoints: EndpointRegistry,
    series: TimeSeries,
}

impl<C> Runner<C>
where
    C: ApiClient,
{
    /// Runner with the builtin endpoints, 100 runs and no wait.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            runs: DEFAULT_RUNS,
            wait: None,
            debug: false,
            endpoints: EndpointRegistry::builtin(),
            series: TimeSeries::new(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if a configured endpoint reuses a builtin name.
    pub fn from_settings(client: C, settings: &Settings) -> AppResult<Self> {
        let endpoints = EndpointRegistry::with_config(&settings.endpoints)?;
        Ok(Self::new(client)
            .with_runs(settings.runs)
            .with_wait(settings.wait)
            .with_debug(settings.debug)
            .with_endpoints(endpoints))
    }

    #[must_use]
    pub fn with_runs(mut self, runs: PositiveUsize) -> Self {
        self.runs = runs.get();
        self
    }

    #[must_use]
    pub fn with_wait(mut self, wait: Option<Duration>) -> Self {
        self.wait = wait;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: EndpointRegistry) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Continue an existing store instead of starting empty.
    #[must_use]
    pub fn with_series(mut self, series: TimeSeries) -> Self {
        self.series = series;
        self
    }

    #[must_use]
    pub const fn runs(&self) -> usize {
        self.runs
    }

    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    #[must_use]
    pub const fn endpoints(&self) -> &EndpointRegistry {
        &self.endpoints
    }

    /// Time `runs` calls of `call` into the series named `label`.
    ///
    /// Without a label the series is named `run #<n>`, `n` being one more
    /// than the current number of series. `wait` overrides the runner's
    /// pause between calls. Returns every sample under the label and the
    /// time the whole invocation took.
    ///
    /// # Errors
    ///
    /// Returns the client error for any non-transient failure. Samples
    /// recorded before it stay in the series.
    pub async fn execute(
        &mut self,
        call: &ApiCall,
        label: Option<&str>,
        wait: Option<Duration>,
    ) -> AppResult<(Vec<Sample>, Duration)> {
        let label = label.map_or_else(
            || format!("run #{}", self.series.len().saturating_add(1)),
            str::to_owned,
        );
        let wait = wait.or(self.wait);

        let (outcome, elapsed) = timed(self.record(call, &label, wait)).await;
        outcome?;

        info!(
            "{} x{} as '{}' took {:.3}s",
            call,
            self.runs,
            label,
            elapsed.as_secs_f64()
        );
        Ok((self.series.get_or(&label, &[]).to_vec(), elapsed))
    }

    async fn record(&mut self, call: &ApiCall, label: &str, wait: Option<Duration>) -> AppResult<()> {
        debug!("Starting {} runs of {} into '{}'", self.runs, call, label);
        let mut progress = Progress::new(self.debug);

        for iteration in 1..=self.runs {
            let stopwatch = Stopwatch::start();
            let outcome = self.client.call(call).await;
            let elapsed_ms = stopwatch.elapsed_ms();

            match outcome {
                Ok(_) => self.series.append(label, Sample::Latency(elapsed_ms)),
                Err(err) if err.is_transient() => {
                    warn!("{} failed on run {}: {}", call, iteration, err);
                    self.series.append(label, Sample::Failed);
                }
                Err(err) => {
                    progress.finish();
                    return Err(err.into());
                }
            }
            progress.tick();

            if iteration < self.runs
                && let Some(wait) = wait
            {
                sleep(wait).await;
            }
        }

        progress.finish();
        Ok(())
    }

    /// Run a registered endpoint by name.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::NoSuchRunner` for an unknown name, otherwise
    /// whatever [`Runner::execute`] returns.
    pub async fn run_endpoint(
        &mut self,
        name: &str,
        label: Option<&str>,
        wait: Option<Duration>,
    ) -> AppResult<(Vec<Sample>, Duration)> {
        let endpoint = self.resolve(name)?;
        let label = label.unwrap_or(endpoint.label.as_str());
        self.execute(&endpoint.call, Some(label), wait).await
    }

    /// `GET /categories`.
    ///
    /// # Errors
    ///
    /// See [`Runner::execute`].
    pub async fn categories(
        &mut self,
        label: Option<&str>,
        wait: Option<Duration>,
    ) -> AppResult<(Vec<Sample>, Duration)> {
        self.run_endpoint("categories", label, wait).await
    }

    /// `GET /brands`.
    ///
    /// # Errors
    ///
    /// See [`Runner::execute`].
    pub async fn brands(
        &mut self,
        label: Option<&str>,
        wait: Option<Duration>,
    ) -> AppResult<(Vec<Sample>, Duration)> {
        self.run_endpoint("brands", label, wait).await
    }

    /// `GET /sizes`.
    ///
    /// # Errors
    ///
    /// See [`Runner::execute`].
    pub async fn sizes(
        &mut self,
        label: Option<&str>,
        wait: Option<Duration>,
    ) -> AppResult<(Vec<Sample>, Duration)> {
        self.run_endpoint("sizes", label, wait).await
    }

    /// `GET /merchants`.
    ///
    /// # Errors
    ///
    /// See [`Runner::execute`].
    pub async fn merchants(
        &mut self,
        label: Option<&str>,
        wait: Option<Duration>,
    ) -> AppResult<(Vec<Sample>, Duration)> {
        self.run_endpoint("merchants", label, wait).await
    }

    #[must_use]
    pub fn get_runner(&self, name: &str) -> Option<Endpoint> {
        self.endpoints.get(name).cloned()
    }

    #[must_use]
    pub fn get_runner_or(&self, name: &str, default: Endpoint) -> Endpoint {
        self.get_runner(name).unwrap_or(default)
    }

    /// Run each named endpoint in order.
    ///
    /// All names are resolved before the first request. `labels[i]`, when
    /// present, names the series for `names[i]`. With `prompt` the user
    /// confirms on stdin before every endpoint after the first. Returns the
    /// elapsed time of each endpoint.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::NoSuchRunner` for an unknown name, a validation
    /// error when there are more labels than names, or the first failing
    /// endpoint's error.
    pub async fn run<S>(
        &mut self,
        names: &[S],
        labels: &[String],
        prompt: bool,
    ) -> AppResult<Vec<Duration>>
    where
        S: AsRef<str>,
    {
        if labels.len() > names.len() {
            return Err(AppError::validation(ValidationError::TooManyLabels {
                labels: labels.len(),
                endpoints: names.len(),
            }));
        }
        let endpoints = names
            .iter()
            .map(|name| self.resolve(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut totals = Vec::with_capacity(endpoints.len());
        for (idx, endpoint) in endpoints.iter().enumerate() {
            if prompt && idx > 0 {
                confirm(&endpoint.name).await?;
            }
            let label = labels.get(idx).unwrap_or(&endpoint.label);
            let (_, elapsed) = self.execute(&endpoint.call, Some(label), None).await?;
            totals.push(elapsed);
        }
        Ok(totals)
    }

    fn resolve(&self, name: &str) -> Result<Endpoint, RunnerError> {
        self.get_runner(name).ok_or_else(|| RunnerError::NoSuchRunner {
            name: name.to_owned(),
        })
    }
}

impl<C> Runner<C> {
    #[must_use]
    pub fn statistics(&self) -> Vec<(String, SeriesStatistics)> {
        self.series.statistics()
    }

    #[must_use]
    pub fn statistics_with(&self, policy: FailurePolicy) -> Vec<(String, SeriesStatistics)> {
        self.series.statistics_with(policy)
    }

    /// # Errors
    ///
    /// See [`TimeSeries::dump`].
    pub fn dump<W>(&self, writer: W, options: DumpOptions) -> Result<(), SeriesError>
    where
        W: Write,
    {
        self.series.dump(writer, options)
    }

    /// # Errors
    ///
    /// See [`TimeSeries::display`].
    pub fn display(&self, title: Option<&str>, options: &ChartOptions) -> AppResult<PathBuf> {
        self.series.display(title, options)
    }

    /// # Errors
    ///
    /// See [`TimeSeries::pprint`].
    pub fn pprint(&self, title: Option<&str>) -> Result<String, SeriesError> {
        self.series.pprint(title)
    }

    /// # Errors
    ///
    /// See [`TimeSeries::pprint_with`].
    pub fn pprint_with(
        &self,
        title: Option<&str>,
        policy: FailurePolicy,
    ) -> Result<String, SeriesError> {
        self.series.pprint_with(title, policy)
    }

    #[must_use]
    pub const fn series(&self) -> &TimeSeries {
        &self.series
    }

    #[must_use]
    pub fn into_series(self) -> TimeSeries {
        self.series
    }
}

async fn confirm(next: &str) -> AppResult<()> {
    eprint!("Press Enter to run '{}'...", next);
    drop(std::io::stderr().flush());
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(|err| AppError::runner(RunnerError::Prompt { source: err }))?;
    Ok(())
}
