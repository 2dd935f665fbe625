use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Await `future` and return its output with the wall-clock time it took.
pub async fn timed<F>(future: F) -> (F::Output, Duration)
where
    F: Future,
{
    let stopwatch = Stopwatch::start();
    let output = future.await;
    (output, stopwatch.elapsed())
}

/// Scoped timer for a single call.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}
