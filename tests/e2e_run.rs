mod support;

use std::fs;
use std::time::Duration;

use tempfile::tempdir;

use driftbench::args::PositiveUsize;
use driftbench::error::AppError;
use driftbench::http::{ApiCall, ReqwestApiClient};
use driftbench::runner::Runner;
use driftbench::series::{Sample, TimeSeries};

use support::{API_KEY, run_driftbench, spawn_http_server};

fn output_text(output: &std::process::Output) -> String {
    format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn e2e_run_dumps_series_and_reports_it() -> Result<(), String> {
    let (url, _server) = spawn_http_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let dump_path = dir.path().join("series.json");
    let dump_arg = dump_path.to_string_lossy().into_owned();

    let output = run_driftbench(
        dir.path(),
        [
            "categories",
            "brands",
            "-l",
            "cats",
            "--api-root",
            url.as_str(),
            "--api-key",
            API_KEY,
            "-n",
            "3",
            "--wait",
            "10ms",
            "--dump",
            dump_arg.as_str(),
            "--no-chart",
        ],
    )?;
    if !output.status.success() {
        return Err(output_text(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("Statistics for the cats series:")
        || !stdout.contains("Statistics for the GET /brands series:")
    {
        return Err(format!("Missing report blocks:\n{}", stdout));
    }

    let file = fs::File::open(&dump_path).map_err(|err| format!("open dump failed: {}", err))?;
    let series = TimeSeries::load(file).map_err(|err| format!("load dump failed: {}", err))?;
    let labels: Vec<&str> = series.labels().collect();
    if labels != ["cats", "GET /brands"] {
        return Err(format!("Unexpected labels: {:?}", labels));
    }
    for (label, samples) in &series {
        if samples.len() != 3 || samples.iter().any(Sample::is_failed) {
            return Err(format!("Unexpected samples for {}: {:?}", label, samples));
        }
    }

    let report = run_driftbench(dir.path(), ["report", dump_arg.as_str(), "--no-chart"])?;
    if !report.status.success() {
        return Err(output_text(&report));
    }
    let report_stdout = String::from_utf8_lossy(&report.stdout);
    if !report_stdout.contains("Statistics for the cats series:")
        || !report_stdout.contains("Failures: 0 of 3")
    {
        return Err(format!("Unexpected report output:\n{}", report_stdout));
    }
    Ok(())
}

#[test]
fn e2e_unknown_endpoint_fails_without_requests() -> Result<(), String> {
    let (url, _server) = spawn_http_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let output = run_driftbench(
        dir.path(),
        [
            "categories",
            "unknownendpoint",
            "--api-root",
            url.as_str(),
            "--api-key",
            API_KEY,
            "-n",
            "1",
            "--no-chart",
        ],
    )?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", output_text(&output)));
    }
    if !String::from_utf8_lossy(&output.stderr).contains("unknownendpoint") {
        return Err(format!("Error should name the endpoint\n{}", output_text(&output)));
    }
    if !output.stdout.is_empty() {
        return Err(format!("Nothing should have been reported\n{}", output_text(&output)));
    }
    Ok(())
}

#[test]
fn e2e_config_endpoint_and_chart() -> Result<(), String> {
    let (url, _server) = spawn_http_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let chart_path = dir.path().join("out").join("chart.png");
    let config = format!(
        r#"
api_root = "{}"
api_key = "{}"
runs = 2

[endpoints.shop_sizes]
path = "sizes"
label = "sizes from config"
"#,
        url, API_KEY
    );
    fs::write(dir.path().join("driftbench.toml"), config)
        .map_err(|err| format!("write config failed: {}", err))?;

    let chart_arg = chart_path.to_string_lossy().into_owned();
    let output = run_driftbench(dir.path(), ["shop_sizes", "--chart", chart_arg.as_str()])?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        // Rendering needs system fonts; a plotting failure is not what this test checks.
        if stderr.contains("Plotters") {
            return Ok(());
        }
        return Err(output_text(&output));
    }
    if !String::from_utf8_lossy(&output.stdout).contains("Failures: 0 of 2") {
        return Err(format!("Unexpected output\n{}", output_text(&output)));
    }
    if !chart_path.exists() {
        return Err(format!("Missing chart at {}", chart_path.display()));
    }
    Ok(())
}

#[test]
fn e2e_missing_api_key_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_driftbench(dir.path(), ["--api-root", "http://127.0.0.1:9", "brands"])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", output_text(&output)));
    }
    Ok(())
}

fn block_on<F>(future: F) -> Result<(), String>
where
    F: std::future::Future<Output = Result<(), String>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("runtime failed: {}", err))?
        .block_on(future)
}

#[test]
fn runner_records_timeouts_against_slow_server() -> Result<(), String> {
    block_on(async {
        let (url, _server) = spawn_http_server()?;
        let client = ReqwestApiClient::new(&url, API_KEY, Duration::from_millis(100))
            .map_err(|err| format!("client failed: {}", err))?;
        let runs = PositiveUsize::try_from(2_usize).map_err(|err| format!("runs failed: {}", err))?;
        let mut runner = Runner::new(client).with_runs(runs);

        let (samples, _) = runner
            .execute(&ApiCall::get("slow"), Some("slow"), None)
            .await
            .map_err(|err| format!("execute failed: {}", err))?;
        if samples != [Sample::Failed, Sample::Failed] {
            return Err(format!("Expected two failures, got {:?}", samples));
        }
        Ok(())
    })
}

#[test]
fn runner_stops_on_client_error_status() -> Result<(), String> {
    block_on(async {
        let (url, _server) = spawn_http_server()?;
        let client = ReqwestApiClient::new(&url, "wrong-key", Duration::from_secs(2))
            .map_err(|err| format!("client failed: {}", err))?;
        let mut runner = Runner::new(client);

        match runner.categories(None, None).await {
            Err(AppError::Http(err)) if !err.is_transient() => {}
            Err(err) => return Err(format!("Unexpected error: {}", err)),
            Ok(_) => return Err("Expected 401 to abort the run".to_owned()),
        }
        if runner.series().contains("GET /categories") {
            return Err("A failed first call should not create a series".to_owned());
        }
        Ok(())
    })
}
