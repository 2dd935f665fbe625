use std::future::Future;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde_json::json;

use super::{ApiCall, ApiClient, ReqwestApiClient, build_endpoint};
use crate::error::{AppError, AppResult, HttpError};

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

/// Serve one connection with `response` after `delay`, reporting the raw
/// request text on the returned channel.
fn serve_once(
    response: &'static str,
    delay: Duration,
) -> AppResult<(String, mpsc::Receiver<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let (request_tx, request_rx) = mpsc::channel();

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        drop(request_tx.send(read_request(&mut stream)));
        thread::sleep(delay);
        if stream.write_all(response.as_bytes()).is_err() {
            return;
        }
        drop(stream.flush());
        drop(stream.shutdown(Shutdown::Both));
    });

    Ok((format!("http://{}", addr), request_rx))
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buffer = [0u8; 1024];
    loop {
        let read = match stream.read(&mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(read) => read,
        };
        raw.extend_from_slice(buffer.get(..read).unwrap_or_default());
        let text = String::from_utf8_lossy(&raw);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let body_len = text
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if raw.len() >= header_end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw).into_owned()
}

#[test]
fn build_endpoint_joins_segments_with_single_slashes() -> AppResult<()> {
    let url = build_endpoint("https://api.example.com/v1/", &["/categories/", "42"]);
    if url != "https://api.example.com/v1/categories/42" {
        return Err(AppError::validation(format!("Unexpected url: {}", url)));
    }
    let root_only = build_endpoint("https://api.example.com", &["", "/"]);
    if root_only != "https://api.example.com" {
        return Err(AppError::validation(format!("Unexpected url: {}", root_only)));
    }
    Ok(())
}

#[test]
fn api_call_display_shows_method_and_path() -> AppResult<()> {
    let label = ApiCall::post("/orders", json!({ "id": 1 })).to_string();
    if label != "POST /orders" {
        return Err(AppError::validation(format!("Unexpected label: {}", label)));
    }
    if ApiCall::get("brands").to_string() != "GET /brands" {
        return Err(AppError::validation("Unexpected GET label"));
    }
    Ok(())
}

#[test]
fn get_sends_api_key_and_parses_json() -> AppResult<()> {
    run_async_test(async {
        let (root, requests) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 15\r\nConnection: close\r\n\r\n[{\"id\":\"shoe\"}]",
            Duration::ZERO,
        )?;
        let client = ReqwestApiClient::new(&root, "secret-key", Duration::from_secs(5))?;
        let body = client.get("categories").await?;
        if body != json!([{ "id": "shoe" }]) {
            return Err(AppError::validation(format!("Unexpected body: {}", body)));
        }

        let request = requests
            .recv_timeout(Duration::from_secs(1))
            .map_err(|err| AppError::validation(format!("No request seen: {}", err)))?;
        if !request.starts_with("GET /categories ") {
            return Err(AppError::validation(format!("Unexpected request: {}", request)));
        }
        if !request.to_ascii_lowercase().contains("api-key: secret-key") {
            return Err(AppError::validation(format!("Missing API-Key header: {}", request)));
        }
        Ok(())
    })
}

#[test]
fn post_sends_json_body_and_maps_empty_response_to_null() -> AppResult<()> {
    run_async_test(async {
        let (root, requests) = serve_once(
            "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n",
            Duration::ZERO,
        )?;
        let client = ReqwestApiClient::new(&root, "k", Duration::from_secs(5))?;
        let body = client.post("orders", &json!({ "sku": 7 })).await?;
        if !body.is_null() {
            return Err(AppError::validation(format!("Expected null, got {}", body)));
        }

        let request = requests
            .recv_timeout(Duration::from_secs(1))
            .map_err(|err| AppError::validation(format!("No request seen: {}", err)))?;
        let lower = request.to_ascii_lowercase();
        if !lower.contains("content-type: application/json") {
            return Err(AppError::validation(format!("Missing content type: {}", request)));
        }
        if !request.contains("{\"sku\":7}") {
            return Err(AppError::validation(format!("Missing body: {}", request)));
        }
        Ok(())
    })
}

#[test]
fn non_success_status_is_not_transient() -> AppResult<()> {
    run_async_test(async {
        let (root, _requests) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Duration::ZERO,
        )?;
        let client = ReqwestApiClient::new(&root, "k", Duration::from_secs(5))?;
        match client.delete("brands/9").await {
            Err(HttpError::Status {
                method: "DELETE",
                status: 404,
                ref url,
            }) if url.ends_with("/brands/9") => Ok(()),
            Err(err) => Err(AppError::validation(format!("Unexpected error: {}", err))),
            Ok(value) => Err(AppError::validation(format!("Expected 404, got {}", value))),
        }
    })
}

#[test]
fn slow_server_yields_transient_timeout() -> AppResult<()> {
    run_async_test(async {
        let (root, _requests) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
            Duration::from_millis(800),
        )?;
        let client = ReqwestApiClient::new(&root, "k", Duration::from_millis(100))?;
        match client.get("sizes").await {
            Err(err @ HttpError::Timeout { .. }) if err.is_transient() => Ok(()),
            Err(err) => Err(AppError::validation(format!("Unexpected error: {}", err))),
            Ok(value) => Err(AppError::validation(format!("Expected timeout, got {}", value))),
        }
    })
}

#[test]
fn refused_connection_is_transient() -> AppResult<()> {
    run_async_test(async {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        let client =
            ReqwestApiClient::new(&format!("http://{}", addr), "k", Duration::from_secs(2))?;
        match client.get("merchants").await {
            Err(err) if err.is_transient() => Ok(()),
            Err(err) => Err(AppError::validation(format!("Unexpected error: {}", err))),
            Ok(value) => Err(AppError::validation(format!("Expected failure, got {}", value))),
        }
    })
}

#[test]
fn invalid_api_key_is_rejected() -> AppResult<()> {
    match ReqwestApiClient::new("http://localhost", "bad\nkey", Duration::from_secs(1)) {
        Err(HttpError::InvalidApiKey) => Ok(()),
        Err(err) => Err(AppError::validation(format!("Unexpected error: {}", err))),
        Ok(_) => Err(AppError::validation("Expected invalid key")),
    }
}

#[test]
fn connection_closed_before_response_is_transient() -> AppResult<()> {
    run_async_test(async {
        let (root, _requests) = serve_once("", Duration::ZERO)?;
        let client = ReqwestApiClient::new(&root, "k", Duration::from_secs(2))?;
        match client.get("categories").await {
            Err(err @ HttpError::Connection { .. }) if err.is_transient() => Ok(()),
            Err(err) => Err(AppError::validation(format!("Unexpected error: {:?}", err))),
            Ok(value) => Err(AppError::validation(format!("Expected failure, got {}", value))),
        }
    })
}

#[test]
fn truncated_body_is_transient() -> AppResult<()> {
    run_async_test(async {
        let (root, _requests) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\nConnection: close\r\n\r\n[{\"id\"",
            Duration::ZERO,
        )?;
        let client = ReqwestApiClient::new(&root, "k", Duration::from_secs(2))?;
        match client.get("brands").await {
            Err(err) if err.is_transient() => Ok(()),
            Err(err) => Err(AppError::validation(format!("Unexpected error: {:?}", err))),
            Ok(value) => Err(AppError::validation(format!("Expected failure, got {}", value))),
        }
    })
}
