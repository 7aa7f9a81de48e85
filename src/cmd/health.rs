//! `portico health` — check the readiness of a running instance.
//!
//! Probes `GET /ready` (expects 204), then fetches the `/about`
//! descriptor and displays it as formatted text or raw JSON.

use std::time::Duration;

use http_body_util::BodyExt;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::about::AboutResponse;
use crate::cli::HealthArgs;
use crate::error::PorticoError;

type ProbeClient = Client<HttpConnector, http_body_util::Full<bytes::Bytes>>;

pub async fn execute(args: HealthArgs) -> Result<(), PorticoError> {
    let base = args.url.trim_end_matches('/');

    let connector = HttpConnector::new();
    let client: ProbeClient = Client::builder(TokioExecutor::new()).build(connector);

    let (status, _) = request(&client, &format!("{base}/ready")).await?;
    if status != hyper::StatusCode::NO_CONTENT {
        return Err(PorticoError::ProbeFailed(status));
    }

    let (about_status, body) = request(&client, &format!("{base}/about")).await?;

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    println!("\u{2713} portico is ready ({})", args.url);

    if !about_status.is_success() {
        println!("  descriptor:    unavailable (status {about_status})");
        return Ok(());
    }

    let body_str = String::from_utf8_lossy(&body);
    match serde_json::from_str::<AboutResponse>(&body_str) {
        Ok(about) => {
            println!("  name:          {}", about.name);
            println!("  version:       {}", about.version);
            println!("  modified:      {}", about.date_modified);
            println!("  documentation: {}", about.documentation);
            println!(
                "  formats:       {} in, {} out",
                about.input_format, about.output_format
            );
        }
        Err(e) => {
            eprintln!("Failed to parse /about response: {e}");
            println!("{body_str}");
        }
    }

    Ok(())
}

async fn request(
    client: &ProbeClient,
    url: &str,
) -> Result<(hyper::StatusCode, bytes::Bytes), PorticoError> {
    let uri: hyper::Uri =
        url.parse()
            .map_err(|e: hyper::http::uri::InvalidUri| PorticoError::UriParse {
                source: Box::new(e),
            })?;

    let req = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| PorticoError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| PorticoError::HttpRequest {
            source: "probe timed out after 10s".into(),
        })?
        .map_err(|e| PorticoError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| PorticoError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    Ok((status, body))
}
