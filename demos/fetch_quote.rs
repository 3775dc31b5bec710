//! Fetches a JSON document through a hardened client and prints its health.
//!
//! Run with: cargo run --example fetch_quote
//! Against a live endpoint: cargo run --example fetch_quote -- https://httpbin.org/json
//! With logs: RUST_LOG=debug cargo run --example fetch_quote

use bytes::Bytes;
use hardened_client::{HardenedClient, HttpRequest, HttpResponse, TransportError};
use http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    match std::env::args().nth(1) {
        Some(url) => live(&url).await,
        None => scripted().await,
    }
}

async fn live(url: &str) {
    let client = match HardenedClient::reqwest() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("Could not build transport: {err}");
            return;
        }
    };

    for round in 1..=2 {
        let result = client
            .get_cached::<Value>(url, url, Some(Duration::from_secs(30)))
            .await;
        println!("Round {round}: {result:?}");
    }
    print_health(&client.health_report());
}

async fn scripted() {
    // Two server errors before the quote is available
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let transport = tower::service_fn(move |req: HttpRequest| {
        let n = c.fetch_add(1, Ordering::SeqCst);
        println!("Transport called for {} (call {})", req.url, n + 1);
        async move {
            if n < 2 {
                Ok::<_, TransportError>(HttpResponse::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    Bytes::new(),
                ))
            } else {
                Ok(HttpResponse::new(
                    StatusCode::OK,
                    Bytes::from_static(br#"{"pair": "ETH-USDC", "price": 3150.25}"#),
                ))
            }
        }
    });

    let client = HardenedClient::builder(transport).name("quotes").build();

    // The first call retries, the second is served from the cache
    for round in 1..=2 {
        let quote: Result<Value, _> = client
            .get_cached("https://api.example.com/quote?pair=ETH-USDC", "quote:ETH-USDC", None)
            .await;
        println!("Round {round}: {quote:?}");
    }
    println!("Transport calls: {}", calls.load(Ordering::SeqCst));
    print_health(&client.health_report());
}

fn print_health(report: &hardened_client::HealthReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("Could not serialize health report: {err}"),
    }
}
