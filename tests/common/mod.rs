//! Shared utilities for gateway integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use policy_gateway::config::GatewayConfig;
use policy_gateway::http::HttpServer;
use policy_gateway::lifecycle::Shutdown;

/// Start a mock origin returning a fixed response, counting every
/// connection it receives.
///
/// The returned counter is the number of times the origin was contacted;
/// blocked requests must leave it at zero.
pub async fn start_counting_origin(
    addr: SocketAddr,
    status: u16,
    content_type: &'static str,
    body: &'static str,
) -> Arc<AtomicU32> {
    let listener = TcpListener::bind(addr).await.unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let response_str = format!(
                        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status_text(status),
                        content_type,
                        body.len(),
                        body
                    );
                    tokio::spawn(async move {
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    hits
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Gateway config pointing at a local mock origin.
pub fn gateway_config(origin: SocketAddr) -> GatewayConfig {
    GatewayConfig {
        target_url: format!("http://{}", origin.ip()),
        target_port: origin.port().to_string(),
        blocked_headers: vec!["Blocked-Header".to_string()],
        blocked_query_params: vec!["blockedParam".to_string()],
        masked_needed_keys: vec!["password".to_string(), "creditCard".to_string()],
        ..GatewayConfig::default()
    }
}

/// Spawn a gateway on the given address; trigger the returned coordinator
/// to stop it.
pub async fn start_gateway(proxy_addr: SocketAddr, config: GatewayConfig) -> Shutdown {
    let shutdown = Shutdown::new();
    let (_config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind(proxy_addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    shutdown
}

/// Non-pooled client so every request opens a fresh connection.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
