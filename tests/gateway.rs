//! End-to-end tests for the policy gateway.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_blocked_header_returns_403_without_origin_call() {
    let origin_addr: SocketAddr = "127.0.0.1:29101".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29102".parse().unwrap();

    let hits = common::start_counting_origin(origin_addr, 200, "text/plain", "ok").await;
    let shutdown = common::start_gateway(proxy_addr, common::gateway_config(origin_addr)).await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let res = common::test_client()
        .get(format!("http://{}/test", proxy_addr))
        .header("Blocked-Header", "test-value")
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.text().await.unwrap(), "Request blocked by proxy rules");
    assert_eq!(
        hits.load(Ordering::SeqCst),
        0,
        "Origin must not be contacted for blocked requests"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_blocked_query_param_returns_403_without_origin_call() {
    let origin_addr: SocketAddr = "127.0.0.1:29111".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29112".parse().unwrap();

    let hits = common::start_counting_origin(origin_addr, 200, "text/plain", "ok").await;
    let shutdown = common::start_gateway(proxy_addr, common::gateway_config(origin_addr)).await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let res = common::test_client()
        .get(format!("http://{}/test?blockedParam=value", proxy_addr))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.text().await.unwrap(), "Request blocked by proxy rules");
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_clean_request_passes_through_with_origin_status() {
    let origin_addr: SocketAddr = "127.0.0.1:29121".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29122".parse().unwrap();

    let hits = common::start_counting_origin(origin_addr, 404, "text/plain", "nothing here").await;
    let shutdown = common::start_gateway(proxy_addr, common::gateway_config(origin_addr)).await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let res = common::test_client()
        .get(format!("http://{}/test?other=value", proxy_addr))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "nothing here");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_mutating_method_with_blocked_header_is_forwarded() {
    let origin_addr: SocketAddr = "127.0.0.1:29131".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29132".parse().unwrap();

    let hits = common::start_counting_origin(origin_addr, 200, "text/plain", "accepted").await;
    let shutdown = common::start_gateway(proxy_addr, common::gateway_config(origin_addr)).await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    // Only GET is gated; the asymmetry is a configuration choice.
    let res = common::test_client()
        .post(format!("http://{}/submit", proxy_addr))
        .header("Blocked-Header", "test-value")
        .body("payload")
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_json_response_is_masked_with_rewritten_content_length() {
    let origin_addr: SocketAddr = "127.0.0.1:29141".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29142".parse().unwrap();

    common::start_counting_origin(
        origin_addr,
        200,
        "application/json",
        r#"{"password":"12345","creditCard":"1234-4567-8787"}"#,
    )
    .await;
    let shutdown = common::start_gateway(proxy_addr, common::gateway_config(origin_addr)).await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let res = common::test_client()
        .get(format!("http://{}/account", proxy_addr))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    let expected = r#"{"password":"*****","creditCard":"**************"}"#;
    assert_eq!(res.content_length(), Some(expected.len() as u64));
    assert_eq!(res.text().await.unwrap(), expected);

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_json_response_passes_through_unmodified() {
    let origin_addr: SocketAddr = "127.0.0.1:29151".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29152".parse().unwrap();

    common::start_counting_origin(origin_addr, 200, "text/html", "<html></html>").await;
    let shutdown = common::start_gateway(proxy_addr, common::gateway_config(origin_addr)).await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let res = common::test_client()
        .get(format!("http://{}/page", proxy_addr))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "<html></html>");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_origin_returns_502() {
    // No origin listening on this port.
    let origin_addr: SocketAddr = "127.0.0.1:29161".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29162".parse().unwrap();

    let shutdown = common::start_gateway(proxy_addr, common::gateway_config(origin_addr)).await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let res = common::test_client()
        .get(format!("http://{}/test", proxy_addr))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    shutdown.trigger();
}
