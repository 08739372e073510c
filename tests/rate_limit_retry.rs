//! Rate-limit handling against raw sockets.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use agify_contract::config::HarnessConfig;
use agify_contract::request::QueryParams;
use agify_contract::{DispatchError, Dispatcher};

use common::RawReply;

mod common;

fn params() -> QueryParams {
    let mut params = QueryParams::new();
    params.set("name", "edzelle");
    params
}

fn counting_backend(
    replies: impl Fn(u32) -> RawReply + Send + Sync + 'static,
) -> (Arc<AtomicU32>, impl Fn() -> std::future::Ready<RawReply> + Send + Sync + 'static) {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let handler = move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        std::future::ready(replies(n))
    };
    (calls, handler)
}

#[tokio::test]
async fn test_retries_once_after_retry_after() {
    let (calls, handler) = counting_backend(|n| {
        if n == 0 {
            RawReply::json(429, r#"{"error":"Request limit reached"}"#).header("Retry-After", "1")
        } else {
            RawReply::json(200, r#"{"count":4,"name":"edzelle","age":44}"#)
        }
    });
    let addr = common::start_programmable_backend(handler).await;

    let dispatcher = Dispatcher::from_config(&HarnessConfig::default()).unwrap();
    let started = Instant::now();
    let response = dispatcher
        .send(&format!("http://{}", addr), &params())
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(950));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(response.status(), 200);
    assert_eq!(response.body()["age"], 44);
}

#[tokio::test]
async fn test_second_rate_limit_is_returned() {
    let (calls, handler) = counting_backend(|_| {
        RawReply::json(429, r#"{"error":"Request limit reached"}"#).header("Retry-After", "1")
    });
    let addr = common::start_programmable_backend(handler).await;

    let dispatcher = Dispatcher::from_config(&HarnessConfig::default()).unwrap();
    let response = dispatcher
        .send(&format!("http://{}", addr), &params())
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(response.status(), 429);
    assert_eq!(response.header("retry-after"), Some("1"));
}

#[tokio::test]
async fn test_rate_limit_without_header_is_not_retried() {
    let (calls, handler) =
        counting_backend(|_| RawReply::json(429, r#"{"error":"Request limit reached"}"#));
    let addr = common::start_programmable_backend(handler).await;

    let dispatcher = Dispatcher::from_config(&HarnessConfig::default()).unwrap();
    let response = dispatcher
        .send(&format!("http://{}", addr), &params())
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(response.status(), 429);
}

#[tokio::test]
async fn test_retry_disabled_by_config() {
    let (calls, handler) = counting_backend(|_| {
        RawReply::json(429, r#"{"error":"Request limit reached"}"#).header("Retry-After", "1")
    });
    let addr = common::start_programmable_backend(handler).await;

    let mut config = HarnessConfig::default();
    config.retry.enabled = false;
    let dispatcher = Dispatcher::from_config(&config).unwrap();
    let response = dispatcher
        .send(&format!("http://{}", addr), &params())
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(response.status(), 429);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dispatcher = Dispatcher::from_config(&HarnessConfig::default()).unwrap();
    let err = dispatcher
        .send(&format!("http://{}", addr), &params())
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Transport(_)));
}

#[tokio::test]
async fn test_hangup_is_transport_error() {
    let addr = common::start_hangup_backend().await;

    let dispatcher = Dispatcher::from_config(&HarnessConfig::default()).unwrap();
    let err = dispatcher
        .send(&format!("http://{}", addr), &params())
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Transport(_)));
}
