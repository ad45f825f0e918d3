// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::batch::BatchFetcher;
use crate::engines::fetch_policy::FetchPolicy;
use crate::engines::fetcher::Fetcher;
use crate::engines::rate_gate::RateGate;
use crate::engines::traits::{FetchOutcome, HttpTransport, TransportError, TransportResponse};
use crate::engines::user_agents::UserAgentPool;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// 回显URL作为响应体的假传输，延迟从URL查询参数中读取
struct EchoTransport {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl EchoTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl HttpTransport for EchoTransport {
    async fn get(
        &self,
        url: &str,
        _user_agent: &str,
        _timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if url.contains("panic") {
            panic!("injected failure for {url}");
        }

        // "delay=<ms>" in the query simulates variable page latency
        let delay_ms = url
            .split("delay=")
            .nth(1)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        sleep(Duration::from_millis(delay_ms)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if url.contains("fail") {
            return Err(TransportError::Network("unreachable".into()));
        }

        Ok(TransportResponse {
            status: 200,
            body: url.to_string(),
        })
    }
}

fn batch_with(transport: Arc<EchoTransport>, max_concurrent: usize) -> BatchFetcher {
    let policy = FetchPolicy {
        request_delay: Duration::ZERO,
        ..Default::default()
    };
    let fetcher = Fetcher::new(
        transport,
        RateGate::new(max_concurrent),
        Arc::new(UserAgentPool::default()),
        policy,
    );
    BatchFetcher::new(Arc::new(fetcher))
}

#[tokio::test(start_paused = true)]
async fn test_outcomes_align_with_input_order_despite_latency() {
    let batch = batch_with(EchoTransport::new(), 10);

    // Earlier URLs finish last, completion order is the reverse of input order
    let urls: Vec<String> = (0..5)
        .map(|i| format!("http://site.test/p{}?delay={}", i, (5 - i) * 100))
        .collect();

    let outcomes = batch.fetch_all(&urls).await;

    assert_eq!(outcomes.len(), urls.len());
    for (url, outcome) in urls.iter().zip(&outcomes) {
        assert_eq!(
            outcome,
            &FetchOutcome::Success { body: url.clone() },
            "outcome misaligned for {url}"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_panicking_fetch_does_not_poison_siblings() {
    let batch = batch_with(EchoTransport::new(), 10);

    let urls: Vec<String> = vec![
        "http://site.test/p0".into(),
        "http://site.test/panic".into(),
        "http://site.test/p2".into(),
        "http://site.test/p3".into(),
        "http://site.test/p4".into(),
    ];

    let outcomes = batch.fetch_all(&urls).await;

    assert_eq!(outcomes.len(), 5);
    assert!(matches!(outcomes[1], FetchOutcome::Network { .. }));
    for (i, outcome) in outcomes.iter().enumerate() {
        if i != 1 {
            assert!(outcome.is_success(), "sibling {i} was affected");
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_failed_urls_still_yield_one_outcome_each() {
    let batch = batch_with(EchoTransport::new(), 4);

    let urls: Vec<String> = (0..8)
        .map(|i| {
            if i % 2 == 0 {
                format!("http://site.test/p{i}")
            } else {
                format!("http://site.test/fail{i}")
            }
        })
        .collect();

    let outcomes = batch.fetch_all(&urls).await;

    assert_eq!(outcomes.len(), 8);
    let successful = outcomes.iter().filter(|o| o.is_success()).count();
    assert_eq!(successful, 4);
}

#[tokio::test(start_paused = true)]
async fn test_batch_respects_concurrency_cap() {
    let transport = EchoTransport::new();
    let batch = batch_with(Arc::clone(&transport), 3);

    let urls: Vec<String> = (0..12)
        .map(|i| format!("http://site.test/p{i}?delay=50"))
        .collect();

    batch.fetch_all(&urls).await;

    assert!(transport.peak.load(Ordering::SeqCst) <= 3);
}

#[tokio::test(start_paused = true)]
async fn test_empty_input_returns_empty_batch() {
    let batch = batch_with(EchoTransport::new(), 2);

    let outcomes = batch.fetch_all(&[]).await;

    assert!(outcomes.is_empty());
}
