// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::fetch_policy::FetchPolicy;
use crate::engines::fetcher::Fetcher;
use crate::engines::rate_gate::RateGate;
use crate::engines::traits::{FetchOutcome, HttpTransport, TransportError, TransportResponse};
use crate::engines::user_agents::UserAgentPool;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// 按脚本逐次返回预设响应的假传输
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    agents_seen: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<TransportResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            agents_seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.agents_seen.lock().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(
        &self,
        _url: &str,
        user_agent: &str,
        _timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        self.agents_seen.lock().push(user_agent.to_string());
        self.script
            .lock()
            .pop_front()
            .unwrap_or(Err(TransportError::Network("script exhausted".into())))
    }
}

fn ok(status: u16, body: &str) -> Result<TransportResponse, TransportError> {
    Ok(TransportResponse {
        status,
        body: body.to_string(),
    })
}

fn fetcher_with(transport: Arc<ScriptedTransport>, policy: FetchPolicy) -> Fetcher {
    Fetcher::new(
        transport,
        RateGate::new(1),
        Arc::new(UserAgentPool::default()),
        policy,
    )
}

#[tokio::test(start_paused = true)]
async fn test_success_short_circuits_retry_loop() {
    let transport = ScriptedTransport::new(vec![ok(200, "<html>listing</html>")]);
    let fetcher = fetcher_with(Arc::clone(&transport), FetchPolicy::default());

    let outcome = fetcher.fetch("http://example.com/1").await;

    assert_eq!(
        outcome,
        FetchOutcome::Success {
            body: "<html>listing</html>".to_string()
        }
    );
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_after_exactly_retries_attempts() {
    let transport = ScriptedTransport::new(vec![
        ok(500, ""),
        Err(TransportError::Timeout),
        Err(TransportError::Network("connection reset".into())),
        ok(200, "never reached"),
    ]);
    let policy = FetchPolicy {
        retries: 3,
        ..Default::default()
    };
    let fetcher = fetcher_with(Arc::clone(&transport), policy);

    let outcome = fetcher.fetch("http://example.com/2").await;

    assert_eq!(outcome, FetchOutcome::Exhausted);
    assert_eq!(transport.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_takes_longer_backoff_but_burns_an_attempt() {
    let transport = ScriptedTransport::new(vec![ok(429, ""), ok(200, "recovered")]);
    let fetcher = fetcher_with(Arc::clone(&transport), FetchPolicy::default());

    let start = Instant::now();
    let outcome = fetcher.fetch("http://example.com/3").await;

    // 1s before attempt 0, 5s penalty after 429, 2s before attempt 1
    assert!(outcome.is_success());
    assert_eq!(transport.calls(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(8));
}

#[tokio::test(start_paused = true)]
async fn test_plain_failure_waits_less_than_rate_limit() {
    let transport = ScriptedTransport::new(vec![ok(503, ""), ok(200, "recovered")]);
    let fetcher = fetcher_with(Arc::clone(&transport), FetchPolicy::default());

    let start = Instant::now();
    let outcome = fetcher.fetch("http://example.com/4").await;

    // 1s before attempt 0, no penalty, 2s before attempt 1
    assert!(outcome.is_success());
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_user_agent_rotates_on_every_attempt() {
    let transport = ScriptedTransport::new(vec![
        ok(500, ""),
        Err(TransportError::Timeout),
        ok(200, "done"),
    ]);
    let fetcher = fetcher_with(Arc::clone(&transport), FetchPolicy::default());

    fetcher.fetch("http://example.com/5").await;

    let seen = transport.agents_seen.lock().clone();
    assert_eq!(seen.len(), 3);
    assert_ne!(seen[0], seen[1]);
    assert_ne!(seen[1], seen[2]);
}

#[tokio::test(start_paused = true)]
async fn test_permit_released_after_exhaustion() {
    let transport = ScriptedTransport::new(vec![ok(500, ""), ok(500, ""), ok(500, "")]);
    let fetcher = fetcher_with(Arc::clone(&transport), FetchPolicy::default());

    let outcome = fetcher.fetch("http://example.com/6").await;

    assert_eq!(outcome, FetchOutcome::Exhausted);
    assert_eq!(fetcher.gate().available(), 1);
}
