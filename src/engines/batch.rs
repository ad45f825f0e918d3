// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engines::fetcher::Fetcher;
use crate::engines::traits::FetchOutcome;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 批量抓取器
///
/// 将一组URL并发地散给抓取器，实际并发度由共享的并发闸门
/// 限制。返回的结果按输入位置一一对应，与完成顺序无关。
pub struct BatchFetcher {
    /// 单URL抓取器
    fetcher: Arc<Fetcher>,
}

impl BatchFetcher {
    /// 创建新的批量抓取器
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }

    /// 单URL抓取器
    pub fn fetcher(&self) -> &Arc<Fetcher> {
        &self.fetcher
    }

    /// 并发抓取一组URL
    ///
    /// 对于N个输入URL总是返回长度为N的结果序列，第i项对应第i个
    /// URL。某个抓取任务的意外崩溃被折叠为该位置的失败结果，
    /// 不会取消或影响兄弟任务。
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<FetchOutcome> {
        info!(count = urls.len(), "fetching pages concurrently");
        let start = Instant::now();

        let handles: Vec<JoinHandle<FetchOutcome>> = urls
            .iter()
            .map(|url| {
                let fetcher = Arc::clone(&self.fetcher);
                let url = url.clone();
                tokio::spawn(async move { fetcher.fetch(&url).await })
            })
            .collect();

        let joined = join_all(handles).await;

        let mut outcomes = Vec::with_capacity(urls.len());
        for (url, result) in urls.iter().zip(joined) {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    error!(url, error = %e, "fetch task aborted");
                    outcomes.push(FetchOutcome::Network {
                        message: format!("fetch task aborted: {e}"),
                    });
                }
            }
        }

        let successful = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            successful,
            failed = urls.len() - successful,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "batch finished"
        );

        outcomes
    }
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
