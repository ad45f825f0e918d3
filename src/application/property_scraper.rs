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

use crate::domain::models::job::ScrapingStats;
use crate::domain::models::property::{Property, SearchCriteria};
use crate::domain::services::site_adapter::SiteAdapter;
use crate::domain::services::validation::PropertyValidator;
use crate::engines::batch::BatchFetcher;
use crate::engines::fetch_policy::FetchPolicy;
use crate::engines::fetcher::Fetcher;
use crate::engines::rate_gate::RateGate;
use crate::engines::traits::{FetchOutcome, HttpTransport};
use crate::engines::user_agents::UserAgentPool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 一次抓取会话的实时进度
///
/// 记录已产出的有效记录数和失败页面数，供状态查询在
/// 会话运行期间读取
#[derive(Debug, Default)]
pub struct ScrapeProgress {
    /// 已产出的有效记录数
    scraped: AtomicUsize,
    /// 失败页面数
    failed: AtomicUsize,
}

impl ScrapeProgress {
    /// 已产出的有效记录数
    pub fn scraped(&self) -> usize {
        self.scraped.load(Ordering::Relaxed)
    }

    /// 失败页面数
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    fn record_success(&self) {
        self.scraped.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}

/// 一次抓取会话的产物
///
/// 结果按值返回给调用方，会话之间不共享可变累积列表
#[derive(Debug)]
pub struct ScrapeReport {
    /// 通过校验的房源记录
    pub properties: Vec<Property>,
    /// 抓取、解析或校验失败的URL，供诊断使用，不自动重试
    pub failed_urls: Vec<String>,
}

/// 房源抓取协调器
///
/// 为一次搜索请求串联批量抓取、页面解析、记录校验与
/// 条件过滤。解析与校验逻辑通过注入的接口消费。
pub struct PropertyScraper {
    /// 批量抓取器
    batch: BatchFetcher,
    /// 站点适配器
    adapter: Arc<dyn SiteAdapter>,
    /// 房源校验器
    validator: Arc<dyn PropertyValidator>,
    /// 实时进度
    progress: Arc<ScrapeProgress>,
    /// 本会话的并发上限
    max_concurrent: usize,
    /// 基础请求延迟
    request_delay: Duration,
}

impl PropertyScraper {
    /// 创建新的抓取协调器
    ///
    /// 每个协调器持有自己的并发闸门，并发额度不跨会话共享
    ///
    /// # 参数
    ///
    /// * `transport` - HTTP传输实现
    /// * `adapter` - 站点适配器
    /// * `validator` - 房源校验器
    /// * `policy` - 重试策略
    /// * `max_concurrent` - 本会话的并发上限
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        adapter: Arc<dyn SiteAdapter>,
        validator: Arc<dyn PropertyValidator>,
        policy: FetchPolicy,
        max_concurrent: usize,
    ) -> Self {
        let request_delay = policy.request_delay;
        let gate = RateGate::new(max_concurrent);
        let fetcher = Fetcher::new(
            transport,
            gate,
            Arc::new(UserAgentPool::default()),
            policy,
        );

        Self {
            batch: BatchFetcher::new(Arc::new(fetcher)),
            adapter,
            validator,
            progress: Arc::new(ScrapeProgress::default()),
            max_concurrent,
            request_delay,
        }
    }

    /// 实时进度句柄
    pub fn progress(&self) -> Arc<ScrapeProgress> {
        Arc::clone(&self.progress)
    }

    /// 抓取一组房源URL
    ///
    /// 单个页面的解析或校验失败只影响该页面，不会中断其余页面
    pub async fn scrape_urls(&self, urls: &[String]) -> ScrapeReport {
        info!(
            count = urls.len(),
            site = self.adapter.name(),
            "starting property scrape"
        );

        let outcomes = self.batch.fetch_all(urls).await;

        let mut properties = Vec::new();
        let mut failed_urls = Vec::new();

        for (url, outcome) in urls.iter().zip(outcomes) {
            let body = match outcome {
                FetchOutcome::Success { body } => body,
                outcome => {
                    debug!(url, ?outcome, "page fetch failed");
                    self.progress.record_failure();
                    failed_urls.push(url.clone());
                    continue;
                }
            };

            match self.adapter.parse(url, &body) {
                Ok(Some(property)) => {
                    let (valid, validation_errors) = self.validator.validate(&property);
                    if valid {
                        self.progress.record_success();
                        properties.push(property);
                    } else {
                        warn!(url, ?validation_errors, "property failed validation");
                        self.progress.record_failure();
                        failed_urls.push(url.clone());
                    }
                }
                Ok(None) => {
                    debug!(url, "no property found on page");
                    self.progress.record_failure();
                    failed_urls.push(url.clone());
                }
                Err(e) => {
                    error!(url, error = %e, "failed to parse property page");
                    self.progress.record_failure();
                    failed_urls.push(url.clone());
                }
            }
        }

        info!(
            scraped = properties.len(),
            failed = failed_urls.len(),
            "property scrape finished"
        );

        ScrapeReport {
            properties,
            failed_urls,
        }
    }

    /// 按搜索条件抓取
    ///
    /// 候选URL由站点适配器推导，抓取完成后应用条件过滤
    pub async fn scrape_search(
        &self,
        criteria: &SearchCriteria,
        max_properties: usize,
    ) -> anyhow::Result<ScrapeReport> {
        let urls = self.adapter.listing_urls(criteria, max_properties)?;
        info!(
            count = urls.len(),
            location = %criteria.location,
            "derived candidate listing urls"
        );

        let report = self.scrape_urls(&urls).await;

        let total = report.properties.len();
        let properties: Vec<Property> = report
            .properties
            .into_iter()
            .filter(|p| criteria.matches(p))
            .take(max_properties)
            .collect();
        info!(kept = properties.len(), total, "applied search criteria filter");

        Ok(ScrapeReport {
            properties,
            failed_urls: report.failed_urls,
        })
    }

    /// 本会话的统计
    pub fn stats(&self) -> ScrapingStats {
        ScrapingStats::new(
            self.progress.scraped(),
            self.progress.failed(),
            self.max_concurrent,
            self.request_delay.as_secs_f64(),
        )
    }
}
