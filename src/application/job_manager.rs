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

use crate::application::property_scraper::{PropertyScraper, ScrapeProgress};
use crate::domain::models::job::{JobResult, JobSpec, JobState, ScrapingStats};
use crate::domain::services::site_adapter::SiteAdapter;
use crate::domain::services::validation::PropertyValidator;
use crate::engines::fetch_policy::FetchPolicy;
use crate::engines::traits::HttpTransport;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// 作业状态查询结果
#[derive(Debug, Clone)]
pub enum JobStatus {
    /// 运行中，附带当前已产出的记录数
    Running {
        /// 已产出的记录数
        properties_scraped: usize,
    },
    /// 已结束，附带完整结果
    Finished(JobResult),
    /// 未知作业
    NotFound,
}

/// 全部作业的概览
#[derive(Debug, Clone, serde::Serialize)]
pub struct ManagerOverview {
    /// 运行中的作业数
    pub active_jobs: usize,
    /// 已完成的作业数
    pub completed_jobs: usize,
    /// 运行中的作业标识
    pub active_job_ids: Vec<String>,
}

/// 作业管理器
///
/// 并发运行多个命名抓取作业并跟踪其状态。每个作业拥有
/// 独立的抓取协调器和并发配置。作业状态机：
/// Pending -> Running -> {Completed | Failed}，终态不可再变。
pub struct JobManager {
    /// HTTP传输实现，跨作业共享连接池
    transport: Arc<dyn HttpTransport>,
    /// 站点适配器
    adapter: Arc<dyn SiteAdapter>,
    /// 房源校验器
    validator: Arc<dyn PropertyValidator>,
    /// 重试策略模板
    policy: FetchPolicy,
    /// 运行中作业的进度句柄
    active: DashMap<String, Arc<ScrapeProgress>>,
    /// 已完成作业的历史
    history: Mutex<Vec<JobResult>>,
}

impl JobManager {
    /// 创建新的作业管理器
    ///
    /// # 参数
    ///
    /// * `transport` - HTTP传输实现
    /// * `adapter` - 站点适配器
    /// * `validator` - 房源校验器
    /// * `policy` - 各作业共用的重试策略
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        adapter: Arc<dyn SiteAdapter>,
        validator: Arc<dyn PropertyValidator>,
        policy: FetchPolicy,
    ) -> Self {
        Self {
            transport,
            adapter,
            validator,
            policy,
            active: DashMap::new(),
            history: Mutex::new(Vec::new()),
        }
    }

    /// 运行单个作业
    ///
    /// 运行期间的任何失败都折叠进返回的JobResult，此方法
    /// 不向调用方抛错。
    pub async fn run_job(&self, job: JobSpec) -> JobResult {
        info!(job_id = %job.job_id, "starting scraping job");
        let started_at = Utc::now();
        let start = Instant::now();

        let scraper = PropertyScraper::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.adapter),
            Arc::clone(&self.validator),
            self.policy.clone(),
            job.max_concurrent,
        );
        self.active.insert(job.job_id.clone(), scraper.progress());

        let outcome = scraper.scrape_search(&job.criteria, job.max_properties).await;
        let stats = scraper.stats();

        let result = match outcome {
            Ok(report) => {
                info!(
                    job_id = %job.job_id,
                    properties = report.properties.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "job completed"
                );
                JobResult {
                    job_id: job.job_id.clone(),
                    status: JobState::Completed,
                    properties: report.properties,
                    error: None,
                    started_at,
                    ended_at: Utc::now(),
                    stats,
                }
            }
            Err(e) => {
                error!(job_id = %job.job_id, error = %e, "job failed");
                JobResult {
                    job_id: job.job_id.clone(),
                    status: JobState::Failed,
                    properties: Vec::new(),
                    error: Some(e.to_string()),
                    started_at,
                    ended_at: Utc::now(),
                    stats,
                }
            }
        };

        self.finish(&job.job_id, result.clone());
        result
    }

    /// 并发运行多个作业
    ///
    /// 返回的结果顺序与输入顺序一致。单个作业的失败（包括
    /// 意外崩溃）只产生对应位置的Failed结果，不会取消其余作业。
    pub async fn run_multiple_jobs(self: &Arc<Self>, jobs: Vec<JobSpec>) -> Vec<JobResult> {
        info!(count = jobs.len(), "starting concurrent scraping jobs");

        let handles: Vec<(String, tokio::task::JoinHandle<JobResult>)> = jobs
            .into_iter()
            .map(|job| {
                let manager = Arc::clone(self);
                let job_id = job.job_id.clone();
                (job_id, tokio::spawn(async move { manager.run_job(job).await }))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (job_id, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!(job_id = %job_id, error = %e, "job task aborted");
                    let now = Utc::now();
                    let result = JobResult {
                        job_id: job_id.clone(),
                        status: JobState::Failed,
                        properties: Vec::new(),
                        error: Some(format!("job task aborted: {e}")),
                        started_at: now,
                        ended_at: now,
                        stats: ScrapingStats::empty(),
                    };
                    self.finish(&job_id, result.clone());
                    results.push(result);
                }
            }
        }
        results
    }

    /// 查询作业状态
    ///
    /// 历史优先于活动表：结束的作业即使尚未从活动表摘除，
    /// 也按已结束上报。
    pub fn job_status(&self, job_id: &str) -> JobStatus {
        if let Some(result) = self
            .history
            .lock()
            .iter()
            .rev()
            .find(|r| r.job_id == job_id)
        {
            return JobStatus::Finished(result.clone());
        }

        if let Some(progress) = self.active.get(job_id) {
            return JobStatus::Running {
                properties_scraped: progress.scraped(),
            };
        }

        JobStatus::NotFound
    }

    /// 全部作业的概览
    pub fn overview(&self) -> ManagerOverview {
        ManagerOverview {
            active_jobs: self.active.len(),
            completed_jobs: self.history.lock().len(),
            active_job_ids: self.active.iter().map(|e| e.key().clone()).collect(),
        }
    }

    /// 将作业从活动表原子地移入历史
    ///
    /// 先入历史再摘活动表，配合job_status的历史优先查找，
    /// 结束的作业不会出现短暂的NotFound窗口。
    fn finish(&self, job_id: &str, result: JobResult) {
        self.history.lock().push(result);
        self.active.remove(job_id);
    }
}

#[cfg(test)]
#[path = "job_manager_test.rs"]
mod tests;
