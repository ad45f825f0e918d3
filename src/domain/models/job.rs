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

use crate::domain::models::property::{Property, SearchCriteria};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 作业定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    /// 作业标识
    pub job_id: String,
    /// 搜索条件
    pub criteria: SearchCriteria,
    /// 最多返回的房源数
    pub max_properties: usize,
    /// 本作业的并发上限
    pub max_concurrent: usize,
}

impl JobSpec {
    /// 使用默认上限创建作业定义
    pub fn new(job_id: impl Into<String>, criteria: SearchCriteria) -> Self {
        Self {
            job_id: job_id.into(),
            criteria,
            max_properties: 100,
            max_concurrent: 5,
        }
    }
}

/// 作业终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// 正常完成（零条结果也是完成）
    Completed,
    /// 运行失败
    Failed,
}

/// 抓取会话统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapingStats {
    /// 尝试的页面总数
    pub attempted: usize,
    /// 成功产出有效记录的页面数
    pub succeeded: usize,
    /// 抓取、解析或校验失败的页面数
    pub failed: usize,
    /// 成功率（百分比）
    pub success_rate: f64,
    /// 会话的并发上限
    pub max_concurrent: usize,
    /// 基础请求延迟（秒）
    pub request_delay_secs: f64,
}

impl ScrapingStats {
    /// 汇总会话统计
    ///
    /// 空会话的成功率记为0而不是除零
    pub fn new(
        succeeded: usize,
        failed: usize,
        max_concurrent: usize,
        request_delay_secs: f64,
    ) -> Self {
        let attempted = succeeded + failed;
        let success_rate = succeeded as f64 / attempted.max(1) as f64 * 100.0;
        Self {
            attempted,
            succeeded,
            failed,
            success_rate,
            max_concurrent,
            request_delay_secs,
        }
    }

    /// 空统计，用于从未运行过抓取的失败作业
    pub fn empty() -> Self {
        Self::new(0, 0, 0, 0.0)
    }
}

/// 作业结果
///
/// 每次作业运行产生一条，创建后不再修改，追加进完成历史
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    /// 作业标识
    pub job_id: String,
    /// 终态
    pub status: JobState,
    /// 通过校验与过滤的房源记录
    pub properties: Vec<Property>,
    /// 失败原因（仅Failed时存在）
    pub error: Option<String>,
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 结束时间
    pub ended_at: DateTime<Utc>,
    /// 会话统计
    pub stats: ScrapingStats,
}
