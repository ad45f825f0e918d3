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

use crate::engines::fetch_policy::FetchPolicy;
use crate::engines::rate_gate::RateGate;
use crate::engines::traits::{FetchOutcome, HttpTransport, TransportError};
use crate::engines::user_agents::UserAgentPool;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, warn};

/// 限流状态码
const STATUS_RATE_LIMITED: u16 = 429;

/// 单URL抓取器
///
/// 在有界重试内抓取一个URL的内容。整个重试循环期间持有一个
/// 并发许可，因此并发上限约束的是逻辑抓取操作数而非套接字数。
pub struct Fetcher {
    /// 底层HTTP传输
    transport: Arc<dyn HttpTransport>,
    /// 并发闸门
    gate: RateGate,
    /// User-Agent轮换池
    agents: Arc<UserAgentPool>,
    /// 重试策略
    policy: FetchPolicy,
}

impl Fetcher {
    /// 创建新的抓取器
    ///
    /// # 参数
    ///
    /// * `transport` - HTTP传输实现
    /// * `gate` - 共享并发闸门
    /// * `agents` - 共享User-Agent轮换池
    /// * `policy` - 重试策略
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        gate: RateGate,
        agents: Arc<UserAgentPool>,
        policy: FetchPolicy,
    ) -> Self {
        Self {
            transport,
            gate,
            agents,
            policy,
        }
    }

    /// 重试策略
    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// 并发闸门
    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    /// 抓取单个URL的内容
    ///
    /// 200立即短路返回；429在重试预算内施加惩罚延迟；其余状态码、
    /// 超时和网络错误记录后进入下一次尝试。所有失败模式都折叠为
    /// 结果值，此方法不会返回错误。
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let _permit = self.gate.acquire().await;

        for attempt in 0..self.policy.retries {
            sleep(self.policy.backoff(attempt)).await;

            match self.attempt(url).await {
                FetchOutcome::Success { body } => {
                    debug!(url, attempt, "page fetched");
                    return FetchOutcome::Success { body };
                }
                FetchOutcome::HttpError {
                    status: STATUS_RATE_LIMITED,
                } => {
                    warn!(url, attempt, "rate limited, backing off");
                    sleep(self.policy.rate_limit_backoff()).await;
                }
                outcome => {
                    warn!(url, attempt, ?outcome, "attempt failed");
                }
            }
        }

        warn!(url, retries = self.policy.retries, "giving up on url");
        FetchOutcome::Exhausted
    }

    /// 执行一次尝试
    ///
    /// 每次尝试都推进User-Agent游标，与结果无关
    async fn attempt(&self, url: &str) -> FetchOutcome {
        let user_agent = self.agents.next();

        match self.transport.get(url, user_agent, self.policy.timeout).await {
            Ok(response) if response.status == 200 => FetchOutcome::Success {
                body: response.body,
            },
            Ok(response) => FetchOutcome::HttpError {
                status: response.status,
            },
            Err(TransportError::Timeout) => FetchOutcome::Timeout,
            Err(TransportError::Network(message)) => FetchOutcome::Network { message },
        }
    }
}

#[cfg(test)]
#[path = "fetcher_test.rs"]
mod tests;
