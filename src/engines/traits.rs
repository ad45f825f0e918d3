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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 传输层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// 请求超时
    #[error("Request timed out")]
    Timeout,
    /// 网络错误
    #[error("Network error: {0}")]
    Network(String),
}

/// 一次HTTP GET的原始响应
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP状态码
    pub status: u16,
    /// 响应体
    pub body: String,
}

/// 单次抓取操作的最终结果
///
/// 抓取失败以值的形式返回给调用方，绝不作为错误向上传播。
/// 单个不可达的页面是常态而不是异常，不允许因此中断整个批次。
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 成功获取页面内容
    Success {
        /// 页面内容
        body: String,
    },
    /// 非200的HTTP状态码
    HttpError {
        /// 状态码
        status: u16,
    },
    /// 请求超时
    Timeout,
    /// 网络层错误
    Network {
        /// 错误描述
        message: String,
    },
    /// 重试次数耗尽
    Exhausted,
}

impl FetchOutcome {
    /// 判断是否成功
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    /// 取出页面内容
    ///
    /// # 返回值
    ///
    /// 成功时返回页面内容，其余情况返回None
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchOutcome::Success { body } => Some(body),
            _ => None,
        }
    }
}

/// HTTP传输特质
///
/// 抽象底层HTTP客户端，使重试与退避逻辑可以在测试中
/// 注入脚本化的假传输，无需真实套接字
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// 发起一次GET请求
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    /// * `user_agent` - 本次请求使用的User-Agent
    /// * `timeout` - 单次请求超时时间
    async fn get(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}
