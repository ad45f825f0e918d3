// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

/// 抓取重试策略配置
///
/// 退避常量沿用经验值：相邻尝试间线性退避，命中限流后
/// 施加固定倍数的惩罚延迟。两者都只是可配置的默认值。
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// 最大尝试次数
    pub retries: u32,
    /// 单次请求超时时间
    pub timeout: Duration,
    /// 相邻请求之间的基础礼貌延迟
    pub request_delay: Duration,
    /// 命中限流(429)后的惩罚倍数
    pub rate_limit_penalty: f64,
    /// 抖动因子 (0.0-1.0)，0表示不加抖动
    pub jitter_factor: f64,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            timeout: Duration::from_secs(30),
            request_delay: Duration::from_secs(1),
            rate_limit_penalty: 5.0,
            jitter_factor: 0.0,
        }
    }
}

impl FetchPolicy {
    /// 计算第attempt次尝试前的退避时间
    ///
    /// 首次尝试只等待基础延迟，之后按 `delay * (attempt + 1)` 线性增长。
    ///
    /// # 参数
    ///
    /// * `attempt` - 尝试序号，从0开始
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base = self.request_delay.as_secs_f64();
        let secs = if attempt == 0 {
            base
        } else {
            base * (attempt + 1) as f64
        };
        self.with_jitter(secs)
    }

    /// 计算命中限流后的惩罚延迟
    pub fn rate_limit_backoff(&self) -> Duration {
        self.with_jitter(self.request_delay.as_secs_f64() * self.rate_limit_penalty)
    }

    /// 为延迟加抖动
    fn with_jitter(&self, secs: f64) -> Duration {
        if self.jitter_factor <= 0.0 || secs <= 0.0 {
            return Duration::from_secs_f64(secs.max(0.0));
        }

        let jitter_range = secs * self.jitter_factor;
        let jitter = rand::random_range(-jitter_range..jitter_range);
        Duration::from_secs_f64((secs + jitter).max(0.0))
    }
}
