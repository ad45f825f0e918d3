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

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// 并发闸门
///
/// 将在途抓取操作限制在固定上限内，超出的调用方挂起等待空位。
/// 不保证公平性，只保证等待者最终会被放行。
#[derive(Clone, Debug)]
pub struct RateGate {
    /// 内部信号量
    semaphore: Arc<Semaphore>,
    /// 并发上限
    max_concurrent: usize,
}

impl RateGate {
    /// 创建新的并发闸门
    ///
    /// # 参数
    ///
    /// * `max_concurrent` - 最大并发数，至少为1
    pub fn new(max_concurrent: usize) -> Self {
        let permits = max_concurrent.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            max_concurrent: permits,
        }
    }

    /// 获取一个并发许可
    ///
    /// 许可在返回值被丢弃时自动归还，任何退出路径都不会泄漏。
    pub async fn acquire(&self) -> RateGatePermit {
        // The semaphore is never closed, so acquire_owned cannot fail
        let permit = self.semaphore.clone().acquire_owned().await.unwrap();
        RateGatePermit { _permit: permit }
    }

    /// 并发上限
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// 当前可用许可数
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// RAII并发许可
#[derive(Debug)]
pub struct RateGatePermit {
    _permit: OwnedSemaphorePermit,
}
