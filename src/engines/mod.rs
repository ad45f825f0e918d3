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

/// 批量抓取器
pub mod batch;
/// 重试策略
pub mod fetch_policy;
/// 单URL抓取器
pub mod fetcher;
/// 并发闸门
pub mod rate_gate;
/// reqwest传输实现
pub mod reqwest_transport;
/// 传输与结果类型
pub mod traits;
/// User-Agent轮换
pub mod user_agents;
