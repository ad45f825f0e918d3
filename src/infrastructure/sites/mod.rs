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

use crate::domain::services::site_adapter::SiteAdapter;
use std::sync::Arc;

/// Realtor.com适配器
pub mod realtor;
/// Zillow适配器
pub mod zillow;

mod common;

/// 按名称创建站点适配器
///
/// # 参数
///
/// * `name` - 站点名称，不区分大小写
///
/// # 返回值
///
/// 匹配的适配器实例，未知名称返回None
pub fn adapter_for(name: &str) -> Option<Arc<dyn SiteAdapter>> {
    match name.to_ascii_lowercase().as_str() {
        "zillow" => Some(Arc::new(zillow::ZillowAdapter::new())),
        "realtor" => Some(Arc::new(realtor::RealtorAdapter::new())),
        _ => None,
    }
}
