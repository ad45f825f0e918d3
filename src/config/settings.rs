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

use crate::domain::models::property::SearchCriteria;
use crate::engines::fetch_policy::FetchPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含抓取、搜索条件和输出等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 抓取配置
    pub scraper: ScraperSettings,
    /// 默认搜索条件
    pub search: SearchCriteria,
    /// 输出配置
    pub output: OutputSettings,
}

/// 抓取配置设置
#[derive(Debug, Deserialize)]
pub struct ScraperSettings {
    /// 目标站点 (zillow, realtor)
    pub site: String,
    /// 并发上限
    pub max_concurrent: usize,
    /// 基础请求延迟（秒）
    pub request_delay_secs: f64,
    /// 每个URL的最大尝试次数
    pub retries: u32,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
    /// 最多返回的房源数
    pub max_properties: usize,
}

impl ScraperSettings {
    /// 由配置派生重试策略
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            retries: self.retries,
            timeout: Duration::from_secs(self.timeout_secs),
            request_delay: Duration::from_secs_f64(self.request_delay_secs),
            ..Default::default()
        }
    }
}

/// 输出配置设置
#[derive(Debug, Deserialize)]
pub struct OutputSettings {
    /// 输出目录
    pub dir: String,
    /// 输出格式 (json, csv)
    pub format: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从默认值、可选配置文件和环境变量逐层加载
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default scraper settings
            .set_default("scraper.site", "zillow")?
            .set_default("scraper.max_concurrent", 5)?
            .set_default("scraper.request_delay_secs", 1.0)?
            .set_default("scraper.retries", 3)?
            .set_default("scraper.timeout_secs", 30)?
            .set_default("scraper.max_properties", 100)?
            // Default search settings
            .set_default("search.location", "Austin, TX")?
            // Default output settings
            .set_default("output.dir", "./output")?
            .set_default("output.format", "json")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PROPCRAWL").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
