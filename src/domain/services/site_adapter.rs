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
use thiserror::Error;

/// 解析错误类型
#[derive(Error, Debug)]
pub enum ParseError {
    /// 选择器无效
    #[error("Invalid selector: {0}")]
    Selector(String),
    /// 文档结构异常
    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// 站点适配器特质
///
/// 封装站点特定的知识：由搜索条件推导候选URL，以及把
/// 抓到的页面解析成房源记录。抓取核心只消费这个接口，
/// 不感知任何站点的标记结构。
pub trait SiteAdapter: Send + Sync {
    /// 站点名称
    fn name(&self) -> &'static str;

    /// 由搜索条件推导有界的候选房源URL集合
    ///
    /// # 参数
    ///
    /// * `criteria` - 搜索条件
    /// * `limit` - 候选数量上限
    fn listing_urls(&self, criteria: &SearchCriteria, limit: usize) -> anyhow::Result<Vec<String>>;

    /// 从页面内容解析一条房源记录
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Property))` - 解析出的记录
    /// * `Ok(None)` - 页面上没有可用的房源信息
    /// * `Err(ParseError)` - 解析过程出错
    fn parse(&self, url: &str, body: &str) -> Result<Option<Property>, ParseError>;
}
