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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 房源记录
///
/// 解析成功后不再修改，作为作业输出按值返回给调用方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// 站点内标识
    pub id: Option<String>,
    /// 标题
    pub title: Option<String>,
    /// 价格（美元）
    pub price: Option<f64>,
    /// 街道地址
    pub address: Option<String>,
    /// 城市
    pub city: Option<String>,
    /// 州
    pub state: Option<String>,
    /// 邮编
    pub zip_code: Option<String>,
    /// 卧室数
    pub bedrooms: Option<u32>,
    /// 卫生间数
    pub bathrooms: Option<f64>,
    /// 建筑面积（平方英尺）
    pub square_feet: Option<f64>,
    /// 地块面积
    pub lot_size: Option<f64>,
    /// 建成年份
    pub year_built: Option<u32>,
    /// 房源类型 (house, condo, townhouse, ...)
    pub property_type: Option<String>,
    /// 描述
    pub description: Option<String>,
    /// 来源页面URL
    pub source_url: String,
    /// 来源站点名称
    pub source_site: String,
    /// 抓取时间
    pub scraped_at: DateTime<Utc>,
}

impl Property {
    /// 创建仅携带来源信息的空记录，解析器据此填充字段
    pub fn from_source(source_url: &str, source_site: &str) -> Self {
        Self {
            id: None,
            title: None,
            price: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            bedrooms: None,
            bathrooms: None,
            square_feet: None,
            lot_size: None,
            year_built: None,
            property_type: None,
            description: None,
            source_url: source_url.to_string(),
            source_site: source_site.to_string(),
            scraped_at: Utc::now(),
        }
    }
}

/// 搜索条件
///
/// 由配置层提供，核心不关心字段的来源
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// 地点（城市、州或邮编）
    pub location: String,
    /// 最低价格
    pub min_price: Option<f64>,
    /// 最高价格
    pub max_price: Option<f64>,
    /// 最少卧室数
    pub min_bedrooms: Option<u32>,
    /// 最多卧室数
    pub max_bedrooms: Option<u32>,
    /// 最少卫生间数
    pub min_bathrooms: Option<f64>,
    /// 最多卫生间数
    pub max_bathrooms: Option<f64>,
    /// 房源类型白名单，空表示不限
    #[serde(default)]
    pub property_types: Vec<String>,
}

impl SearchCriteria {
    /// 判断房源是否满足条件
    ///
    /// 记录里缺失的字段视为通过，只有明确越界的值才被过滤
    pub fn matches(&self, property: &Property) -> bool {
        if let (Some(min), Some(price)) = (self.min_price, property.price) {
            if price < min {
                return false;
            }
        }
        if let (Some(max), Some(price)) = (self.max_price, property.price) {
            if price > max {
                return false;
            }
        }

        if let (Some(min), Some(bedrooms)) = (self.min_bedrooms, property.bedrooms) {
            if bedrooms < min {
                return false;
            }
        }
        if let (Some(max), Some(bedrooms)) = (self.max_bedrooms, property.bedrooms) {
            if bedrooms > max {
                return false;
            }
        }

        if let (Some(min), Some(bathrooms)) = (self.min_bathrooms, property.bathrooms) {
            if bathrooms < min {
                return false;
            }
        }
        if let (Some(max), Some(bathrooms)) = (self.max_bathrooms, property.bathrooms) {
            if bathrooms > max {
                return false;
            }
        }

        if !self.property_types.is_empty() {
            if let Some(property_type) = &property.property_type {
                if !self
                    .property_types
                    .iter()
                    .any(|t| t.eq_ignore_ascii_case(property_type))
                {
                    return false;
                }
            }
        }

        true
    }
}
