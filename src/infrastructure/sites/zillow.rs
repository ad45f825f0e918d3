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
use crate::domain::services::site_adapter::{ParseError, SiteAdapter};
use crate::infrastructure::sites::common;
use scraper::Html;
use url::Url;

/// 每次搜索最多推导的候选URL数
const MAX_CANDIDATES: usize = 50;

/// Zillow站点适配器
pub struct ZillowAdapter {
    /// 站点根URL
    base_url: String,
}

impl ZillowAdapter {
    /// 创建新的Zillow适配器
    pub fn new() -> Self {
        Self {
            base_url: "https://www.zillow.com".to_string(),
        }
    }

    /// 使用自定义根URL创建适配器
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for ZillowAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteAdapter for ZillowAdapter {
    fn name(&self) -> &'static str {
        "zillow"
    }

    fn listing_urls(&self, criteria: &SearchCriteria, limit: usize) -> anyhow::Result<Vec<String>> {
        let base = Url::parse(&self.base_url)?;
        let slug = common::slugify(&criteria.location);
        let count = limit.min(MAX_CANDIDATES);

        let mut urls = Vec::with_capacity(count);
        for i in 1..=count {
            let url = base.join(&format!("/homedetails/{slug}-{i}_zpid/"))?;
            urls.push(url.to_string());
        }
        Ok(urls)
    }

    fn parse(&self, url: &str, body: &str) -> Result<Option<Property>, ParseError> {
        let document = Html::parse_document(body);
        let mut property = Property::from_source(url, self.name());
        property.id = common::id_from_path(url, "_zpid");

        if let Some(listing) = common::json_ld_listing(&document)? {
            common::apply_json_ld(&mut property, &listing);
        }

        if property.title.is_none() {
            property.title = common::first_text(&document, &["h1"])?;
        }
        if property.price.is_none() {
            property.price = common::first_text(
                &document,
                &[
                    r#"[data-testid="price"]"#,
                    ".ds-summary-price",
                    ".price",
                ],
            )?
            .and_then(|t| common::parse_price(&t));
        }
        if property.address.is_none() {
            property.address = common::first_text(
                &document,
                &[
                    r#"[data-testid="home-details-summary-address"]"#,
                    ".ds-address-container",
                    ".address",
                ],
            )?;
        }

        let text = document.root_element().text().collect::<String>();
        if property.bedrooms.is_none() {
            property.bedrooms = common::extract_bedrooms(&text);
        }
        if property.bathrooms.is_none() {
            property.bathrooms = common::extract_bathrooms(&text);
        }
        if property.square_feet.is_none() {
            property.square_feet = common::extract_square_feet(&text);
        }
        if property.property_type.is_none() {
            property.property_type = common::extract_property_type(&text);
        }

        // Pages without at least a title or a price carry no usable listing
        if property.title.is_none() && property.price.is_none() {
            return Ok(None);
        }
        Ok(Some(property))
    }
}
