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

//! 站点适配器共享的提取工具

use crate::domain::models::property::Property;
use crate::domain::services::site_adapter::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use url::Url;

static PRICE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$?\s*([\d,]+(?:\.\d+)?)").unwrap());
static BEDROOMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:bds?|beds?|bedrooms?)\b").unwrap());
static BATHROOMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:ba|baths?|bathrooms?)\b").unwrap());
static SQUARE_FEET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([\d,]+)\s*(?:sq\.?\s*ft|sqft|square\s*feet)").unwrap());
static PROPERTY_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(single[- ]family|house|condo(?:minium)?|townhouse|apartment|multi[- ]family|land)\b")
        .unwrap()
});

/// JSON-LD中表示住宅房源的类型标记
const LISTING_TYPES: &[&str] = &["Residence", "House", "Apartment", "Product", "RealEstateListing"];

/// 将地点字符串转为URL片段
pub fn slugify(location: &str) -> String {
    let mut slug = String::with_capacity(location.len());
    let mut last_dash = true;
    for c in location.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// 从URL路径的最后一段推导站点内标识
pub fn id_from_path(url: &str, suffix: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .next_back()?
        .to_string();
    let trimmed = segment.strip_suffix(suffix).unwrap_or(&segment);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 依次尝试一组选择器，返回第一个非空文本
pub fn first_text(document: &Html, selectors: &[&str]) -> Result<Option<String>, ParseError> {
    for raw in selectors {
        let selector =
            Selector::parse(raw).map_err(|e| ParseError::Selector(format!("{raw}: {e:?}")))?;
        if let Some(element) = document.select(&selector).next() {
            let text = element.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return Ok(Some(text));
            }
        }
    }
    Ok(None)
}

/// 在页面中寻找描述房源的JSON-LD块
pub fn json_ld_listing(document: &Html) -> Result<Option<Value>, ParseError> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#)
        .map_err(|e| ParseError::Selector(format!("{e:?}")))?;

    for element in document.select(&selector) {
        let raw = element.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };

        let candidates: Vec<&Value> = match &value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        for candidate in candidates {
            let matches = candidate
                .get("@type")
                .and_then(|t| t.as_str())
                .is_some_and(|t| LISTING_TYPES.iter().any(|l| t.contains(l)));
            if matches {
                return Ok(Some(candidate.clone()));
            }
        }
    }

    Ok(None)
}

/// 用JSON-LD块补全记录中缺失的字段
pub fn apply_json_ld(property: &mut Property, listing: &Value) {
    if property.title.is_none() {
        property.title = listing
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string);
    }

    if property.price.is_none() {
        property.price = listing
            .get("offers")
            .and_then(|o| o.get("price"))
            .and_then(as_f64)
            .or_else(|| listing.get("price").and_then(as_f64));
    }

    if let Some(address) = listing.get("address") {
        if property.address.is_none() {
            property.address = address
                .get("streetAddress")
                .and_then(|v| v.as_str())
                .map(str::to_string);
        }
        if property.city.is_none() {
            property.city = address
                .get("addressLocality")
                .and_then(|v| v.as_str())
                .map(str::to_string);
        }
        if property.state.is_none() {
            property.state = address
                .get("addressRegion")
                .and_then(|v| v.as_str())
                .map(str::to_string);
        }
        if property.zip_code.is_none() {
            property.zip_code = address
                .get("postalCode")
                .and_then(|v| v.as_str())
                .map(str::to_string);
        }
    }

    if property.bedrooms.is_none() {
        property.bedrooms = listing
            .get("numberOfBedrooms")
            .or_else(|| listing.get("numberOfRooms"))
            .and_then(as_f64)
            .map(|v| v as u32);
    }

    if property.bathrooms.is_none() {
        property.bathrooms = listing.get("numberOfBathroomsTotal").and_then(as_f64);
    }

    if property.square_feet.is_none() {
        property.square_feet = listing
            .get("floorSize")
            .and_then(|f| f.get("value"))
            .and_then(as_f64);
    }

    if property.description.is_none() {
        property.description = listing
            .get("description")
            .and_then(|v| v.as_str())
            .map(str::to_string);
    }
}

/// 从价格文本解析数值，如 "$450,000"
pub fn parse_price(text: &str) -> Option<f64> {
    let caps = PRICE.captures(text)?;
    caps[1].replace(',', "").parse().ok()
}

/// 从页面文本提取卧室数
pub fn extract_bedrooms(text: &str) -> Option<u32> {
    BEDROOMS.captures(text)?[1].parse().ok()
}

/// 从页面文本提取卫生间数
pub fn extract_bathrooms(text: &str) -> Option<f64> {
    BATHROOMS.captures(text)?[1].parse().ok()
}

/// 从页面文本提取建筑面积
pub fn extract_square_feet(text: &str) -> Option<f64> {
    SQUARE_FEET.captures(text)?[1].replace(',', "").parse().ok()
}

/// 从页面文本识别房源类型并归一化
pub fn extract_property_type(text: &str) -> Option<String> {
    let raw = PROPERTY_TYPE.captures(text)?[1].to_ascii_lowercase();
    let normalized = match raw.as_str() {
        "single-family" | "single family" | "house" => "house",
        "condo" | "condominium" | "apartment" => "condo",
        "townhouse" => "townhouse",
        "multi-family" | "multi family" => "multi-family",
        other => other,
    };
    Some(normalized.to_string())
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_price(s),
        _ => None,
    }
}
