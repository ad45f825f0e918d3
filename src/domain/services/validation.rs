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

use crate::domain::models::property::Property;
use once_cell::sync::Lazy;
use regex::Regex;

/// 邮编格式
static ZIP_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").unwrap());
/// 街道号检测
static HAS_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());

/// 房源校验器特质
///
/// 抓取核心通过该接口消费校验逻辑，不关心规则细节
pub trait PropertyValidator: Send + Sync {
    /// 校验一条房源记录
    ///
    /// # 返回值
    ///
    /// 是否通过，以及全部校验错误的描述列表
    fn validate(&self, property: &Property) -> (bool, Vec<String>);
}

/// 基于规则的默认校验器
pub struct RuleValidator;

impl PropertyValidator for RuleValidator {
    fn validate(&self, property: &Property) -> (bool, Vec<String>) {
        let mut errors = Vec::new();

        match &property.title {
            None => errors.push("missing required field: title".to_string()),
            Some(title) => {
                let trimmed = title.trim();
                if trimmed.len() < 5 {
                    errors.push("title too short (minimum 5 characters)".to_string());
                } else if trimmed.len() > 200 {
                    errors.push("title too long (maximum 200 characters)".to_string());
                }
            }
        }

        match property.price {
            None => errors.push("missing required field: price".to_string()),
            Some(price) => {
                if price <= 0.0 {
                    errors.push("price must be positive".to_string());
                } else if price < 1_000.0 {
                    errors.push("price seems unreasonably low".to_string());
                } else if price > 100_000_000.0 {
                    errors.push("price seems unreasonably high".to_string());
                }
            }
        }

        match &property.address {
            None => errors.push("missing required field: address".to_string()),
            Some(address) => {
                if address.trim().len() < 10 {
                    errors.push("address too short".to_string());
                }
                if !HAS_DIGIT.is_match(address) {
                    errors.push("address should contain a street number".to_string());
                }
            }
        }

        if let Some(bedrooms) = property.bedrooms {
            if bedrooms > 20 {
                errors.push("bedrooms count seems unreasonable".to_string());
            }
        }

        if let Some(bathrooms) = property.bathrooms {
            if !(0.0..=20.0).contains(&bathrooms) {
                errors.push("bathrooms count seems unreasonable".to_string());
            }
        }

        if let Some(square_feet) = property.square_feet {
            if square_feet < 100.0 {
                errors.push("square footage seems unreasonably small".to_string());
            } else if square_feet > 100_000.0 {
                errors.push("square footage seems unreasonably large".to_string());
            }
        }

        if let Some(zip_code) = &property.zip_code {
            if !ZIP_CODE.is_match(zip_code) {
                errors.push("invalid zip code format".to_string());
            }
        }

        (errors.is_empty(), errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Property {
        Property {
            title: Some("Charming 3BR bungalow".into()),
            price: Some(450_000.0),
            address: Some("1204 Maple Street, Austin, TX".into()),
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            square_feet: Some(1_850.0),
            zip_code: Some("78704".into()),
            ..Property::from_source("http://example.com/1204", "test")
        }
    }

    #[test]
    fn test_complete_listing_passes() {
        let (ok, errors) = RuleValidator.validate(&listing());
        assert!(ok, "unexpected errors: {errors:?}");
    }

    #[test]
    fn test_missing_required_fields_are_all_reported() {
        let bare = Property::from_source("http://example.com/2", "test");
        let (ok, errors) = RuleValidator.validate(&bare);

        assert!(!ok);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_price_bounds() {
        let mut cheap = listing();
        cheap.price = Some(500.0);
        assert!(!RuleValidator.validate(&cheap).0);

        let mut absurd = listing();
        absurd.price = Some(250_000_000.0);
        assert!(!RuleValidator.validate(&absurd).0);
    }

    #[test]
    fn test_address_without_street_number_rejected() {
        let mut vague = listing();
        vague.address = Some("Maple Street, Austin, Texas".into());

        let (ok, errors) = RuleValidator.validate(&vague);
        assert!(!ok);
        assert!(errors.iter().any(|e| e.contains("street number")));
    }

    #[test]
    fn test_zip_code_format() {
        let mut extended = listing();
        extended.zip_code = Some("78704-1234".into());
        assert!(RuleValidator.validate(&extended).0);

        let mut bad = listing();
        bad.zip_code = Some("787".into());
        assert!(!RuleValidator.validate(&bad).0);
    }
}
