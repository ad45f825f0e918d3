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

//! 端到端抓取流水线测试
//!
//! 用本地axum服务器模拟房源站点，贯穿真实的reqwest传输、
//! 重试循环、解析、校验与过滤。

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use propcrawl::application::job_manager::JobManager;
use propcrawl::application::property_scraper::PropertyScraper;
use propcrawl::domain::models::job::{JobSpec, JobState};
use propcrawl::domain::models::property::{Property, SearchCriteria};
use propcrawl::domain::services::site_adapter::{ParseError, SiteAdapter};
use propcrawl::domain::services::validation::RuleValidator;
use propcrawl::engines::fetch_policy::FetchPolicy;
use propcrawl::engines::reqwest_transport::ReqwestTransport;
use propcrawl::engines::traits::HttpTransport;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// 启动模拟房源站点
///
/// `/listing/{id}` 返回JSON编码的房源页面；`/flaky` 第一次
/// 返回429，之后返回200。
async fn start_site_server() -> String {
    let hits = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route(
            "/listing/{id}",
            get(|Path(id): Path<usize>| async move { listing_page(id) }),
        )
        .route(
            "/flaky",
            get({
                let hits = Arc::clone(&hits);
                move || {
                    let hits = Arc::clone(&hits);
                    async move {
                        if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                            (StatusCode::TOO_MANY_REQUESTS, String::new())
                        } else {
                            (StatusCode::OK, listing_page(0))
                        }
                    }
                }
            }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// 生成确定性的房源页面
///
/// 价格 (id+1)*$50k，卧室 id%5+1，类型按奇偶交替
fn listing_page(id: usize) -> String {
    let listing = serde_json::json!({
        "id": id,
        "title": format!("Test listing number {id}"),
        "price": (id + 1) as f64 * 50_000.0,
        "address": format!("{} Example Avenue", 1000 + id),
        "city": "Austin",
        "state": "TX",
        "zip_code": "78704",
        "bedrooms": id % 5 + 1,
        "bathrooms": 2.0,
        "square_feet": 1_500.0,
        "property_type": if id % 2 == 0 { "house" } else { "condo" },
    });
    listing.to_string()
}

/// 把模拟站点的JSON页面解析成记录的测试适配器
struct JsonSiteAdapter {
    base_url: String,
    listings: usize,
    /// 为true时所有页面都解析不出房源
    parse_nothing: bool,
}

impl SiteAdapter for JsonSiteAdapter {
    fn name(&self) -> &'static str {
        "json-site"
    }

    fn listing_urls(&self, _criteria: &SearchCriteria, limit: usize) -> anyhow::Result<Vec<String>> {
        Ok((0..self.listings.min(limit))
            .map(|i| format!("{}/listing/{i}", self.base_url))
            .collect())
    }

    fn parse(&self, url: &str, body: &str) -> Result<Option<Property>, ParseError> {
        if self.parse_nothing {
            return Ok(None);
        }
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| ParseError::Malformed(format!("{url}: {e}")))?;

        let mut property = Property::from_source(url, self.name());
        property.id = value["id"].as_u64().map(|v| v.to_string());
        property.title = value["title"].as_str().map(str::to_string);
        property.price = value["price"].as_f64();
        property.address = value["address"].as_str().map(str::to_string);
        property.city = value["city"].as_str().map(str::to_string);
        property.state = value["state"].as_str().map(str::to_string);
        property.zip_code = value["zip_code"].as_str().map(str::to_string);
        property.bedrooms = value["bedrooms"].as_u64().map(|v| v as u32);
        property.bathrooms = value["bathrooms"].as_f64();
        property.square_feet = value["square_feet"].as_f64();
        property.property_type = value["property_type"].as_str().map(str::to_string);
        Ok(Some(property))
    }
}

fn fast_policy() -> FetchPolicy {
    FetchPolicy {
        request_delay: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_transport_returns_status_and_body() {
    let base = start_site_server().await;
    let transport = ReqwestTransport::new().unwrap();

    let ok = transport
        .get(&format!("{base}/listing/3"), "test-agent", Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(ok.status, 200);
    assert!(ok.body.contains("Test listing number 3"));

    // Non-2xx is still a response, not a transport error
    let broken = transport
        .get(&format!("{base}/broken"), "test-agent", Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(broken.status, 500);
}

#[tokio::test]
async fn test_rate_limited_page_recovers_on_retry() {
    let base = start_site_server().await;
    let adapter = Arc::new(JsonSiteAdapter {
        base_url: base.clone(),
        listings: 1,
        parse_nothing: false,
    });
    let scraper = PropertyScraper::new(
        Arc::new(ReqwestTransport::new().unwrap()),
        adapter,
        Arc::new(RuleValidator),
        fast_policy(),
        2,
    );

    let report = scraper.scrape_urls(&[format!("{base}/flaky")]).await;

    assert_eq!(report.properties.len(), 1);
    assert!(report.failed_urls.is_empty());
}

#[tokio::test]
async fn test_search_filters_to_matching_listings() {
    let base = start_site_server().await;
    let adapter = Arc::new(JsonSiteAdapter {
        base_url: base,
        listings: 20,
        parse_nothing: false,
    });
    let scraper = PropertyScraper::new(
        Arc::new(ReqwestTransport::new().unwrap()),
        adapter,
        Arc::new(RuleValidator),
        fast_policy(),
        5,
    );

    let criteria = SearchCriteria {
        location: "Austin, TX".into(),
        min_price: Some(300_000.0),
        max_price: Some(700_000.0),
        min_bedrooms: Some(2),
        property_types: vec!["house".into()],
        ..Default::default()
    };
    let report = scraper.scrape_search(&criteria, 100).await.unwrap();

    // Listings 6, 8 and 12 are the only even-numbered (house) pages with
    // price in [300k, 700k] and at least 2 bedrooms
    let mut ids: Vec<&str> = report
        .properties
        .iter()
        .map(|p| p.id.as_deref().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["12", "6", "8"]);

    let stats = scraper.stats();
    assert_eq!(stats.attempted, 20);
    assert_eq!(stats.succeeded, 20);
}

#[tokio::test]
async fn test_concurrent_jobs_with_one_empty_site() {
    let base = start_site_server().await;
    let empty_adapter = Arc::new(JsonSiteAdapter {
        base_url: base.clone(),
        listings: 3,
        parse_nothing: true,
    });
    let full_adapter = Arc::new(JsonSiteAdapter {
        base_url: base,
        listings: 3,
        parse_nothing: false,
    });

    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new().unwrap());
    let empty_manager = Arc::new(JobManager::new(
        Arc::clone(&transport),
        empty_adapter,
        Arc::new(RuleValidator),
        fast_policy(),
    ));
    let full_manager = Arc::new(JobManager::new(
        transport,
        full_adapter,
        Arc::new(RuleValidator),
        fast_policy(),
    ));

    let criteria = SearchCriteria {
        location: "Austin, TX".into(),
        ..Default::default()
    };
    let full_jobs = full_manager.run_multiple_jobs(vec![
        JobSpec::new("site-a", criteria.clone()),
        JobSpec::new("site-b", criteria.clone()),
    ]);
    let empty_jobs = empty_manager.run_multiple_jobs(vec![JobSpec::new("site-c", criteria)]);
    let (full_results, empty_results) = tokio::join!(full_jobs, empty_jobs);

    assert_eq!(full_results.len(), 2);
    for result in &full_results {
        assert_eq!(result.status, JobState::Completed);
        assert_eq!(result.properties.len(), 3);
    }

    // A site with nothing to parse still completes, with empty output
    let empty = &empty_results[0];
    assert_eq!(empty.status, JobState::Completed);
    assert!(empty.properties.is_empty());
    assert_eq!(empty.stats.failed, 3);
}
