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

use propcrawl::application::job_manager::JobManager;
use propcrawl::config::settings::Settings;
use propcrawl::domain::models::job::{JobSpec, JobState};
use propcrawl::domain::services::validation::RuleValidator;
use propcrawl::engines::reqwest_transport::ReqwestTransport;
use propcrawl::infrastructure::export::Exporter;
use propcrawl::infrastructure::sites;
use propcrawl::utils::telemetry;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并运行配置的抓取作业
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting propcrawl...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!(site = %settings.scraper.site, "Configuration loaded");

    // 3. Resolve the site adapter
    let Some(adapter) = sites::adapter_for(&settings.scraper.site) else {
        anyhow::bail!("unknown site: {}", settings.scraper.site);
    };

    // 4. Initialize components
    let transport = Arc::new(ReqwestTransport::new()?);
    let validator = Arc::new(RuleValidator);
    let manager = Arc::new(JobManager::new(
        transport,
        adapter,
        validator,
        settings.scraper.fetch_policy(),
    ));

    // 5. Run the configured job
    let mut job = JobSpec::new(
        format!("scrape-{}", uuid::Uuid::new_v4()),
        settings.search.clone(),
    );
    job.max_properties = settings.scraper.max_properties;
    job.max_concurrent = settings.scraper.max_concurrent;

    let results = manager.run_multiple_jobs(vec![job]).await;

    // 6. Export results
    let exporter = Exporter::new(&settings.output.dir);
    for result in &results {
        if result.status == JobState::Failed {
            error!(
                job_id = %result.job_id,
                error = result.error.as_deref().unwrap_or("unknown"),
                "job failed"
            );
            continue;
        }

        let written = match settings.output.format.as_str() {
            "csv" => exporter.write_csv(result),
            "json" => exporter.write_json(result),
            other => {
                warn!(format = other, "unknown output format, falling back to json");
                exporter.write_json(result)
            }
        };
        let path = written?;

        info!(
            job_id = %result.job_id,
            properties = result.properties.len(),
            success_rate = result.stats.success_rate,
            path = %path.display(),
            "job finished"
        );
    }

    Ok(())
}
