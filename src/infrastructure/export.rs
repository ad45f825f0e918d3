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

//! 作业结果的本地导出

use crate::domain::models::job::JobResult;
use crate::domain::models::property::Property;
use chrono::Utc;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    /// 文件写入失败
    #[error("Export IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 序列化失败
    #[error("Export serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// CSV列顺序
const CSV_COLUMNS: &[&str] = &[
    "id",
    "title",
    "price",
    "address",
    "city",
    "state",
    "zip_code",
    "bedrooms",
    "bathrooms",
    "square_feet",
    "lot_size",
    "year_built",
    "property_type",
    "source_url",
    "source_site",
    "scraped_at",
];

/// 结果导出器
///
/// 在输出目录下按时间戳命名写出作业结果
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    /// 创建导出器
    ///
    /// # 参数
    ///
    /// * `output_dir` - 输出目录，不存在时自动创建
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 将作业结果写为带缩进的JSON文件
    ///
    /// # 返回值
    ///
    /// 写出的文件路径
    pub fn write_json(&self, result: &JobResult) -> Result<PathBuf, ExportError> {
        let path = self.destination(&result.job_id, "json")?;
        let json = serde_json::to_string_pretty(result)?;
        std::fs::write(&path, json)?;
        info!(
            path = %path.display(),
            properties = result.properties.len(),
            "job result exported as json"
        );
        Ok(path)
    }

    /// 将作业的房源记录写为CSV文件
    ///
    /// # 返回值
    ///
    /// 写出的文件路径
    pub fn write_csv(&self, result: &JobResult) -> Result<PathBuf, ExportError> {
        let path = self.destination(&result.job_id, "csv")?;

        let mut out = String::new();
        out.push_str(&CSV_COLUMNS.join(","));
        out.push('\n');
        for property in &result.properties {
            out.push_str(&csv_row(property));
            out.push('\n');
        }

        std::fs::write(&path, out)?;
        info!(
            path = %path.display(),
            properties = result.properties.len(),
            "job result exported as csv"
        );
        Ok(path)
    }

    fn destination(&self, job_id: &str, extension: &str) -> Result<PathBuf, std::io::Error> {
        std::fs::create_dir_all(&self.output_dir)?;
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        Ok(self
            .output_dir
            .join(format!("{job_id}_{timestamp}.{extension}")))
    }
}

fn csv_row(property: &Property) -> String {
    let fields: Vec<String> = vec![
        opt_str(&property.id),
        opt_str(&property.title),
        opt_num(property.price),
        opt_str(&property.address),
        opt_str(&property.city),
        opt_str(&property.state),
        opt_str(&property.zip_code),
        property.bedrooms.map(|v| v.to_string()).unwrap_or_default(),
        opt_num(property.bathrooms),
        opt_num(property.square_feet),
        opt_num(property.lot_size),
        property
            .year_built
            .map(|v| v.to_string())
            .unwrap_or_default(),
        opt_str(&property.property_type),
        csv_escape(&property.source_url),
        csv_escape(&property.source_site),
        property.scraped_at.to_rfc3339(),
    ];
    fields.join(",")
}

fn opt_str(value: &Option<String>) -> String {
    value.as_deref().map(csv_escape).unwrap_or_default()
}

fn opt_num(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// 含分隔符、引号或换行的字段用双引号包裹，内部引号成对转义
fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
