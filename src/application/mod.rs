// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 作业管理器
pub mod job_manager;
/// 房源抓取协调器
pub mod property_scraper;
