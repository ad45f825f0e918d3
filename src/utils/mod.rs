// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 遥测模块
///
/// 初始化结构化日志
pub mod telemetry;
