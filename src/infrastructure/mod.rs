// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 结果导出
pub mod export;
/// 站点适配器实现
pub mod sites;
