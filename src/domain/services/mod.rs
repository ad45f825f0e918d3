// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 站点适配器特质
pub mod site_adapter;
/// 房源校验
pub mod validation;
