// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 作业模型
pub mod job;
/// 房源模型
pub mod property;
