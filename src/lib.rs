// Copyright (c) 2025 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

pub mod astro_util;
pub mod catalog_filter;
pub mod catalog_manager;
pub mod catalog_registry;
pub mod catalog_types;
pub mod observer;
pub mod tick_trait;
