// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! Colored status lines printed by the `create` and `graph` handlers

pub mod colors;

pub use colors::{print_info, print_success, print_warning};
