/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Data models for Folio
//!
//! These types match the JSON the admin panel and the public page exchange
//! with the server.

mod document;
mod files;
mod layout;
mod stats;
mod theme;

pub use document::*;
pub use files::*;
pub use layout::*;
pub use stats::*;
pub use theme::*;

/// Local wall-clock time in the `YYYY-MM-DD HH:MM:SS` form stored in the JSON files
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
