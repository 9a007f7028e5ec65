/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Server services
//!
//! Supporting services for the Folio server.

mod static_files;

pub use static_files::{configure_static_files, StaticConfig, UPLOADS_URL};
