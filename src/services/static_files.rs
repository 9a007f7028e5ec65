/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Static file serving
//!
//! Uploaded images are served from /static/uploads. An optional asset
//! directory (stylesheets, admin and login pages) backs every path no route
//! claims.

use std::path::PathBuf;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// Public URL prefix of the uploads directory
pub const UPLOADS_URL: &str = "/static/uploads";

/// Static file configuration
pub struct StaticConfig {
    /// Uploaded images
    pub uploads_path: PathBuf,
    /// Front-end assets served as the router fallback
    pub static_path: Option<PathBuf>,
}

/// Configure static file serving on the router
pub fn configure_static_files<S: Clone + Send + Sync + 'static>(
    app: Router<S>,
    config: StaticConfig,
) -> Router<S> {
    tracing::info!(
        "Serving uploads from {} at {}",
        config.uploads_path.display(),
        UPLOADS_URL
    );
    let app = app.nest_service(UPLOADS_URL, ServeDir::new(&config.uploads_path));

    match config.static_path {
        Some(path) => configure_assets(app, path),
        None => app,
    }
}

/// Serve `path` for every unrouted request; /admin maps to admin.html
fn configure_assets<S: Clone + Send + Sync + 'static>(app: Router<S>, path: PathBuf) -> Router<S> {
    if !path.exists() {
        tracing::warn!("Static path {} does not exist", path.display());
        return app;
    }

    tracing::info!("Serving static files from {}", path.display());
    let admin = ServeFile::new(path.join("admin.html"));
    let serve_dir = ServeDir::new(&path).append_index_html_on_directories(false);
    app.route_service("/admin", admin).fallback_service(serve_dir)
}
