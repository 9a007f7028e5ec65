/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Folio Server Library
//!
//! This crate provides a personal portfolio server: a JSON data store with
//! an admin REST API, a server-side renderer for the public page, and the
//! client-side pieces (HTTP client, layout editor, admin panel controller)
//! that drive the API.

pub mod admin;
pub mod client;
pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Request};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer};

// Re-export commonly used types for convenience
pub use admin::AdminPanel;
pub use client::{Notice, Severity, StoreClient};
pub use config::Config;
pub use error::{AppError, AppResult, ClientError, ClientResult};
pub use layout::{LayoutEditor, LayoutPersister};
pub use models::{LayoutDescriptor, ModuleName, PageDocument, ThemeDescriptor};
pub use render::{apply_theme, render_page, ModuleRegistry};
pub use store::JsonStore;

use routes::{api_routes, public_routes, AppState};
use services::{configure_static_files, StaticConfig};

/// Build the application router
///
/// Seeds the data directory on first start. Returns the router and the
/// port it should listen on.
pub async fn build_app(config: Config) -> AppResult<(Router, u16)> {
    let port = config.port;

    let store = Arc::new(JsonStore::new(&config));
    store.init(&config.initial_admin_password).await?;

    let origin = config
        .url
        .parse::<HeaderValue>()
        .map_err(|e| AppError::InvalidInput(format!("Invalid server URL {}: {}", config.url, e)))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let session_layer =
        SessionManagerLayer::new(MemoryStore::default()).with_secure(config.secure_cookies);

    let static_config = StaticConfig {
        uploads_path: config.uploads_path.clone(),
        static_path: config.static_path.clone(),
    };
    let max_upload_bytes = config.max_upload_bytes;

    let state = AppState {
        store,
        registry: Arc::new(ModuleRegistry::with_built_ins()),
    };

    let app = Router::new()
        .nest("/api", api_routes())
        .merge(public_routes());

    let app = configure_static_files(app, static_config)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok((app, port))
}

/// Serve `app` on `listener` until the server stops
///
/// Trailing slashes are trimmed and handlers see the peer address.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    let app = NormalizePathLayer::trim_trailing_slash().layer(app);
    axum::serve(
        listener,
        axum::ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await
}
