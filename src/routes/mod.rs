/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! HTTP routes for Folio
//!
//! The REST API lives under /api; the public page, /data.json and file
//! downloads are served from the root. Routes are organized into submodules
//! by functionality.

mod auth;
mod content;
mod files;
mod modules;
mod projects;
mod public;
mod stats;
mod uploads;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::render::ModuleRegistry;
use crate::store::JsonStore;

pub use auth::{AdminSession, LOGGED_IN_KEY};

/// Shared application state
///
/// This state is available to all route handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    /// The JSON data store
    pub store: Arc<JsonStore>,

    /// Renderers of the public page modules
    pub registry: Arc<ModuleRegistry>,
}

/// Build the API router with all routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Session (login, logout, password)
        .merge(auth::routes())
        // Document sections (data, profile, skills, theme, layout)
        .merge(content::routes())
        .nest("/projects", projects::routes())
        .nest("/modules", modules::routes())
        .nest("/files", files::routes())
        // Image uploads
        .merge(uploads::routes())
        .route("/stats", get(stats::get_stats))
}

/// Routes served from the site root
pub fn public_routes() -> Router<AppState> {
    public::routes().route("/health", get(health_check))
}

/// `{success: true, message}` reply of the mutating endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Json<MessageResponse> {
        Json(MessageResponse {
            success: true,
            message: message.into(),
        })
    }
}

/// Health check endpoint
///
/// Returns a simple JSON response to verify the server is running.
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "folio-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
