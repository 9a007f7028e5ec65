/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Public routes
//!
//! Routes:
//! - GET / - The rendered portfolio page (records a visit)
//! - GET /data.json - The page document
//! - GET /files/*path - Download a file as an attachment

use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use tokio::fs;

use crate::error::{AppError, AppResult};
use crate::models::{timestamp, PageDocument, VisitorLog};
use crate::render::render_page;
use crate::routes::files::is_contained;
use crate::routes::AppState;

/// Build public routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/data.json", get(data_json))
        .route("/files/*path", get(download_file))
}

/// Visitor address: first X-Forwarded-For entry, else the peer address
fn visitor_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// GET /
async fn index(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    let log = VisitorLog {
        ip: visitor_ip(&headers, peer.map(|ConnectInfo(addr)| addr)),
        timestamp: timestamp(),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("Unknown")
            .to_string(),
    };
    if let Err(e) = state.store.record_visit(log).await {
        tracing::warn!("Failed to record visit: {}", e);
    }

    let document = state.store.document().await?;
    let page = render_page(&document, &state.registry, state.store.as_ref()).await;
    Ok(Html(page))
}

/// GET /data.json
async fn data_json(State(state): State<AppState>) -> AppResult<Json<PageDocument>> {
    Ok(Json(state.store.public_document().await?))
}

/// GET /files/*path
async fn download_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !is_contained(&path) {
        return Err(AppError::NotFound("File".to_string()));
    }

    let content = fs::read(state.store.files_path().join(&path))
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound("File".to_string()),
            _ => AppError::Io(e),
        })?;

    let content_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();
    let file_name = path.rsplit('/').next().unwrap_or(&path).replace('"', "");

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        Bytes::from(content),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_for_wins_over_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        let peer: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        assert_eq!(visitor_ip(&headers, Some(peer)), "203.0.113.7");
    }

    #[test]
    fn peer_address_without_proxy() {
        let peer: SocketAddr = "192.0.2.1:4000".parse().unwrap();
        assert_eq!(visitor_ip(&HeaderMap::new(), Some(peer)), "192.0.2.1");
        assert_eq!(visitor_ip(&HeaderMap::new(), None), "unknown");
    }
}
