/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Image upload routes
//!
//! Uploaded images land in the uploads directory and are served from
//! /static/uploads/.
//!
//! Routes:
//! - POST /api/upload - Generic image (field `file`)
//! - POST /api/upload-avatar - Profile avatar (field `avatar`)
//! - POST /api/upload-background - Background image (field `file`)
//! - POST /api/upload-cursor - Custom cursor (field `cursor`)

use std::path::Path;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{extension_of, Cursor, CURSOR_EXTENSIONS, IMAGE_EXTENSIONS};
use crate::routes::{AdminSession, AppState};
use crate::services::UPLOADS_URL;

/// Build image upload routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_image))
        .route("/upload-avatar", post(upload_avatar))
        .route("/upload-background", post(upload_background))
        .route("/upload-cursor", post(upload_cursor))
}

/// One file read from a multipart body
pub(super) struct UploadedFile {
    pub file_name: String,
    pub content: Bytes,
}

impl UploadedFile {
    /// Lower-cased extension if it is in `allowed`
    pub fn allowed_extension(&self, allowed: &[&str]) -> Option<String> {
        extension_of(&self.file_name).filter(|ext| allowed.contains(&ext.as_str()))
    }
}

pub(super) fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::InvalidInput(format!("Failed to read multipart field: {}", e))
}

/// Read the file sent in `field`, ignoring other fields
async fn read_file_field(multipart: &mut Multipart, field_name: &str) -> AppResult<UploadedFile> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(field_name) {
            continue;
        }
        let file_name = field.file_name().map(String::from).unwrap_or_default();
        let content = field.bytes().await.map_err(multipart_error)?;
        if file_name.is_empty() {
            return Err(AppError::InvalidInput("No file selected".to_string()));
        }
        return Ok(UploadedFile { file_name, content });
    }
    Err(AppError::InvalidInput("No file".to_string()))
}

/// Write `content` as `dir/name`, creating `dir` if needed
pub(super) async fn write_upload(dir: &Path, name: &str, content: &[u8]) -> AppResult<()> {
    fs::create_dir_all(dir).await?;
    fs::write(dir.join(name), content).await?;
    Ok(())
}

fn unsupported(allowed: &[&str]) -> AppError {
    AppError::InvalidInput(format!(
        "Unsupported file type, allowed: {}",
        allowed.join(", ")
    ))
}

/// Read, check and store one image, returning its public URL
async fn store_image(
    state: &AppState,
    multipart: &mut Multipart,
    field_name: &str,
    allowed: &[&str],
    name_for: impl FnOnce(&str) -> String,
) -> AppResult<String> {
    let file = read_file_field(multipart, field_name).await?;
    let ext = file
        .allowed_extension(allowed)
        .ok_or_else(|| unsupported(allowed))?;
    let name = name_for(&ext);
    write_upload(state.store.uploads_path(), &name, &file.content).await?;
    tracing::debug!("Stored upload {} as {}", file.file_name, name);
    Ok(format!("{}/{}", UPLOADS_URL, name))
}

/// POST /api/upload
async fn upload_image(
    State(state): State<AppState>,
    _admin: AdminSession,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let url = store_image(&state, &mut multipart, "file", IMAGE_EXTENSIONS, |ext| {
        format!("{}.{}", Uuid::new_v4().simple(), ext)
    })
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Uploaded",
        "url": url
    })))
}

/// POST /api/upload-avatar
///
/// Stored under a fixed name so a new avatar replaces the old one.
async fn upload_avatar(
    State(state): State<AppState>,
    _admin: AdminSession,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let url = store_image(&state, &mut multipart, "avatar", IMAGE_EXTENSIONS, |ext| {
        format!("avatar.{}", ext)
    })
    .await?;

    let avatar = url.clone();
    state
        .store
        .update_document(|doc| {
            doc.profile.avatar = Some(avatar);
            Ok(())
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Avatar uploaded",
        "avatar_url": url
    })))
}

/// POST /api/upload-background
///
/// Only stores the image; the theme is saved separately.
async fn upload_background(
    State(state): State<AppState>,
    _admin: AdminSession,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let url = store_image(&state, &mut multipart, "file", IMAGE_EXTENSIONS, |ext| {
        let hex = Uuid::new_v4().simple().to_string();
        format!("background_{}.{}", &hex[..8], ext)
    })
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Background uploaded",
        "url": url
    })))
}

/// POST /api/upload-cursor
///
/// Switches the theme to the uploaded cursor.
async fn upload_cursor(
    State(state): State<AppState>,
    _admin: AdminSession,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let url = store_image(&state, &mut multipart, "cursor", CURSOR_EXTENSIONS, |ext| {
        format!("cursor_{}.{}", Uuid::new_v4().simple(), ext)
    })
    .await?;

    let cursor_url = url.clone();
    state
        .store
        .update_document(|doc| {
            doc.theme.cursor = Cursor::Custom { url: cursor_url };
            Ok(())
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Cursor uploaded",
        "cursor_url": url
    })))
}
