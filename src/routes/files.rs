/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Downloadable file routes
//!
//! Routes:
//! - GET /api/files - List file records
//! - POST /api/files - Upload files (multipart `files`, `folder`, `description`)
//! - GET /api/files/status - Records whose physical file is missing
//! - DELETE /api/files/:id - Remove a record and its file
//! - POST /api/files/:id/download - Bump the download counter

use std::path::{Component, Path as FsPath};

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{timestamp, FileEntry, FilesStatus, FILE_EXTENSIONS};
use crate::routes::uploads::{multipart_error, write_upload, UploadedFile};
use crate::routes::{AdminSession, AppState, MessageResponse};

/// Build file routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_files).post(upload_files))
        .route("/status", get(files_status))
        .route("/:id", delete(delete_file))
        .route("/:id/download", post(record_download))
}

/// Whether `path` stays inside the directory it is joined to
pub(crate) fn is_contained(path: &str) -> bool {
    !path.is_empty()
        && FsPath::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// GET /api/files
async fn list_files(State(state): State<AppState>) -> AppResult<Json<Vec<FileEntry>>> {
    Ok(Json(state.store.files().await?))
}

/// GET /api/files/status
async fn files_status(State(state): State<AppState>) -> AppResult<Json<FilesStatus>> {
    Ok(Json(state.store.files_status().await?))
}

/// POST /api/files
///
/// Files with a disallowed extension are reported in `errors`; the upload
/// succeeds when at least one file was stored.
async fn upload_files(
    State(state): State<AppState>,
    _admin: AdminSession,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut uploads = Vec::new();
    let mut folder = String::new();
    let mut description = String::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some("files") => {
                let file_name = field.file_name().map(String::from).unwrap_or_default();
                let content = field.bytes().await.map_err(multipart_error)?;
                if !file_name.is_empty() {
                    uploads.push(UploadedFile { file_name, content });
                }
            }
            Some("folder") => folder = field.text().await.map_err(multipart_error)?,
            Some("description") => description = field.text().await.map_err(multipart_error)?,
            _ => {}
        }
    }

    if uploads.is_empty() {
        return Err(AppError::InvalidInput("No file selected".to_string()));
    }

    let folder = folder.trim().trim_matches('/').to_string();
    if !folder.is_empty() && !is_contained(&folder) {
        return Err(AppError::InvalidInput("Invalid folder".to_string()));
    }
    let dir = if folder.is_empty() {
        state.store.files_path().to_path_buf()
    } else {
        state.store.files_path().join(&folder)
    };

    let mut stored = Vec::new();
    let mut errors = Vec::new();
    for upload in uploads {
        let Some(ext) = upload.allowed_extension(FILE_EXTENSIONS) else {
            errors.push(format!("{}: unsupported file type", upload.file_name));
            continue;
        };
        let filename = format!("{}.{}", Uuid::new_v4().simple(), ext);
        if let Err(e) = write_upload(&dir, &filename, &upload.content).await {
            errors.push(format!("{}: {}", upload.file_name, e));
            continue;
        }

        let relative_path = if folder.is_empty() {
            filename.clone()
        } else {
            format!("{}/{}", folder, filename)
        };
        stored.push(FileEntry {
            id: Uuid::new_v4().to_string(),
            original_name: upload.file_name,
            filename,
            relative_path,
            folder: (!folder.is_empty()).then(|| folder.clone()),
            description: description.clone(),
            size: upload.content.len() as u64,
            upload_date: timestamp(),
            file_type: ext,
            downloads: 0,
        });
    }

    if stored.is_empty() {
        let body = json!({
            "success": false,
            "message": "Upload failed",
            "errors": errors
        });
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    let records = stored.clone();
    state
        .store
        .update_files(|files| {
            files.extend(records);
            Ok(())
        })
        .await?;

    let mut message = format!("Uploaded {} file(s)", stored.len());
    if !errors.is_empty() {
        message.push_str(&format!(", {} failed", errors.len()));
    }
    tracing::info!("{}", message);

    Ok(Json(json!({
        "success": true,
        "message": message,
        "files": stored,
        "errors": errors
    }))
    .into_response())
}

/// DELETE /api/files/:id
async fn delete_file(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let removed = state.store.delete_file(&id).await?;
    tracing::info!("Deleted file {}", removed.original_name);
    Ok(MessageResponse::ok("File deleted"))
}

/// POST /api/files/:id/download
///
/// Public; the download itself never depends on it.
async fn record_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let downloads = state.store.increment_downloads(&id).await?;
    Ok(Json(json!({ "success": true, "downloads": downloads })))
}
