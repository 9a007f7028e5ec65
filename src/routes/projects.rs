/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Project routes
//!
//! Routes:
//! - GET /api/projects - List projects
//! - POST /api/projects - Create a project (server assigns the id)
//! - PUT /api/projects/:id - Replace a project
//! - DELETE /api/projects/:id - Delete a project

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{new_id, Project};
use crate::routes::{AdminSession, AppState, MessageResponse};

/// Build project routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/:id", put(update_project).delete(delete_project))
}

/// GET /api/projects
async fn list_projects(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    Ok(Json(state.store.document().await?.projects))
}

/// POST /api/projects
async fn create_project(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(mut project): Json<Project>,
) -> AppResult<Json<Value>> {
    project.id = new_id();
    let created = project.clone();
    state
        .store
        .update_document(|doc| {
            doc.projects.push(project);
            Ok(())
        })
        .await?;
    tracing::debug!("Created project {}", created.id);

    Ok(Json(json!({
        "success": true,
        "message": "Project added",
        "project": created
    })))
}

/// PUT /api/projects/:id
async fn update_project(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(mut project): Json<Project>,
) -> AppResult<Json<Value>> {
    project.id = id.clone();
    let updated = project.clone();
    state
        .store
        .update_document(|doc| {
            let slot = doc
                .projects
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| AppError::NotFound("Project".to_string()))?;
            *slot = project;
            Ok(())
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Project updated",
        "project": updated
    })))
}

/// DELETE /api/projects/:id
///
/// Deleting an id that does not exist succeeds.
async fn delete_project(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .store
        .update_document(|doc| {
            doc.projects.retain(|p| p.id != id);
            Ok(())
        })
        .await?;
    Ok(MessageResponse::ok("Project deleted"))
}
