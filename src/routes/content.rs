/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Document section routes
//!
//! Routes:
//! - GET /api/data - Full page document
//! - POST /api/data - Replace the sections present in the body
//! - GET /api/profile, POST /api/profile - Profile and announcement
//! - POST /api/skills - Replace the skill list
//! - GET /api/theme, POST /api/theme - Public page theme
//! - GET /api/admin-theme, POST /api/admin-theme - Admin panel colours
//! - GET /api/layout, POST /api/layout - Module layout

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{AppError, AppResult};
use crate::models::{
    new_id, AdminTheme, LayoutDescriptor, PageDocument, Profile, ProfileUpdate, Skill,
    ThemeDescriptor,
};
use crate::routes::{AdminSession, AppState, MessageResponse};
use crate::store::merge_fields;

/// Build document section routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/data", get(get_data).post(replace_data))
        .route("/profile", get(get_profile).post(update_profile))
        .route("/skills", post(update_skills))
        .route("/theme", get(get_theme).post(update_theme))
        .route("/admin-theme", get(get_admin_theme).post(update_admin_theme))
        .route("/layout", get(get_layout).post(update_layout))
}

#[derive(Debug, Deserialize)]
pub struct SkillsRequest {
    #[serde(default)]
    pub skills: Vec<Skill>,
}

fn require_fields(patch: &Map<String, Value>) -> AppResult<()> {
    if patch.is_empty() {
        return Err(AppError::InvalidInput("No data".to_string()));
    }
    Ok(())
}

/// GET /api/data
async fn get_data(State(state): State<AppState>) -> AppResult<Json<PageDocument>> {
    Ok(Json(state.store.public_document().await?))
}

/// POST /api/data
///
/// Each top-level key replaces that section in full.
async fn replace_data(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(patch): Json<Map<String, Value>>,
) -> AppResult<Json<MessageResponse>> {
    state.store.replace_sections(patch).await?;
    Ok(MessageResponse::ok("Data updated"))
}

/// GET /api/profile
async fn get_profile(State(state): State<AppState>) -> AppResult<Json<Profile>> {
    Ok(Json(state.store.document().await?.profile))
}

/// POST /api/profile
///
/// Blank fields keep their stored value.
async fn update_profile(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Json<Value>> {
    if update.is_empty() {
        return Err(AppError::InvalidInput("No data".to_string()));
    }
    let profile = state
        .store
        .update_document(|doc| {
            update.apply(doc);
            Ok(doc.profile.clone())
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated",
        "profile": profile
    })))
}

/// POST /api/skills
async fn update_skills(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(request): Json<SkillsRequest>,
) -> AppResult<Json<Value>> {
    let mut skills = request.skills;
    for skill in skills.iter_mut().filter(|s| s.id.is_empty()) {
        skill.id = new_id();
    }

    let skills = state
        .store
        .update_document(|doc| {
            doc.skills = skills;
            Ok(doc.skills.clone())
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Skills updated",
        "skills": skills
    })))
}

/// GET /api/theme
async fn get_theme(State(state): State<AppState>) -> AppResult<Json<ThemeDescriptor>> {
    Ok(Json(state.store.document().await?.theme))
}

/// POST /api/theme
///
/// Merges the posted flat fields over the stored theme.
async fn update_theme(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(patch): Json<Map<String, Value>>,
) -> AppResult<Json<Value>> {
    require_fields(&patch)?;
    let theme = state
        .store
        .update_document(|doc| {
            doc.theme = merge_fields(&doc.theme, patch)?;
            Ok(doc.theme.clone())
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Theme updated",
        "theme": theme
    })))
}

/// GET /api/admin-theme
async fn get_admin_theme(State(state): State<AppState>) -> AppResult<Json<AdminTheme>> {
    let doc = state.store.document().await?;
    Ok(Json(doc.admin_theme.unwrap_or_default()))
}

/// POST /api/admin-theme
async fn update_admin_theme(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(patch): Json<Map<String, Value>>,
) -> AppResult<Json<Value>> {
    require_fields(&patch)?;
    let admin_theme = state
        .store
        .update_document(|doc| {
            let current = doc.admin_theme.clone().unwrap_or_default();
            let merged = merge_fields(&current, patch)?;
            doc.admin_theme = Some(merged.clone());
            Ok(merged)
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Admin theme updated",
        "admin_theme": admin_theme
    })))
}

/// GET /api/layout
async fn get_layout(State(state): State<AppState>) -> AppResult<Json<LayoutDescriptor>> {
    Ok(Json(state.store.document().await?.layout))
}

/// POST /api/layout
async fn update_layout(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(patch): Json<Map<String, Value>>,
) -> AppResult<Json<Value>> {
    require_fields(&patch)?;
    let layout = state
        .store
        .update_document(|doc| {
            doc.layout = merge_fields(&doc.layout, patch)?;
            Ok(doc.layout.clone())
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Layout updated",
        "layout": layout
    })))
}
