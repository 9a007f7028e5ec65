/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Custom module routes
//!
//! Routes:
//! - GET /api/modules - Custom modules keyed by id
//! - POST /api/modules - Add a custom module and append it to the order
//! - PUT /api/modules/:id - Merge fields into a custom module
//! - DELETE /api/modules/:id - Remove a module from the page
//! - POST /api/modules/order - Replace the module order

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{timestamp, CustomModule, ModuleName, NewCustomModule};
use crate::routes::{AdminSession, AppState, MessageResponse};
use crate::store::merge_fields;

/// Build custom module routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_modules).post(create_module))
        .route("/order", post(update_order))
        .route("/:id", put(update_module).delete(delete_module))
}

#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub order: Vec<ModuleName>,
}

/// Id for a module created without one: `custom_` and 8 hex digits
fn generated_module_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("custom_{}", &hex[..8])
}

/// GET /api/modules
async fn list_modules(
    State(state): State<AppState>,
) -> AppResult<Json<BTreeMap<String, CustomModule>>> {
    Ok(Json(state.store.document().await?.modules))
}

/// POST /api/modules
async fn create_module(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(request): Json<NewCustomModule>,
) -> AppResult<Json<Value>> {
    let id = request
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(generated_module_id);

    let module = CustomModule {
        id: id.clone(),
        title: request.title.unwrap_or_else(|| "New module".to_string()),
        content: request.content.unwrap_or_default(),
        kind: request.kind.unwrap_or_else(|| "custom".to_string()),
        link: request.link.unwrap_or_default(),
        visible: request.visible.unwrap_or(true),
        order: request.order.unwrap_or(0),
        created_at: Some(timestamp()),
        updated_at: None,
    };

    let created = module.clone();
    state
        .store
        .update_document(|doc| {
            doc.modules.insert(id.clone(), module);
            let name = ModuleName::new(id);
            if !doc.layout.module_order.contains(&name) {
                doc.layout.module_order.push(name);
            }
            Ok(())
        })
        .await?;
    tracing::debug!("Added custom module {}", created.id);

    Ok(Json(json!({
        "success": true,
        "message": "Module added",
        "module": created
    })))
}

/// PUT /api/modules/:id
async fn update_module(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(patch): Json<Map<String, Value>>,
) -> AppResult<Json<Value>> {
    let module = state
        .store
        .update_document(|doc| {
            let current = doc
                .modules
                .get(&id)
                .ok_or_else(|| AppError::NotFound("Module".to_string()))?;
            let mut merged: CustomModule = merge_fields(current, patch)?;
            merged.id = id.clone();
            merged.updated_at = Some(timestamp());
            doc.modules.insert(id.clone(), merged.clone());
            Ok(merged)
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Module updated",
        "module": module
    })))
}

/// DELETE /api/modules/:id
///
/// Custom modules are removed; built-in modules only leave the order.
async fn delete_module(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .store
        .update_document(|doc| {
            let name = ModuleName::new(id.as_str());
            if doc.modules.remove(&id).is_none() && !name.is_built_in() {
                return Err(AppError::NotFound("Module".to_string()));
            }
            doc.layout.module_order.retain(|m| m != &name);
            Ok(())
        })
        .await?;
    Ok(MessageResponse::ok("Module removed"))
}

/// POST /api/modules/order
async fn update_order(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(request): Json<OrderRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .store
        .update_document(|doc| {
            doc.layout.module_order = request.order;
            Ok(())
        })
        .await?;
    Ok(MessageResponse::ok("Module order updated"))
}
