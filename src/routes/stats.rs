/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Visit statistics route

use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::models::Stats;
use crate::routes::{AdminSession, AppState};

/// GET /api/stats
pub async fn get_stats(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<Stats>> {
    Ok(Json(state.store.stats().await?))
}
