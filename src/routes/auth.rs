/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Admin session routes
//!
//! Routes:
//! - POST /api/login - Open an admin session
//! - POST /api/logout - Close it
//! - POST /api/password - Change the admin password

use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::routing::post;
use axum::{async_trait, Json, Router};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, AppResult};
use crate::routes::{AppState, MessageResponse};

/// Session key set once the password was checked
pub const LOGGED_IN_KEY: &str = "logged_in";

/// Build session routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/password", post(change_password))
}

/// Extractor that only succeeds for a logged-in admin
///
/// Handlers taking it answer 401 `{success: false}` to anonymous callers.
pub struct AdminSession(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| AppError::Session(message.to_string()))?;

        let logged_in = session.get::<bool>(LOGGED_IN_KEY).await?.unwrap_or(false);
        if !logged_in {
            return Err(AppError::NotAuthenticated);
        }
        Ok(AdminSession(session))
    }
}

// ==================
// Request types
// ==================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

// ==================
// Route handlers
// ==================

/// POST /api/login
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<MessageResponse>> {
    if !state.store.verify_password(&request.password).await? {
        tracing::warn!("Rejected admin login");
        return Err(AppError::WrongPassword);
    }

    session.cycle_id().await?;
    session.insert(LOGGED_IN_KEY, true).await?;
    tracing::info!("Admin logged in");

    Ok(MessageResponse::ok("Logged in"))
}

/// POST /api/logout
async fn logout(session: Session) -> AppResult<Json<MessageResponse>> {
    session.flush().await?;
    Ok(MessageResponse::ok("Logged out"))
}

/// POST /api/password
async fn change_password(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(request): Json<PasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .store
        .change_password(&request.old_password, &request.new_password)
        .await?;
    tracing::info!("Admin password changed");
    Ok(MessageResponse::ok("Password changed"))
}
