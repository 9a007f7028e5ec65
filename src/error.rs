/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Error types for Folio
//!
//! `AppError` covers the server and the JSON store and maps cleanly to HTTP
//! status codes. `ClientError` covers the HTTP client used by the admin panel
//! and the layout editor.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors that can occur in store and route operations
///
/// Each variant maps to a specific HTTP status code for API responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Admin session missing (HTTP 401)
    #[error("Not logged in")]
    NotAuthenticated,

    /// Login with a wrong password (HTTP 401)
    #[error("Wrong password")]
    WrongPassword,

    /// Requested resource does not exist (HTTP 404)
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data (HTTP 400)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem operation failed (HTTP 500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing/serialization failed (HTTP 500)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session store failure (HTTP 500)
    #[error("Session error: {0}")]
    Session(String),

    /// Password hashing failure (HTTP 500)
    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotAuthenticated | AppError::WrongPassword => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Io(_)
            | AppError::Json(_)
            | AppError::Session(_)
            | AppError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        AppError::Session(e.to_string())
    }
}

/// Convert AppError into the `{success: false, message}` envelope
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!("Server error: {}", message);
        }

        let body = Json(json!({
            "success": false,
            "message": message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for store and route operations
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced by the HTTP data store client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network or transport failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx status or `success: false` reply
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Reply body could not be decoded
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// True when the server answered but refused the request
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Rejected { .. })
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
