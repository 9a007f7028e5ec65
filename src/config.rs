/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Configuration for Folio
//!
//! Loads settings from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL where the server is accessible (e.g., "http://localhost:5000")
    pub url: String,

    /// Port to listen on
    pub port: u16,

    /// Directory holding data.json, files.json, stats.json and credentials.json
    pub data_path: PathBuf,

    /// Directory for uploaded images (avatar, background, cursor), served at /static/uploads
    pub uploads_path: PathBuf,

    /// Directory for downloadable file resources, served at /files
    pub files_path: PathBuf,

    /// Optional front-end assets (stylesheets, admin page), served for every unrouted path
    pub static_path: Option<PathBuf>,

    /// Password written to credentials.json when it is first seeded
    pub initial_admin_password: String,

    /// Request body limit in bytes
    pub max_upload_bytes: usize,

    /// Whether the session cookie carries the Secure flag
    pub secure_cookies: bool,

    /// bcrypt work factor for stored passwords
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - FOLIO_PORT: Port number (default: 5000)
    /// - FOLIO_URL: Base URL (default: "http://localhost:{port}")
    /// - FOLIO_DATA_PATH: JSON store directory (default: "./data")
    /// - FOLIO_UPLOADS_PATH: Image uploads (default: "./static/uploads")
    /// - FOLIO_FILES_PATH: Downloadable files (default: "./static/files")
    /// - FOLIO_STATIC_PATH: Front-end assets (default: unset)
    /// - FOLIO_ADMIN_PASSWORD: Seed password (default: "admin123")
    /// - FOLIO_MAX_UPLOAD_BYTES: Body limit (default: 50 MB)
    /// - FOLIO_SECURE_COOKIES: "true" to mark the session cookie Secure
    pub fn from_env() -> Self {
        // Try to load .env file, but don't fail if it doesn't exist
        let _ = dotenvy::dotenv();
        let defaults = Config::default();

        let port = env::var("FOLIO_PORT")
            .or_else(|_| env::var("PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let url = env::var("FOLIO_URL").unwrap_or_else(|_| format!("http://localhost:{}", port));

        let data_path = env::var("FOLIO_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let uploads_path = env::var("FOLIO_UPLOADS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.uploads_path);

        let files_path = env::var("FOLIO_FILES_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.files_path);

        let static_path = env::var("FOLIO_STATIC_PATH").ok().map(PathBuf::from);

        let initial_admin_password =
            env::var("FOLIO_ADMIN_PASSWORD").unwrap_or(defaults.initial_admin_password);

        let max_upload_bytes = env::var("FOLIO_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_upload_bytes);

        let secure_cookies = env::var("FOLIO_SECURE_COOKIES")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Config {
            url,
            port,
            data_path,
            uploads_path,
            files_path,
            static_path,
            initial_admin_password,
            max_upload_bytes,
            secure_cookies,
            bcrypt_cost: defaults.bcrypt_cost,
        }
    }

    /// Get the full server URL including port
    pub fn server_url(&self) -> &str {
        &self.url
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            url: "http://localhost:5000".to_string(),
            port: 5000,
            data_path: PathBuf::from("./data"),
            uploads_path: PathBuf::from("./static/uploads"),
            files_path: PathBuf::from("./static/files"),
            static_path: None,
            initial_admin_password: "admin123".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
            secure_cookies: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}
