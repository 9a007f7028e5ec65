/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Shared setup for the integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use folio_server::{build_app, Config, StoreClient};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const PASSWORD: &str = "admin123";

/// A server running on an ephemeral port over temporary directories
pub struct TestServer {
    pub url: String,
    pub dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let url = format!("http://{}", addr);

        let config = Config {
            url: url.clone(),
            port: addr.port(),
            data_path: dir.path().join("data"),
            uploads_path: dir.path().join("uploads"),
            files_path: dir.path().join("files"),
            initial_admin_password: PASSWORD.to_string(),
            bcrypt_cost: 4,
            ..Config::default()
        };
        let (app, _port) = build_app(config).await.unwrap();
        tokio::spawn(folio_server::serve(listener, app));

        TestServer { url, dir }
    }

    pub fn client(&self) -> StoreClient {
        StoreClient::new(&self.url).unwrap()
    }

    /// A client holding an admin session
    pub async fn admin(&self) -> StoreClient {
        let client = self.client();
        client.login(PASSWORD).await.unwrap();
        client
    }

    pub fn files_path(&self) -> PathBuf {
        self.dir.path().join("files")
    }

    pub fn uploads_path(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Raw GET for routes the store client does not wrap
    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(format!("{}{}", self.url, path)).await.unwrap()
    }
}
