/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! JSON file store
//!
//! Keeps the site in a handful of JSON files:
//! ```text
//! data_path/
//!   data.json         page document (without files and stats)
//!   files.json        downloadable file records
//!   stats.json        visit counter and visitor log
//!   credentials.json  bcrypt hash of the admin password
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::layout::LayoutPersister;
use crate::models::{
    new_id, FileEntry, FilesStatus, LayoutDescriptor, MissingFile, ModuleName, PageDocument,
    Profile, Project, Skill, Stats, ThemeDescriptor, ThemeRecord, VisitorLog,
};
use crate::render::{FileSource, DEFAULT_AVATAR, DEFAULT_BIO, DEFAULT_NAME, DEFAULT_TITLE};

use super::constants;

/// Minimum length of a new admin password
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Serialize, Deserialize)]
struct Credentials {
    password_hash: String,
}

/// Store for the page document and its companion files
///
/// Every read-modify-write holds `write_lock`, so concurrent requests on one
/// server never interleave. Writes go through a temp file and a rename.
pub struct JsonStore {
    /// Directory holding the JSON files
    data_path: PathBuf,

    /// Uploaded images
    uploads_path: PathBuf,

    /// Downloadable file resources
    files_path: PathBuf,

    bcrypt_cost: u32,

    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Create a store over the directories named in the configuration
    pub fn new(config: &Config) -> Self {
        JsonStore {
            data_path: config.data_path.clone(),
            uploads_path: config.uploads_path.clone(),
            files_path: config.files_path.clone(),
            bcrypt_cost: config.bcrypt_cost,
            write_lock: Mutex::new(()),
        }
    }

    pub fn uploads_path(&self) -> &Path {
        &self.uploads_path
    }

    pub fn files_path(&self) -> &Path {
        &self.files_path
    }

    fn file(&self, name: &str) -> PathBuf {
        self.data_path.join(name)
    }

    /// Create directories and seed every missing data file
    pub async fn init(&self, initial_password: &str) -> AppResult<()> {
        fs::create_dir_all(&self.data_path).await?;
        fs::create_dir_all(&self.uploads_path).await?;
        fs::create_dir_all(&self.files_path).await?;

        let data_file = self.file(constants::DATA_FILE);
        if !exists(&data_file).await {
            write_json(&data_file, &seed_document()).await?;
            tracing::info!("Seeded page document in {}", data_file.display());
        } else {
            self.assign_missing_ids(&data_file).await?;
        }

        let files_file = self.file(constants::FILES_DB_FILE);
        if !exists(&files_file).await {
            write_json(&files_file, &Vec::<FileEntry>::new()).await?;
        }

        let stats_file = self.file(constants::STATS_FILE);
        if !exists(&stats_file).await {
            write_json(&stats_file, &Stats::default()).await?;
        }

        let credentials_file = self.file(constants::CREDENTIALS_FILE);
        if !exists(&credentials_file).await {
            let password_hash = self.hash_password(initial_password).await?;
            write_json(&credentials_file, &Credentials { password_hash }).await?;
            tracing::info!("Seeded admin credentials");
        }

        Ok(())
    }

    /// Persist ids for skills and buttons stored without one
    ///
    /// Older documents identify these entries by position only; ids are
    /// generated once here so every later read sees the same ones.
    async fn assign_missing_ids(&self, path: &Path) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let raw: serde_json::Value = read_json(path, "Page document").await?;
        if !lacks_ids(&raw) {
            return Ok(());
        }
        let mut doc: PageDocument = serde_json::from_value(raw)?;
        doc.assign_missing_ids();
        write_json(path, &doc.detached()).await?;
        tracing::info!("Assigned missing skill and button ids in {}", path.display());
        Ok(())
    }

    // ==================
    // Page document
    // ==================

    /// Read the stored document (no files, no stats)
    pub async fn document(&self) -> AppResult<PageDocument> {
        read_json(&self.file(constants::DATA_FILE), "Page document").await
    }

    /// The document as served to readers, with the file list filled in
    pub async fn public_document(&self) -> AppResult<PageDocument> {
        let mut doc = self.document().await?;
        doc.files = self.files().await?;
        Ok(doc)
    }

    /// Apply `f` to the stored document and persist the result
    ///
    /// Nothing is written when `f` fails.
    pub async fn update_document<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut PageDocument) -> AppResult<T>,
    {
        let _guard = self.write_lock.lock().await;
        let path = self.file(constants::DATA_FILE);
        let mut doc: PageDocument = read_json(&path, "Page document").await?;
        let result = f(&mut doc)?;
        write_json(&path, &doc.detached()).await?;
        Ok(result)
    }

    /// Replace each top-level section named in `patch` in full
    ///
    /// A `null` section is cleared back to its default. Sections owned by
    /// other files (`files`, `stats`) are ignored.
    pub async fn replace_sections(
        &self,
        patch: serde_json::Map<String, serde_json::Value>,
    ) -> AppResult<()> {
        if patch.is_empty() {
            return Err(AppError::InvalidInput("No data".to_string()));
        }
        self.update_document(|doc| {
            let mut value = serde_json::to_value(&*doc)?;
            if let serde_json::Value::Object(sections) = &mut value {
                for (key, section) in patch {
                    if PageDocument::DETACHED_SECTIONS.contains(&key.as_str()) {
                        continue;
                    }
                    if section.is_null() {
                        sections.remove(&key);
                    } else {
                        sections.insert(key, section);
                    }
                }
            }
            *doc = serde_json::from_value(value)
                .map_err(|e| AppError::InvalidInput(e.to_string()))?;
            doc.assign_missing_ids();
            Ok(())
        })
        .await
    }

    // ==================
    // Files
    // ==================

    pub async fn files(&self) -> AppResult<Vec<FileEntry>> {
        read_json(&self.file(constants::FILES_DB_FILE), "File list").await
    }

    /// Apply `f` to the file records and persist the result
    pub async fn update_files<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Vec<FileEntry>) -> AppResult<T>,
    {
        let _guard = self.write_lock.lock().await;
        let path = self.file(constants::FILES_DB_FILE);
        let mut files: Vec<FileEntry> = read_json(&path, "File list").await?;
        let result = f(&mut files)?;
        write_json(&path, &files).await?;
        Ok(result)
    }

    /// Bump the download counter of a file
    pub async fn increment_downloads(&self, file_id: &str) -> AppResult<u64> {
        self.update_files(|files| {
            let entry = files
                .iter_mut()
                .find(|f| f.id == file_id)
                .ok_or_else(|| AppError::NotFound("File".to_string()))?;
            entry.downloads += 1;
            Ok(entry.downloads)
        })
        .await
    }

    /// Remove a file's physical file, then its record
    ///
    /// A failed removal leaves the record in place.
    pub async fn delete_file(&self, file_id: &str) -> AppResult<FileEntry> {
        let entry = self
            .files()
            .await?
            .into_iter()
            .find(|f| f.id == file_id)
            .ok_or_else(|| AppError::NotFound("File".to_string()))?;

        let path = self.files_path.join(entry.download_path());
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("File {} was already missing", path.display());
            }
            Err(e) => return Err(e.into()),
        }

        self.update_files(|files| {
            let index = files
                .iter()
                .position(|f| f.id == file_id)
                .ok_or_else(|| AppError::NotFound("File".to_string()))?;
            Ok(files.remove(index))
        })
        .await
    }

    /// Report records whose physical file is gone
    pub async fn files_status(&self) -> AppResult<FilesStatus> {
        let files = self.files().await?;
        let mut missing_files = Vec::new();
        for file in &files {
            if !exists(&self.files_path.join(file.download_path())).await {
                missing_files.push(MissingFile {
                    id: file.id.clone(),
                    name: file.original_name.clone(),
                    filename: file.filename.clone(),
                });
            }
        }
        Ok(FilesStatus {
            total: files.len(),
            missing: missing_files.len(),
            missing_files,
        })
    }

    // ==================
    // Stats
    // ==================

    pub async fn stats(&self) -> AppResult<Stats> {
        read_json(&self.file(constants::STATS_FILE), "Stats").await
    }

    pub async fn record_visit(&self, log: VisitorLog) -> AppResult<Stats> {
        let _guard = self.write_lock.lock().await;
        let path = self.file(constants::STATS_FILE);
        let mut stats: Stats = read_json(&path, "Stats").await?;
        stats.record(log);
        write_json(&path, &stats).await?;
        Ok(stats)
    }

    // ==================
    // Credentials
    // ==================

    async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Io(std::io::Error::other(e)))??;
        Ok(hash)
    }

    /// Check a password against the stored hash
    pub async fn verify_password(&self, password: &str) -> AppResult<bool> {
        let credentials: Credentials =
            read_json(&self.file(constants::CREDENTIALS_FILE), "Credentials").await?;
        let password = password.to_string();
        let valid = tokio::task::spawn_blocking(move || {
            bcrypt::verify(password, &credentials.password_hash)
        })
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))??;
        Ok(valid)
    }

    /// Replace the admin password after checking the old one
    pub async fn change_password(&self, old: &str, new: &str) -> AppResult<()> {
        if !self.verify_password(old).await? {
            return Err(AppError::InvalidInput("Old password is incorrect".to_string()));
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "New password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let password_hash = self.hash_password(new).await?;
        let _guard = self.write_lock.lock().await;
        write_json(
            &self.file(constants::CREDENTIALS_FILE),
            &Credentials { password_hash },
        )
        .await
    }
}

#[async_trait]
impl FileSource for JsonStore {
    async fn list_files(&self) -> anyhow::Result<Vec<FileEntry>> {
        Ok(self.files().await?)
    }
}

#[async_trait]
impl LayoutPersister for JsonStore {
    async fn persist_order(&self, order: &[ModuleName]) -> anyhow::Result<()> {
        self.update_document(|doc| {
            doc.layout.module_order = order.to_vec();
            Ok(())
        })
        .await?;
        Ok(())
    }
}

/// Document written on first start
pub fn seed_document() -> PageDocument {
    PageDocument {
        profile: Profile {
            name: Some(DEFAULT_NAME.into()),
            title: Some(DEFAULT_TITLE.into()),
            avatar: Some(DEFAULT_AVATAR.into()),
            bio: Some(DEFAULT_BIO.into()),
            email: Some("your.email@example.com".into()),
            github: Some("https://github.com/yourusername".into()),
            location: Some("Earth".into()),
        },
        skills: vec![
            Skill::new("HTML/CSS", 90),
            Skill::new("JavaScript", 85),
            Skill::new("Python", 80),
            Skill::new("React", 75),
        ],
        projects: vec![Project {
            id: new_id(),
            title: "Sample project".into(),
            description: "A short description of the project".into(),
            image: "/static/uploads/default-project.png".into(),
            link: "#".into(),
            tags: vec!["Web".into(), "Frontend".into()],
        }],
        theme: ThemeDescriptor::from(ThemeRecord {
            background_type: Some("gradient".into()),
            background_color: Some("#667eea".into()),
            background_color_end: Some("#764ba2".into()),
            cursor_style: Some("default".into()),
            ..Default::default()
        }),
        layout: LayoutDescriptor::seed(),
        ..Default::default()
    }
}

/// True when a raw document has skills or buttons without a usable id
fn lacks_ids(raw: &serde_json::Value) -> bool {
    ["skills", "buttons"].iter().any(|section| {
        raw.get(section)
            .and_then(|entries| entries.as_array())
            .is_some_and(|entries| {
                entries.iter().any(|entry| {
                    entry
                        .get("id")
                        .and_then(|id| id.as_str())
                        .map_or(true, str::is_empty)
                })
            })
    })
}

/// Check whether a path exists
async fn exists(path: &Path) -> bool {
    fs::metadata(path).await.is_ok()
}

/// Read and parse a JSON file, mapping a missing file to NotFound
async fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> AppResult<T> {
    let content = fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound(what.to_string())
        } else {
            AppError::Io(e)
        }
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Write pretty JSON through a temp file and rename
async fn write_json<T: Serialize>(path: &Path, data: &T) -> AppResult<()> {
    let content = serde_json::to_string_pretty(data)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
