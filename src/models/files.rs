/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Downloadable file resources

use serde::{Deserialize, Serialize};

/// Extensions accepted for downloadable files
pub const FILE_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "txt", "zip", "rar", "mp4", "mp3", "avi", "mkv", "xlsx", "xls", "ppt",
    "pptx", "png", "jpg", "jpeg", "gif", "webp", "bmp", "svg",
];

/// Extensions accepted for image uploads (avatar, background, generic upload)
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Extensions accepted for custom cursors
pub const CURSOR_EXTENSIONS: &[&str] = &["cur", "png", "svg", "ico"];

/// Lower-cased extension of a file name, if it has one
pub fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// A downloadable file listed on the public page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: String,

    /// Name the file was uploaded with
    #[serde(default)]
    pub original_name: String,

    /// Stored (generated) file name
    pub filename: String,

    /// Path below the files directory, including the folder if any
    #[serde(default)]
    pub relative_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Size in bytes
    #[serde(default)]
    pub size: u64,

    #[serde(default)]
    pub upload_date: String,

    /// Extension-derived type
    #[serde(rename = "type", default)]
    pub file_type: String,

    /// Download clicks; best-effort, not exactly-once
    #[serde(default)]
    pub downloads: u64,
}

impl FileEntry {
    /// Path used in download URLs, falling back to the bare file name for legacy rows
    pub fn download_path(&self) -> &str {
        if self.relative_path.is_empty() {
            &self.filename
        } else {
            &self.relative_path
        }
    }

    #[cfg(test)]
    pub(crate) fn sample(name: &str) -> Self {
        FileEntry {
            id: super::new_id(),
            original_name: name.to_string(),
            filename: name.to_string(),
            relative_path: name.to_string(),
            folder: None,
            description: String::new(),
            size: 2048,
            upload_date: "2024-01-01 00:00:00".to_string(),
            file_type: extension_of(name).unwrap_or_default(),
            downloads: 0,
        }
    }
}

/// A file record whose physical file is gone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFile {
    pub id: String,
    pub name: String,
    pub filename: String,
}

/// Reply of GET /api/files/status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesStatus {
    pub total: usize,
    pub missing: usize,
    pub missing_files: Vec<MissingFile>,
}
