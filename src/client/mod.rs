/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Data store client
//!
//! Typed access to the REST surface over HTTP. Every save replaces a whole
//! section; failures are returned to the caller, which turns them into a
//! notice. There is no retry and no offline queue here.

mod notice;

pub use notice::{Dismiss, Notice, Severity, NOTICE_DURATION};

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::error::{ClientError, ClientResult};
use crate::layout::LayoutPersister;
use crate::models::{
    AdminTheme, CustomModule, FileEntry, FilesStatus, LayoutDescriptor, ModuleName,
    NewCustomModule, PageDocument, Profile, ProfileUpdate, Project, Skill, Stats,
    ThemeDescriptor,
};
use crate::render::FileSource;

/// A file to send in a multipart upload
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Upload {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    fn into_part(self) -> ClientResult<Part> {
        let mime = mime_guess::from_path(&self.file_name).first_or_octet_stream();
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(mime.as_ref())?)
    }
}

/// Outcome of a multi-file upload
///
/// The upload succeeds when at least one file was stored; the others are
/// listed in `errors`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadReport {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Deserialize)]
struct ProfileReply {
    profile: Profile,
}

#[derive(Deserialize)]
struct SkillsReply {
    skills: Vec<Skill>,
}

#[derive(Deserialize)]
struct ProjectReply {
    project: Project,
}

#[derive(Deserialize)]
struct ThemeReply {
    theme: ThemeDescriptor,
}

#[derive(Deserialize)]
struct AdminThemeReply {
    admin_theme: AdminTheme,
}

#[derive(Deserialize)]
struct LayoutReply {
    layout: LayoutDescriptor,
}

#[derive(Deserialize)]
struct ModuleReply {
    module: CustomModule,
}

#[derive(Deserialize)]
struct DownloadReply {
    downloads: u64,
}

#[derive(Deserialize)]
struct UrlReply {
    url: String,
}

#[derive(Deserialize)]
struct AvatarReply {
    avatar_url: String,
}

#[derive(Deserialize)]
struct CursorReply {
    cursor_url: String,
}

/// HTTP client for one Folio server
///
/// Holds the session cookie after `login`, so one client equals one admin
/// session. Cloning shares the connection pool and the cookie jar.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    /// Create a client for the server at `base_url` (e.g. "http://localhost:5000")
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(StoreClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        read_reply(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.call(self.http.get(self.url(path))).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.call(self.http.post(self.url(path)).json(body)).await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.call(self.http.put(self.url(path)).json(body)).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let _: IgnoredAny = self.call(self.http.delete(self.url(path))).await?;
        Ok(())
    }

    async fn upload<T: DeserializeOwned>(&self, path: &str, form: Form) -> ClientResult<T> {
        self.call(self.http.post(self.url(path)).multipart(form)).await
    }

    // ==================
    // Session
    // ==================

    pub async fn login(&self, password: &str) -> ClientResult<()> {
        let _: IgnoredAny = self.post("/api/login", &json!({ "password": password })).await?;
        Ok(())
    }

    pub async fn logout(&self) -> ClientResult<()> {
        let _: IgnoredAny = self.post("/api/logout", &json!({})).await?;
        Ok(())
    }

    pub async fn change_password(&self, old_password: &str, new_password: &str) -> ClientResult<()> {
        let body = json!({ "old_password": old_password, "new_password": new_password });
        let _: IgnoredAny = self.post("/api/password", &body).await?;
        Ok(())
    }

    // ==================
    // Document
    // ==================

    pub async fn fetch_document(&self) -> ClientResult<PageDocument> {
        self.get("/api/data").await
    }

    /// Replace every section of the stored document
    pub async fn save_document(&self, document: &PageDocument) -> ClientResult<()> {
        let mut body = serde_json::to_value(document.detached())?;
        if let Value::Object(sections) = &mut body {
            for key in PageDocument::OPTIONAL_SECTIONS {
                sections.entry(key).or_insert(Value::Null);
            }
        }
        let _: IgnoredAny = self.post("/api/data", &body).await?;
        Ok(())
    }

    /// Replace one top-level section in full
    pub async fn save_section<V: Serialize + ?Sized>(
        &self,
        section: &str,
        value: &V,
    ) -> ClientResult<()> {
        let mut body = serde_json::Map::new();
        body.insert(section.to_string(), serde_json::to_value(value)?);
        let _: IgnoredAny = self.post("/api/data", &body).await?;
        Ok(())
    }

    pub async fn fetch_profile(&self) -> ClientResult<Profile> {
        self.get("/api/profile").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<Profile> {
        let reply: ProfileReply = self.post("/api/profile", update).await?;
        Ok(reply.profile)
    }

    /// Replace the skill list; the reply carries the ids the server assigned
    pub async fn save_skills(&self, skills: &[Skill]) -> ClientResult<Vec<Skill>> {
        let reply: SkillsReply = self.post("/api/skills", &json!({ "skills": skills })).await?;
        Ok(reply.skills)
    }

    // ==================
    // Projects
    // ==================

    pub async fn list_projects(&self) -> ClientResult<Vec<Project>> {
        self.get("/api/projects").await
    }

    /// Create a project; the server assigns its id
    pub async fn create_project(&self, project: &Project) -> ClientResult<Project> {
        let reply: ProjectReply = self.post("/api/projects", project).await?;
        Ok(reply.project)
    }

    pub async fn update_project(&self, id: &str, project: &Project) -> ClientResult<Project> {
        let reply: ProjectReply = self.put(&format!("/api/projects/{}", id), project).await?;
        Ok(reply.project)
    }

    pub async fn delete_project(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/api/projects/{}", id)).await
    }

    // ==================
    // Theme & layout
    // ==================

    pub async fn fetch_theme(&self) -> ClientResult<ThemeDescriptor> {
        self.get("/api/theme").await
    }

    pub async fn save_theme(&self, theme: &ThemeDescriptor) -> ClientResult<ThemeDescriptor> {
        let reply: ThemeReply = self.post("/api/theme", theme).await?;
        Ok(reply.theme)
    }

    pub async fn fetch_admin_theme(&self) -> ClientResult<AdminTheme> {
        self.get("/api/admin-theme").await
    }

    pub async fn save_admin_theme(&self, theme: &AdminTheme) -> ClientResult<AdminTheme> {
        let reply: AdminThemeReply = self.post("/api/admin-theme", theme).await?;
        Ok(reply.admin_theme)
    }

    pub async fn fetch_layout(&self) -> ClientResult<LayoutDescriptor> {
        self.get("/api/layout").await
    }

    pub async fn save_layout(&self, layout: &LayoutDescriptor) -> ClientResult<LayoutDescriptor> {
        let reply: LayoutReply = self.post("/api/layout", layout).await?;
        Ok(reply.layout)
    }

    // ==================
    // Custom modules
    // ==================

    pub async fn list_modules(&self) -> ClientResult<BTreeMap<String, CustomModule>> {
        self.get("/api/modules").await
    }

    pub async fn create_module(&self, module: &NewCustomModule) -> ClientResult<CustomModule> {
        let reply: ModuleReply = self.post("/api/modules", module).await?;
        Ok(reply.module)
    }

    pub async fn update_module(
        &self,
        id: &str,
        module: &NewCustomModule,
    ) -> ClientResult<CustomModule> {
        let reply: ModuleReply = self.put(&format!("/api/modules/{}", id), module).await?;
        Ok(reply.module)
    }

    pub async fn delete_module(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/api/modules/{}", id)).await
    }

    pub async fn save_module_order(&self, order: &[ModuleName]) -> ClientResult<()> {
        let _: IgnoredAny = self.post("/api/modules/order", &json!({ "order": order })).await?;
        Ok(())
    }

    // ==================
    // Files
    // ==================

    pub async fn list_files(&self) -> ClientResult<Vec<FileEntry>> {
        self.get("/api/files").await
    }

    pub async fn files_status(&self) -> ClientResult<FilesStatus> {
        self.get("/api/files/status").await
    }

    /// Upload downloadable files into an optional folder
    pub async fn upload_files(
        &self,
        uploads: Vec<Upload>,
        folder: Option<&str>,
        description: Option<&str>,
    ) -> ClientResult<UploadReport> {
        let mut form = Form::new();
        for upload in uploads {
            form = form.part("files", upload.into_part()?);
        }
        if let Some(folder) = folder {
            form = form.text("folder", folder.to_string());
        }
        if let Some(description) = description {
            form = form.text("description", description.to_string());
        }
        self.upload("/api/files", form).await
    }

    pub async fn delete_file(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/api/files/{}", id)).await
    }

    /// Bump the download counter and return the new count
    pub async fn record_download(&self, id: &str) -> ClientResult<u64> {
        let path = format!("/api/files/{}/download", id);
        let reply: DownloadReply = self.call(self.http.post(self.url(&path))).await?;
        Ok(reply.downloads)
    }

    /// Fire-and-forget download counter ping
    ///
    /// Never fails the caller; a failed ping is only logged.
    pub fn track_download(&self, id: &str) -> JoinHandle<()> {
        let client = self.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            if let Err(e) = client.record_download(&id).await {
                tracing::warn!("Download ping for {} failed: {}", id, e);
            }
        })
    }

    // ==================
    // Image uploads
    // ==================

    /// Upload a generic image, returning its public URL
    pub async fn upload_image(&self, upload: Upload) -> ClientResult<String> {
        let form = Form::new().part("file", upload.into_part()?);
        let reply: UrlReply = self.upload("/api/upload", form).await?;
        Ok(reply.url)
    }

    /// Replace the avatar; the server also updates the profile
    pub async fn upload_avatar(&self, upload: Upload) -> ClientResult<String> {
        let form = Form::new().part("avatar", upload.into_part()?);
        let reply: AvatarReply = self.upload("/api/upload-avatar", form).await?;
        Ok(reply.avatar_url)
    }

    pub async fn upload_background(&self, upload: Upload) -> ClientResult<String> {
        let form = Form::new().part("file", upload.into_part()?);
        let reply: UrlReply = self.upload("/api/upload-background", form).await?;
        Ok(reply.url)
    }

    /// Upload a cursor image; the server switches the theme to it
    pub async fn upload_cursor(&self, upload: Upload) -> ClientResult<String> {
        let form = Form::new().part("cursor", upload.into_part()?);
        let reply: CursorReply = self.upload("/api/upload-cursor", form).await?;
        Ok(reply.cursor_url)
    }

    // ==================
    // Stats
    // ==================

    pub async fn fetch_stats(&self) -> ClientResult<Stats> {
        self.get("/api/stats").await
    }
}

/// Decode a reply, turning non-2xx statuses and `success: false` into rejections
async fn read_reply<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    let body = response.bytes().await?;
    let value = serde_json::from_slice::<Value>(&body);

    if !status.is_success() {
        let message = value
            .ok()
            .as_ref()
            .and_then(message_of)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        return Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let value = value?;
    if value.get("success") == Some(&Value::Bool(false)) {
        return Err(ClientError::Rejected {
            status: status.as_u16(),
            message: message_of(&value).unwrap_or_else(|| "Request failed".to_string()),
        });
    }
    Ok(serde_json::from_value(value)?)
}

fn message_of(value: &Value) -> Option<String> {
    value.get("message")?.as_str().map(str::to_string)
}

#[async_trait]
impl FileSource for StoreClient {
    async fn list_files(&self) -> anyhow::Result<Vec<FileEntry>> {
        Ok(StoreClient::list_files(self).await?)
    }
}

#[async_trait]
impl LayoutPersister for StoreClient {
    async fn persist_order(&self, order: &[ModuleName]) -> anyhow::Result<()> {
        Ok(self.save_module_order(order).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = StoreClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/api/data"), "http://localhost:5000/api/data");
    }

    #[test]
    fn upload_report_tolerates_missing_lists() {
        let report: UploadReport =
            serde_json::from_value(json!({"success": true, "message": "1 file uploaded"})).unwrap();
        assert!(report.files.is_empty());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn message_is_read_from_envelope() {
        assert_eq!(
            message_of(&json!({"success": false, "message": "Not logged in"})).as_deref(),
            Some("Not logged in")
        );
        assert_eq!(message_of(&json!({"success": false})), None);
    }
}
