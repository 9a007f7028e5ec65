/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Admin panel controller
//!
//! Holds the last fetched document and applies each edit locally only once
//! the server accepted it. Every outcome is reported as a notice.

use crate::client::{Notice, Severity, StoreClient, Upload, UploadReport};
use crate::error::ClientResult;
use crate::models::{ButtonEntry, PageDocument, Project, ProfileUpdate, Skill, ThemeDescriptor};

/// State of one admin panel session
pub struct AdminPanel {
    client: StoreClient,
    document: PageDocument,
    notices: Vec<Notice>,
}

impl AdminPanel {
    pub fn new(client: StoreClient) -> Self {
        AdminPanel {
            client,
            document: PageDocument::default(),
            notices: Vec::new(),
        }
    }

    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    /// The document as last fetched or saved
    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hand pending notices to the caller
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Push a notice for `result`, passing the result through
    fn report<T>(&mut self, result: ClientResult<T>, success: &str) -> ClientResult<T> {
        match &result {
            Ok(_) => self.notices.push(Notice::success(success)),
            Err(e) => {
                tracing::warn!("Admin request failed: {}", e);
                self.notices.push(Notice::error(e.to_string()));
            }
        }
        result
    }

    /// Fetch the document from the server
    pub async fn load(&mut self) -> ClientResult<()> {
        let result = self.client.fetch_document().await;
        match result {
            Ok(document) => {
                self.document = document;
                Ok(())
            }
            Err(e) => self.report(Err(e), ""),
        }
    }

    /// Replace the whole document
    pub async fn save_document(&mut self, document: PageDocument) -> ClientResult<()> {
        let result = self.client.save_document(&document).await;
        self.report(result, "Saved")?;
        self.document = PageDocument {
            files: std::mem::take(&mut self.document.files),
            ..document
        };
        Ok(())
    }

    pub async fn save_profile(&mut self, update: ProfileUpdate) -> ClientResult<()> {
        let result = self.client.update_profile(&update).await;
        let profile = self.report(result, "Profile saved")?;
        update.apply(&mut self.document);
        self.document.profile = profile;
        Ok(())
    }

    pub async fn save_skills(&mut self, skills: Vec<Skill>) -> ClientResult<()> {
        let result = self.client.save_skills(&skills).await;
        self.document.skills = self.report(result, "Skills saved")?;
        Ok(())
    }

    pub async fn add_project(&mut self, project: Project) -> ClientResult<Project> {
        let result = self.client.create_project(&project).await;
        let created = self.report(result, "Project added")?;
        self.document.projects.push(created.clone());
        Ok(created)
    }

    pub async fn update_project(&mut self, id: &str, project: Project) -> ClientResult<()> {
        let result = self.client.update_project(id, &project).await;
        let updated = self.report(result, "Project updated")?;
        if let Some(slot) = self.document.projects.iter_mut().find(|p| p.id == id) {
            *slot = updated;
        }
        Ok(())
    }

    pub async fn delete_project(&mut self, id: &str) -> ClientResult<()> {
        let result = self.client.delete_project(id).await;
        self.report(result, "Project deleted")?;
        self.document.projects.retain(|p| p.id != id);
        Ok(())
    }

    pub async fn delete_file(&mut self, id: &str) -> ClientResult<()> {
        let result = self.client.delete_file(id).await;
        self.report(result, "File deleted")?;
        self.document.files.retain(|f| f.id != id);
        Ok(())
    }

    pub async fn save_theme(&mut self, theme: ThemeDescriptor) -> ClientResult<()> {
        let result = self.client.save_theme(&theme).await;
        self.document.theme = self.report(result, "Theme saved")?;
        Ok(())
    }

    /// Save the button list in its current order
    pub async fn save_buttons(&mut self, buttons: Vec<ButtonEntry>) -> ClientResult<()> {
        let buttons = renumber(buttons);
        let result = self.client.save_section("buttons", &buttons).await;
        self.report(result, "Buttons saved")?;
        self.document.buttons = buttons;
        Ok(())
    }

    pub async fn upload_avatar(&mut self, upload: Upload) -> ClientResult<String> {
        let result = self.client.upload_avatar(upload).await;
        let url = self.report(result, "Avatar updated")?;
        self.document.profile.avatar = Some(url.clone());
        Ok(url)
    }

    /// Upload downloadable files; partial failures come back as a warning
    pub async fn upload_files(
        &mut self,
        uploads: Vec<Upload>,
        folder: Option<&str>,
        description: Option<&str>,
    ) -> ClientResult<UploadReport> {
        let result = self.client.upload_files(uploads, folder, description).await;
        let report = match result {
            Ok(report) => report,
            Err(e) => return self.report(Err(e), ""),
        };

        let severity = if report.errors.is_empty() {
            Severity::Success
        } else {
            Severity::Warning
        };
        self.notices
            .push(Notice::transient(severity, report.message.clone()));
        self.document.files.extend(report.files.iter().cloned());
        Ok(report)
    }
}

/// Rebuild `order` from list position
fn renumber(mut buttons: Vec<ButtonEntry>) -> Vec<ButtonEntry> {
    for (index, button) in buttons.iter_mut().enumerate() {
        button.order = index as i64;
    }
    buttons
}
