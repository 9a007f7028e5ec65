/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! The page document and its content entities

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AdminTheme, FileEntry, LayoutDescriptor, Stats, ThemeDescriptor};

/// The single JSON aggregate holding all site content and configuration
///
/// Stored as data.json. `files` and `stats` live in their own files and are
/// only filled in when the document is served.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDocument {
    #[serde(default)]
    pub profile: Profile,

    #[serde(default)]
    pub skills: Vec<Skill>,

    #[serde(default)]
    pub projects: Vec<Project>,

    #[serde(default)]
    pub files: Vec<FileEntry>,

    #[serde(default)]
    pub theme: ThemeDescriptor,

    #[serde(default)]
    pub layout: LayoutDescriptor,

    #[serde(default)]
    pub buttons: Vec<ButtonEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement: Option<Announcement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,

    /// Custom content modules keyed by module id
    #[serde(default)]
    pub modules: BTreeMap<String, CustomModule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_theme: Option<AdminTheme>,
}

impl PageDocument {
    /// Top-level keys that are owned by other stores and never written through data.json
    pub const DETACHED_SECTIONS: [&'static str; 2] = ["files", "stats"];

    /// Sections that may be absent; a full save sends them as `null` to clear them
    pub const OPTIONAL_SECTIONS: [&'static str; 2] = ["announcement", "admin_theme"];

    /// The document with every detached section cleared, as written to data.json
    pub fn detached(&self) -> PageDocument {
        PageDocument {
            files: Vec::new(),
            stats: None,
            ..self.clone()
        }
    }

    /// Give every skill and button with an empty id a fresh one
    pub fn assign_missing_ids(&mut self) {
        let skill_ids = self.skills.iter_mut().map(|s| &mut s.id);
        let button_ids = self.buttons.iter_mut().map(|b| &mut b.id);
        for id in skill_ids.chain(button_ids).filter(|id| id.is_empty()) {
            *id = new_id();
        }
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}

/// Owner profile shown in the hero module
///
/// Every field is optional; the hero renderer supplies fallback text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Profile form submission
///
/// Empty strings leave the stored field untouched. The announcement keys use
/// the admin form's camelCase names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(
        rename = "announcementEnabled",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub announcement_enabled: Option<bool>,
    #[serde(
        rename = "announcementText",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub announcement_text: Option<String>,
    #[serde(
        rename = "announcementType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub announcement_type: Option<AnnouncementKind>,
}

impl ProfileUpdate {
    /// True when no profile field and no announcement toggle was submitted
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.title,
            &self.avatar,
            &self.bio,
            &self.email,
            &self.github,
            &self.location,
        ]
        .iter()
        .all(|f| f.is_none())
            && self.announcement_enabled.is_none()
    }

    /// Merge non-empty fields into the document
    pub fn apply(self, doc: &mut PageDocument) {
        fn merge(slot: &mut Option<String>, value: Option<String>) {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                *slot = Some(v);
            }
        }

        let profile = &mut doc.profile;
        merge(&mut profile.name, self.name);
        merge(&mut profile.title, self.title);
        merge(&mut profile.avatar, self.avatar);
        merge(&mut profile.bio, self.bio);
        merge(&mut profile.email, self.email);
        merge(&mut profile.github, self.github);
        merge(&mut profile.location, self.location);

        if let Some(enabled) = self.announcement_enabled {
            doc.announcement = Some(Announcement {
                enabled,
                text: self.announcement_text.unwrap_or_default(),
                kind: self.announcement_type.unwrap_or_default(),
            });
        }
    }
}

/// Generate a fresh identifier for entries that have none
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A skill with its proficiency level
///
/// `level` is expected to be 0..=100 but is not clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default = "new_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub level: i64,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: i64) -> Self {
        Skill {
            id: new_id(),
            name: name.into(),
            level,
        }
    }
}

/// A portfolio project card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned identifier
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Display group of a button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Primary,
    Secondary,
    Nav,
}

/// A hero call-to-action or navigation button
///
/// `order` is advisory: it is rebuilt from list position when the admin saves
/// the list, and rendering keeps the stored array order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonEntry {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub style: ButtonStyle,
    #[serde(default)]
    pub order: i64,
}

/// Severity of the announcement bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementKind {
    #[default]
    Info,
    Warning,
    Success,
    Error,
}

impl AnnouncementKind {
    /// Background tint of the bar
    pub fn tint(self) -> &'static str {
        match self {
            AnnouncementKind::Info => "rgba(99, 102, 241, 0.2)",
            AnnouncementKind::Warning => "rgba(245, 158, 11, 0.2)",
            AnnouncementKind::Success => "rgba(16, 185, 129, 0.2)",
            AnnouncementKind::Error => "rgba(239, 68, 68, 0.2)",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: AnnouncementKind,
}

/// An operator-defined content section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomModule {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default = "default_custom_kind")]
    pub kind: String,
    #[serde(default)]
    pub link: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_custom_kind() -> String {
    "custom".to_string()
}

fn default_visible() -> bool {
    true
}

/// Body of POST /api/modules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCustomModule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn skills_without_ids_get_distinct_ids() {
        let skills: Vec<Skill> = serde_json::from_value(json!([
            {"name": "Rust", "level": 80},
            {"name": "Rust", "level": 80}
        ]))
        .unwrap();
        assert!(!skills[0].id.is_empty());
        assert_ne!(skills[0].id, skills[1].id);
    }

    #[test]
    fn profile_update_keeps_fields_left_blank() {
        let mut doc = PageDocument::default();
        doc.profile.name = Some("Ada".into());
        doc.profile.bio = Some("Engines".into());

        ProfileUpdate {
            name: Some(String::new()),
            bio: Some("Analytical engines".into()),
            ..Default::default()
        }
        .apply(&mut doc);

        assert_eq!(doc.profile.name.as_deref(), Some("Ada"));
        assert_eq!(doc.profile.bio.as_deref(), Some("Analytical engines"));
        assert!(doc.announcement.is_none());
    }

    #[test]
    fn profile_update_sets_announcement() {
        let mut doc = PageDocument::default();
        let update: ProfileUpdate = serde_json::from_value(json!({
            "announcementEnabled": true,
            "announcementText": "Open to work",
            "announcementType": "success"
        }))
        .unwrap();
        assert!(!update.is_empty());
        update.apply(&mut doc);

        let announcement = doc.announcement.unwrap();
        assert!(announcement.enabled);
        assert_eq!(announcement.text, "Open to work");
        assert_eq!(announcement.kind, AnnouncementKind::Success);
    }

    #[test]
    fn detached_document_drops_files_and_stats() {
        let doc = PageDocument {
            stats: Some(Stats::default()),
            files: vec![FileEntry::sample("a.pdf")],
            ..Default::default()
        };
        let detached = doc.detached();
        assert!(detached.files.is_empty());
        assert!(detached.stats.is_none());
    }

    #[test]
    fn empty_ids_are_filled() {
        let mut doc: PageDocument = serde_json::from_value(json!({
            "skills": [{"id": "", "name": "Rust"}, {"id": "keep", "name": "Go"}],
            "buttons": [{"id": "", "text": "Blog"}]
        }))
        .unwrap();
        doc.assign_missing_ids();
        assert!(!doc.skills[0].id.is_empty());
        assert_eq!(doc.skills[1].id, "keep");
        assert!(!doc.buttons[0].id.is_empty());
    }

    #[test]
    fn custom_module_defaults() {
        let module: CustomModule = serde_json::from_value(json!({"id": "custom_1"})).unwrap();
        assert!(module.visible);
        assert_eq!(module.kind, "custom");
    }
}
