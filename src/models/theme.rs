/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Theme models
//!
//! On disk and on the wire the theme is a flat object whose `background_type`
//! decides which sibling fields matter. In memory it is a sum type carrying
//! only the fields of the active variant; `ThemeRecord` is the flat form used
//! for (de)serialization.

use serde::{Deserialize, Serialize};

/// Background of the public page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    /// Two-stop gradient; missing stops fall back to the renderer defaults
    Gradient {
        start: Option<String>,
        end: Option<String>,
    },
    /// Full-page background image
    Image { url: String },
    /// Single colour; a missing colour falls back to the renderer default
    Solid { color: Option<String> },
}

impl Default for Background {
    fn default() -> Self {
        Background::Gradient {
            start: None,
            end: None,
        }
    }
}

/// Mouse cursor over the public page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// A CSS cursor keyword, passed through unvalidated
    Keyword(String),
    /// An uploaded cursor image
    Custom { url: String },
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::Keyword("default".to_string())
    }
}

/// Persisted visual configuration of the public page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ThemeRecord", into = "ThemeRecord")]
pub struct ThemeDescriptor {
    pub background: Background,
    pub cursor: Cursor,
}

/// Flat wire form of the theme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_cursor_url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<ThemeRecord> for ThemeDescriptor {
    fn from(record: ThemeRecord) -> Self {
        let background = match record.background_type.as_deref() {
            Some("image") => match non_empty(record.background_image) {
                Some(url) => Background::Image { url },
                // An image theme without an image paints the default gradient
                None => Background::Gradient {
                    start: non_empty(record.background_color),
                    end: non_empty(record.background_color_end),
                },
            },
            Some("solid") => Background::Solid {
                color: non_empty(record.background_color),
            },
            _ => Background::Gradient {
                start: non_empty(record.background_color),
                end: non_empty(record.background_color_end),
            },
        };

        let cursor = match record.cursor_style.as_deref() {
            Some("custom") => match non_empty(record.custom_cursor_url) {
                Some(url) => Cursor::Custom { url },
                None => Cursor::default(),
            },
            Some(keyword) if !keyword.trim().is_empty() => Cursor::Keyword(keyword.to_string()),
            _ => Cursor::default(),
        };

        ThemeDescriptor { background, cursor }
    }
}

impl From<ThemeDescriptor> for ThemeRecord {
    fn from(theme: ThemeDescriptor) -> Self {
        let mut record = ThemeRecord::default();
        match theme.background {
            Background::Gradient { start, end } => {
                record.background_type = Some("gradient".into());
                record.background_color = start;
                record.background_color_end = end;
            }
            Background::Image { url } => {
                record.background_type = Some("image".into());
                record.background_image = Some(url);
            }
            Background::Solid { color } => {
                record.background_type = Some("solid".into());
                record.background_color = color;
            }
        }
        match theme.cursor {
            Cursor::Keyword(keyword) => record.cursor_style = Some(keyword),
            Cursor::Custom { url } => {
                record.cursor_style = Some("custom".into());
                record.custom_cursor_url = Some(url);
            }
        }
        record
    }
}

/// Colours of the admin panel itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminTheme {
    #[serde(default = "AdminTheme::default_primary")]
    pub primary_color: String,
    #[serde(default = "AdminTheme::default_sidebar_bg")]
    pub sidebar_bg: String,
    #[serde(default = "AdminTheme::default_sidebar_text")]
    pub sidebar_text: String,
    #[serde(default = "AdminTheme::default_content_bg")]
    pub content_bg: String,
    #[serde(default = "AdminTheme::default_card_bg")]
    pub card_bg: String,
    #[serde(flatten)]
    pub background: AdminBackground,
}

/// Admin panel background, reusing the public theme's flat encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminBackground {
    #[serde(default = "AdminBackground::default_type")]
    pub background_type: String,
    #[serde(default = "AdminBackground::default_color")]
    pub background_color: String,
    #[serde(default = "AdminBackground::default_color_end")]
    pub background_color_end: String,
}

impl AdminTheme {
    fn default_primary() -> String {
        "#6366f1".into()
    }
    fn default_sidebar_bg() -> String {
        "#1f2937".into()
    }
    fn default_sidebar_text() -> String {
        "#ffffff".into()
    }
    fn default_content_bg() -> String {
        "#f9fafb".into()
    }
    fn default_card_bg() -> String {
        "#ffffff".into()
    }
}

impl AdminBackground {
    fn default_type() -> String {
        "gradient".into()
    }
    fn default_color() -> String {
        "#1f2937".into()
    }
    fn default_color_end() -> String {
        "#374151".into()
    }
}

impl Default for AdminTheme {
    fn default() -> Self {
        AdminTheme {
            primary_color: Self::default_primary(),
            sidebar_bg: Self::default_sidebar_bg(),
            sidebar_text: Self::default_sidebar_text(),
            content_bg: Self::default_content_bg(),
            card_bg: Self::default_card_bg(),
            background: AdminBackground {
                background_type: AdminBackground::default_type(),
                background_color: AdminBackground::default_color(),
                background_color_end: AdminBackground::default_color_end(),
            },
        }
    }
}
