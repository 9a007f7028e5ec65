/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Theme applier
//!
//! Maps a theme to the visual state of the page shell: a body class, an
//! optional background image, CSS custom properties and the cursor.

use crate::models::{Background, Cursor, ThemeDescriptor};

use super::format::html_escape;

pub const DEFAULT_GRADIENT_START: &str = "#6366f1";
pub const DEFAULT_GRADIENT_END: &str = "#ec4899";
pub const DEFAULT_SOLID_COLOR: &str = "#667eea";

pub const VAR_GRADIENT_START: &str = "--bg-start";
pub const VAR_GRADIENT_END: &str = "--bg-end";
pub const VAR_SOLID_COLOR: &str = "--bg-color";

/// Root-level visual state derived from a theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeStyle {
    pub body_class: &'static str,
    pub background_image: Option<String>,
    pub variables: Vec<(&'static str, String)>,
    pub cursor: String,
}

impl ThemeStyle {
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Inline `style` attribute value for the body element (escaped)
    pub fn inline_style(&self) -> String {
        let mut parts: Vec<String> = self
            .variables
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect();
        if let Some(url) = &self.background_image {
            parts.push(format!("background-image: url('{}')", css_url(url)));
        }
        parts.push(format!("cursor: {}", self.cursor));
        html_escape(&parts.join("; "))
    }
}

/// Percent-encode the characters that could close a quoted CSS `url()`
fn css_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '\'' => out.push_str("%27"),
            '"' => out.push_str("%22"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '\\' => out.push_str("%5C"),
            '\n' => out.push_str("%0A"),
            '\r' => out.push_str("%0D"),
            _ => out.push(c),
        }
    }
    out
}

/// Compute the page shell state for a theme
///
/// Pure and idempotent; the page shell applies the result before first paint.
pub fn apply_theme(theme: &ThemeDescriptor) -> ThemeStyle {
    let (body_class, background_image, variables) = match &theme.background {
        Background::Image { url } => ("bg-image", Some(url.clone()), Vec::new()),
        Background::Solid { color } => (
            "bg-solid",
            None,
            vec![(
                VAR_SOLID_COLOR,
                color.clone().unwrap_or_else(|| DEFAULT_SOLID_COLOR.to_string()),
            )],
        ),
        Background::Gradient { start, end } => (
            "bg-gradient",
            None,
            vec![
                (
                    VAR_GRADIENT_START,
                    start.clone().unwrap_or_else(|| DEFAULT_GRADIENT_START.to_string()),
                ),
                (
                    VAR_GRADIENT_END,
                    end.clone().unwrap_or_else(|| DEFAULT_GRADIENT_END.to_string()),
                ),
            ],
        ),
    };

    let cursor = match &theme.cursor {
        Cursor::Custom { url } => format!("url('{}'), auto", css_url(url)),
        Cursor::Keyword(keyword) => keyword.clone(),
    };

    ThemeStyle {
        body_class,
        background_image,
        variables,
        cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn theme(value: serde_json::Value) -> ThemeDescriptor {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn solid_sets_one_variable() {
        let style = apply_theme(&theme(json!({
            "background_type": "solid",
            "background_color": "#112233"
        })));
        assert_eq!(style.body_class, "bg-solid");
        assert_eq!(style.variables, vec![(VAR_SOLID_COLOR, "#112233".to_string())]);
        assert!(style.variable(VAR_GRADIENT_END).is_none());
    }

    #[test]
    fn missing_type_uses_default_gradient_pair() {
        let style = apply_theme(&theme(json!({})));
        assert_eq!(style.body_class, "bg-gradient");
        assert_eq!(style.variable(VAR_GRADIENT_START), Some(DEFAULT_GRADIENT_START));
        assert_eq!(style.variable(VAR_GRADIENT_END), Some(DEFAULT_GRADIENT_END));
        assert_eq!(style.cursor, "default");
    }

    #[test]
    fn image_sets_no_color_variables() {
        let style = apply_theme(&theme(json!({
            "background_type": "image",
            "background_image": "/static/uploads/bg.png",
            "background_color": "#000000"
        })));
        assert_eq!(style.body_class, "bg-image");
        assert!(style.variables.is_empty());
        assert_eq!(style.background_image.as_deref(), Some("/static/uploads/bg.png"));
    }

    #[test]
    fn custom_cursor_has_generic_fallback() {
        let style = apply_theme(&theme(json!({
            "cursor_style": "custom",
            "custom_cursor_url": "/static/uploads/c.cur"
        })));
        assert_eq!(style.cursor, "url('/static/uploads/c.cur'), auto");
    }

    #[test]
    fn applying_twice_is_identical() {
        let t = theme(json!({"background_type": "gradient", "background_color": "#101010"}));
        assert_eq!(apply_theme(&t), apply_theme(&t));
    }

    #[test]
    fn inline_style_is_attribute_safe() {
        let style = apply_theme(&theme(json!({
            "background_type": "image",
            "background_image": "/a\".png"
        })));
        assert!(!style.inline_style().contains('"'));
    }

    #[test]
    fn urls_cannot_close_the_css_url() {
        let style = apply_theme(&theme(json!({
            "background_type": "image",
            "background_image": "/bg.png') ; color: red; x: url('",
            "cursor_style": "custom",
            "custom_cursor_url": "/c.cur'),pointer"
        })));
        let inline = style.inline_style();
        assert!(inline.contains(&html_escape(
            "url('/bg.png%27%29 ; color: red; x: url%28%27')"
        )));
        // Only the quotes wrapping the two urls remain
        assert_eq!(inline.matches("&#39;").count(), 4);
        assert_eq!(style.cursor, "url('/c.cur%27%29,pointer'), auto");
    }
}
