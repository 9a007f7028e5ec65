/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Server-side data store
//!
//! The site lives in JSON files on the local filesystem; `JsonStore` is the
//! only component that touches them.

mod json_store;

pub use json_store::{seed_document, JsonStore, MIN_PASSWORD_LEN};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// File names inside the data directory
pub mod constants {
    /// Page document
    pub const DATA_FILE: &str = "data.json";

    /// Downloadable file records
    pub const FILES_DB_FILE: &str = "files.json";

    /// Visit statistics
    pub const STATS_FILE: &str = "stats.json";

    /// Admin password hash
    pub const CREDENTIALS_FILE: &str = "credentials.json";
}

/// Shallow-merge the fields of `patch` over the flat JSON form of `current`
///
/// Used by the endpoints that update part of a section (theme, layout,
/// admin theme, custom modules). The merged value must still parse as `T`.
pub fn merge_fields<T>(current: &T, patch: serde_json::Map<String, serde_json::Value>) -> AppResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(current)?;
    match &mut value {
        serde_json::Value::Object(fields) => fields.extend(patch),
        _ => value = serde_json::Value::Object(patch),
    }
    serde_json::from_value(value).map_err(|e| AppError::InvalidInput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Background, LayoutDescriptor, ThemeDescriptor};
    use serde_json::json;

    fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn merge_switches_theme_variant() {
        let theme = ThemeDescriptor::default();
        let merged = merge_fields(
            &theme,
            object(json!({"background_type": "solid", "background_color": "#000000"})),
        )
        .unwrap();
        assert_eq!(
            merged.background,
            Background::Solid {
                color: Some("#000000".into())
            }
        );
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let layout = LayoutDescriptor::seed();
        let merged = merge_fields(&layout, object(json!({"module_order": ["files"]}))).unwrap();
        assert_eq!(merged.modules, layout.modules);
        assert_eq!(merged.module_order.len(), 1);
    }

    #[test]
    fn merge_rejects_invalid_shapes() {
        let layout = LayoutDescriptor::seed();
        let err = merge_fields(&layout, object(json!({"module_order": 3}))).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
