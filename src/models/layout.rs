/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Layout models: module names and their persisted order

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a content module
///
/// Any string is accepted so that unknown names survive a round trip; the
/// module registry decides which names it can render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    pub const HERO: &'static str = "hero";
    pub const SKILLS: &'static str = "skills";
    pub const PROJECTS: &'static str = "projects";
    pub const FILES: &'static str = "files";

    /// Modules rendered from the document without any configuration
    pub const BUILT_IN: [&'static str; 4] = [Self::HERO, Self::SKILLS, Self::PROJECTS, Self::FILES];

    pub fn new(name: impl Into<String>) -> Self {
        ModuleName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_built_in(&self) -> bool {
        Self::BUILT_IN.contains(&self.0.as_str())
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleName {
    fn from(name: &str) -> Self {
        ModuleName::new(name)
    }
}

impl From<String> for ModuleName {
    fn from(name: String) -> Self {
        ModuleName(name)
    }
}

/// Build a list of module names from string literals
pub fn module_names<I, S>(names: I) -> Vec<ModuleName>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(ModuleName::new).collect()
}

/// Persisted ordering of modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    /// Modules available to the layout editor
    #[serde(default)]
    pub modules: Vec<ModuleName>,

    /// Render order of the public page
    #[serde(default = "LayoutDescriptor::fallback_order")]
    pub module_order: Vec<ModuleName>,
}

impl LayoutDescriptor {
    /// Order used when a stored layout has no `module_order` key at all
    pub fn fallback_order() -> Vec<ModuleName> {
        module_names([ModuleName::HERO, ModuleName::FILES])
    }

    /// Seed layout for a new site
    pub fn seed() -> Self {
        LayoutDescriptor {
            modules: module_names(ModuleName::BUILT_IN),
            module_order: module_names(ModuleName::BUILT_IN),
        }
    }
}

impl Default for LayoutDescriptor {
    fn default() -> Self {
        LayoutDescriptor {
            modules: Vec::new(),
            module_order: Self::fallback_order(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_order_key_uses_fallback() {
        let layout: LayoutDescriptor = serde_json::from_value(json!({})).unwrap();
        assert_eq!(layout.module_order, module_names(["hero", "files"]));
    }

    #[test]
    fn explicit_empty_order_is_kept() {
        let layout: LayoutDescriptor =
            serde_json::from_value(json!({"module_order": []})).unwrap();
        assert!(layout.module_order.is_empty());
    }

    #[test]
    fn unknown_names_round_trip() {
        let layout: LayoutDescriptor =
            serde_json::from_value(json!({"module_order": ["hero", "guestbook"]})).unwrap();
        let back = serde_json::to_value(&layout).unwrap();
        assert_eq!(back["module_order"], json!(["hero", "guestbook"]));
        assert!(!layout.module_order[1].is_built_in());
    }
}
