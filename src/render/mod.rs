/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Public page rendering
//!
//! The module registry maps module names to renderers and mounts their markup
//! in layout order. The theme applier paints the page shell.

mod format;
mod modules;
mod page;
mod theme;

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{FileEntry, ModuleName, PageDocument};

pub use format::{file_icon, format_file_size, html_escape};
pub use modules::{
    custom_markup, FilesModule, HeroModule, ProjectsModule, SkillsModule, DEFAULT_AVATAR,
    DEFAULT_BIO, DEFAULT_NAME, DEFAULT_TITLE,
};
pub use page::render_page;
pub use theme::{
    apply_theme, ThemeStyle, DEFAULT_GRADIENT_END, DEFAULT_GRADIENT_START, DEFAULT_SOLID_COLOR,
    VAR_GRADIENT_END, VAR_GRADIENT_START, VAR_SOLID_COLOR,
};

/// Markup shown when no module could be mounted
pub const FALLBACK_PLACEHOLDER: &str =
    r#"<p class="modules-fallback">Content failed to load. Please refresh the page.</p>"#;

/// Where the files module gets its listing from
///
/// Implemented by the JSON store (server-side rendering) and by the HTTP
/// client (rendering against a remote server).
#[async_trait]
pub trait FileSource: Send + Sync {
    async fn list_files(&self) -> anyhow::Result<Vec<FileEntry>>;
}

/// Everything a renderer may read
pub struct RenderContext<'a> {
    pub document: &'a PageDocument,
    pub files: &'a dyn FileSource,
}

/// Produces the markup of one module kind
#[async_trait]
pub trait ModuleRenderer: Send + Sync {
    /// Module name this renderer answers to
    fn name(&self) -> &str;

    async fn render(&self, ctx: &RenderContext<'_>) -> anyhow::Result<String>;
}

/// A module mounted in the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedModule {
    pub name: ModuleName,
    pub body: String,
}

impl MountedModule {
    /// Wrapper element carrying the name the layout editor reads back
    pub fn to_html(&self) -> String {
        let name = html_escape(self.name.as_str());
        format!(
            r#"<div class="module draggable" id="module-{name}" data-module="{name}" draggable="true">{body}</div>"#,
            name = name,
            body = self.body
        )
    }
}

/// Ordered modules of the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleContainer {
    modules: Vec<MountedModule>,
}

impl ModuleContainer {
    pub fn modules(&self) -> &[MountedModule] {
        &self.modules
    }

    pub fn names(&self) -> Vec<ModuleName> {
        self.modules.iter().map(|m| m.name.clone()).collect()
    }

    /// True when nothing was mounted and the placeholder is shown
    pub fn is_fallback(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn to_html(&self) -> String {
        if self.is_fallback() {
            return FALLBACK_PLACEHOLDER.to_string();
        }
        self.modules.iter().map(MountedModule::to_html).collect()
    }
}

/// Registry of module renderers
///
/// Names without a registered renderer fall through to the document's custom
/// modules, and are skipped when neither knows them.
pub struct ModuleRegistry {
    renderers: Vec<Arc<dyn ModuleRenderer>>,
}

impl ModuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ModuleRegistry {
            renderers: Vec::new(),
        }
    }

    /// Registry with the hero, skills, projects and files renderers
    pub fn with_built_ins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(HeroModule));
        registry.register(Arc::new(SkillsModule));
        registry.register(Arc::new(ProjectsModule));
        registry.register(Arc::new(FilesModule));
        registry
    }

    /// Register a renderer; a later registration for the same name wins
    pub fn register(&mut self, renderer: Arc<dyn ModuleRenderer>) {
        self.renderers.retain(|r| r.name() != renderer.name());
        self.renderers.push(renderer);
    }

    /// Find the renderer for a module name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ModuleRenderer>> {
        self.renderers.iter().find(|r| r.name() == name).cloned()
    }

    /// Whether `name` would mount anything for this document
    pub fn recognizes(&self, name: &ModuleName, document: &PageDocument) -> bool {
        self.get(name.as_str()).is_some()
            || document
                .modules
                .get(name.as_str())
                .is_some_and(|m| m.visible)
    }

    /// Render `order` into a container, one module per recognized name
    ///
    /// Unknown names and renderer failures are skipped; an empty result
    /// renders the fallback placeholder.
    pub async fn render_modules(
        &self,
        order: &[ModuleName],
        ctx: &RenderContext<'_>,
    ) -> ModuleContainer {
        let mut container = ModuleContainer::default();

        for name in order {
            let body = match self.get(name.as_str()) {
                Some(renderer) => match renderer.render(ctx).await {
                    Ok(body) => Some(body),
                    Err(e) => {
                        tracing::warn!("Failed to render module {}: {}", name, e);
                        None
                    }
                },
                None => ctx
                    .document
                    .modules
                    .get(name.as_str())
                    .and_then(custom_markup),
            };

            match body {
                Some(body) => container.modules.push(MountedModule {
                    name: name.clone(),
                    body,
                }),
                None => tracing::debug!("Skipping module {}", name),
            }
        }

        container
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::with_built_ins()
    }
}
