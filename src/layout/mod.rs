/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Layout editor
//!
//! Reorders the mounted modules by drag and drop and writes the resulting
//! order back as the layout's `module_order`.

mod editor;

pub use editor::{DragOver, DropOutcome, LayoutEditor, Slot, SlotKey};

use async_trait::async_trait;

use crate::models::ModuleName;

/// Where a new module order is saved
///
/// Implemented by the HTTP client for remote editing and by the JSON store
/// for in-process use.
#[async_trait]
pub trait LayoutPersister: Send + Sync {
    async fn persist_order(&self, order: &[ModuleName]) -> anyhow::Result<()>;
}
