/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Drag-and-drop reordering of mounted modules

use crate::client::{Notice, Severity};
use crate::models::ModuleName;
use crate::render::ModuleContainer;

use super::LayoutPersister;

/// Identity of one draggable element
///
/// Names may repeat in a stored order, so elements are tracked by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub key: SlotKey,
    pub name: ModuleName,
}

/// Reply to a dragover on a candidate target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragOver {
    /// Always true: the drop is only permitted when the default is prevented
    pub prevent_default: bool,
    /// Whether the target shows the drop highlight
    pub highlight: bool,
}

/// What a drop did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The source moved next to the target
    Moved,
    /// Dropped onto itself
    SameTarget,
    /// No drag in flight
    NoDragSource,
    /// Target is not one of the editor's elements
    UnknownTarget,
}

/// Layout editor state for one page session
///
/// Holds the visual order, the last persisted order and the single drag
/// source slot. One drag can be in flight at a time.
#[derive(Debug, Clone)]
pub struct LayoutEditor {
    slots: Vec<Slot>,
    persisted: Vec<ModuleName>,
    drag_source: Option<SlotKey>,
    highlighted: Option<SlotKey>,
}

impl LayoutEditor {
    /// Start editing `order`, which is taken as already persisted
    pub fn new(order: Vec<ModuleName>) -> Self {
        let slots = order
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, name)| Slot {
                key: SlotKey(i),
                name,
            })
            .collect();
        LayoutEditor {
            slots,
            persisted: order,
            drag_source: None,
            highlighted: None,
        }
    }

    /// Edit the modules that were actually mounted
    pub fn from_container(container: &ModuleContainer) -> Self {
        Self::new(container.names())
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Key of the first element showing `name`
    pub fn slot_of(&self, name: &str) -> Option<SlotKey> {
        self.slots
            .iter()
            .find(|s| s.name.as_str() == name)
            .map(|s| s.key)
    }

    fn index_of(&self, key: SlotKey) -> Option<usize> {
        self.slots.iter().position(|s| s.key == key)
    }

    /// Current visual order
    pub fn order(&self) -> Vec<ModuleName> {
        self.slots.iter().map(|s| s.name.clone()).collect()
    }

    pub fn persisted_order(&self) -> &[ModuleName] {
        &self.persisted
    }

    /// Whether the visual order differs from the persisted one
    pub fn is_dirty(&self) -> bool {
        self.slots
            .iter()
            .map(|s| &s.name)
            .ne(self.persisted.iter())
    }

    pub fn drag_source(&self) -> Option<SlotKey> {
        self.drag_source
    }

    pub fn highlighted(&self) -> Option<SlotKey> {
        self.highlighted
    }

    /// Record `key` as the drag source, replacing any previous one
    pub fn drag_start(&mut self, key: SlotKey) -> bool {
        if self.index_of(key).is_none() {
            return false;
        }
        self.drag_source = Some(key);
        true
    }

    pub fn drag_over(&mut self, target: SlotKey) -> DragOver {
        let highlight = self.drag_source.is_some_and(|source| source != target)
            && self.index_of(target).is_some();
        if highlight {
            self.highlighted = Some(target);
        }
        DragOver {
            prevent_default: true,
            highlight,
        }
    }

    pub fn drag_leave(&mut self, target: SlotKey) {
        if self.highlighted == Some(target) {
            self.highlighted = None;
        }
    }

    /// Drop the drag source onto `target`
    ///
    /// A source before the target lands right after it, otherwise right
    /// before it. The drag source stays set until `drag_end`.
    pub fn drop(&mut self, target: SlotKey) -> DropOutcome {
        self.highlighted = None;

        let Some(source) = self.drag_source else {
            return DropOutcome::NoDragSource;
        };
        let Some(target_index) = self.index_of(target) else {
            return DropOutcome::UnknownTarget;
        };
        if source == target {
            return DropOutcome::SameTarget;
        }
        let Some(source_index) = self.index_of(source) else {
            return DropOutcome::NoDragSource;
        };

        // After removal the target sits at target_index - 1 when the source
        // was before it, so inserting at target_index lands after it in that
        // case and before it otherwise.
        let slot = self.slots.remove(source_index);
        self.slots.insert(target_index, slot);
        DropOutcome::Moved
    }

    /// End of a drag, whether or not it dropped anywhere
    pub fn drag_end(&mut self) {
        self.drag_source = None;
        self.highlighted = None;
    }

    /// Persist the visual order, retrying once
    ///
    /// When the retry fails too the visual order rolls back to the last
    /// persisted order and the returned notice stays until dismissed.
    pub async fn persist(&mut self, persister: &dyn LayoutPersister) -> Notice {
        let order = self.order();

        let mut result = persister.persist_order(&order).await;
        if let Err(e) = &result {
            tracing::warn!("Saving layout failed, retrying: {}", e);
            result = persister.persist_order(&order).await;
        }

        match result {
            Ok(()) => {
                self.persisted = order;
                Notice::success("Layout saved")
            }
            Err(e) => {
                tracing::warn!("Saving layout failed, rolling back: {}", e);
                self.roll_back();
                Notice::persistent(Severity::Error, format!("Failed to save layout: {}", e))
            }
        }
    }

    /// Drop onto `target` and persist when something moved
    pub async fn drop_and_persist(
        &mut self,
        target: SlotKey,
        persister: &dyn LayoutPersister,
    ) -> Option<Notice> {
        match self.drop(target) {
            DropOutcome::Moved => Some(self.persist(persister).await),
            _ => None,
        }
    }

    /// Put the elements back in the last persisted order, keeping their keys
    fn roll_back(&mut self) {
        let mut remaining = std::mem::take(&mut self.slots);
        for name in &self.persisted {
            if let Some(index) = remaining.iter().position(|s| &s.name == name) {
                self.slots.push(remaining.remove(index));
            }
        }
        self.slots.extend(remaining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::module_names;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn editor() -> LayoutEditor {
        LayoutEditor::new(module_names(["hero", "skills", "projects", "files"]))
    }

    fn key(editor: &LayoutEditor, name: &str) -> SlotKey {
        editor.slot_of(name).unwrap()
    }

    fn drag(editor: &mut LayoutEditor, from: &str, to: &str) -> DropOutcome {
        let source = key(editor, from);
        let target = key(editor, to);
        editor.drag_start(source);
        editor.drag_over(target);
        let outcome = editor.drop(target);
        editor.drag_end();
        outcome
    }

    /// Persister that fails a fixed number of times before succeeding
    struct Flaky {
        failures: AtomicUsize,
        calls: AtomicUsize,
        saved: Mutex<Option<Vec<ModuleName>>>,
    }

    impl Flaky {
        fn new(failures: usize) -> Self {
            Flaky {
                failures: AtomicUsize::new(failures),
                calls: AtomicUsize::new(0),
                saved: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LayoutPersister for Flaky {
        async fn persist_order(&self, order: &[ModuleName]) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                anyhow::bail!("connection reset");
            }
            *self.saved.lock().unwrap() = Some(order.to_vec());
            Ok(())
        }
    }

    #[test]
    fn forward_drag_lands_after_target() {
        let mut editor = editor();
        assert_eq!(drag(&mut editor, "hero", "projects"), DropOutcome::Moved);
        assert_eq!(
            editor.order(),
            module_names(["skills", "projects", "hero", "files"])
        );
    }

    #[test]
    fn backward_drag_lands_before_target() {
        let mut editor = editor();
        assert_eq!(drag(&mut editor, "files", "skills"), DropOutcome::Moved);
        assert_eq!(
            editor.order(),
            module_names(["hero", "files", "skills", "projects"])
        );
    }

    #[test]
    fn drop_on_itself_is_a_no_op() {
        let mut editor = editor();
        assert_eq!(drag(&mut editor, "skills", "skills"), DropOutcome::SameTarget);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn drop_without_drag_start_does_nothing() {
        let mut editor = editor();
        let target = key(&editor, "files");
        assert_eq!(editor.drop(target), DropOutcome::NoDragSource);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn dragover_always_prevents_default() {
        let mut editor = editor();
        let hero = key(&editor, "hero");
        assert!(editor.drag_over(hero).prevent_default);

        editor.drag_start(hero);
        let over_self = editor.drag_over(hero);
        assert!(over_self.prevent_default);
        assert!(!over_self.highlight);

        let files = key(&editor, "files");
        assert!(editor.drag_over(files).highlight);
        assert_eq!(editor.highlighted(), Some(files));
        editor.drag_leave(files);
        assert_eq!(editor.highlighted(), None);
    }

    #[test]
    fn dragend_clears_source_without_drop() {
        let mut editor = editor();
        let hero = key(&editor, "hero");
        assert!(editor.drag_start(hero));
        editor.drag_end();
        assert_eq!(editor.drag_source(), None);
        assert_eq!(editor.drop(key(&editor, "files")), DropOutcome::NoDragSource);
    }

    #[test]
    fn new_drag_replaces_source() {
        let mut editor = editor();
        editor.drag_start(key(&editor, "hero"));
        editor.drag_start(key(&editor, "files"));
        assert_eq!(editor.drag_source(), Some(key(&editor, "files")));
    }

    #[test]
    fn drags_only_permute() {
        let names = ["hero", "skills", "projects", "files", "custom_a", "custom_b"];
        let mut editor = LayoutEditor::new(module_names(names));
        let mut expected = module_names(names);
        expected.sort();

        // Deterministic pseudo-random walk over source/target pairs
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..200 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let from = names[(seed % names.len() as u64) as usize];
            let to = names[((seed >> 8) % names.len() as u64) as usize];
            drag(&mut editor, from, to);

            let mut order = editor.order();
            order.sort();
            assert_eq!(order, expected);
        }
    }

    #[tokio::test]
    async fn successful_save_marks_order_persisted() {
        let persister = Flaky::new(0);
        let mut editor = editor();
        let target = key(&editor, "files");
        editor.drag_start(key(&editor, "hero"));

        let notice = editor.drop_and_persist(target, &persister).await.unwrap();
        assert_eq!(notice.severity, Severity::Success);
        assert!(!notice.is_persistent());
        assert!(!editor.is_dirty());
        assert_eq!(
            persister.saved.lock().unwrap().clone().unwrap(),
            module_names(["skills", "projects", "files", "hero"])
        );
    }

    #[tokio::test]
    async fn one_failure_is_retried() {
        let persister = Flaky::new(1);
        let mut editor = editor();
        drag(&mut editor, "files", "hero");

        let notice = editor.persist(&persister).await;
        assert_eq!(notice.severity, Severity::Success);
        assert_eq!(persister.calls.load(Ordering::SeqCst), 2);
        assert_eq!(editor.persisted_order()[0].as_str(), "files");
    }

    #[tokio::test]
    async fn second_failure_rolls_back() {
        let persister = Flaky::new(2);
        let mut editor = editor();
        let before = editor.order();
        drag(&mut editor, "files", "hero");
        assert!(editor.is_dirty());

        let notice = editor.persist(&persister).await;
        assert!(notice.is_error());
        assert!(notice.is_persistent());
        assert_eq!(editor.order(), before);
        assert!(!editor.is_dirty());
        assert!(persister.saved.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn same_target_drop_does_not_persist() {
        let persister = Flaky::new(0);
        let mut editor = editor();
        let hero = key(&editor, "hero");
        editor.drag_start(hero);
        assert!(editor.drop_and_persist(hero, &persister).await.is_none());
        assert_eq!(persister.calls.load(Ordering::SeqCst), 0);
    }
}
