//! Ordered items reconciled from content snapshots.
//!
//! Items carry render-side caches (thumbnail subscription, rendered name)
//! that must survive snapshots as long as the underlying element keeps its
//! id, so reconciliation matches by id instead of rebuilding.

use super::repaint::RepaintRequest;
use crate::model::{same_thumbnail, Content, Element, Rgba};
use crate::view_state::canvas::{TextImage, TextShaper};
use std::collections::HashMap;
use tracing::debug;

/// One element plus its render cache.
#[derive(Debug, Clone)]
pub struct Item {
    element: Element,
    subscribed: bool,
    name_cache: Option<TextImage>,
}

impl Item {
    /// Fresh item with empty caches.
    pub fn new(element: Element) -> Self {
        Self {
            element,
            subscribed: false,
            name_cache: None,
        }
    }

    /// The wrapped element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Whether the list already listens to this item's thumbnail provider.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Cached name image, if still valid.
    pub fn name_cache(&self) -> Option<&TextImage> {
        self.name_cache.as_ref()
    }

    /// Take the fields of a newer element with the same id, dropping the
    /// caches the change invalidates.
    fn update_from(&mut self, element: &Element) {
        if !same_thumbnail(&self.element.thumbnail, &element.thumbnail) {
            self.element.thumbnail = element.thumbnail.clone();
            self.subscribed = false;
        }
        if self.element.name != element.name {
            self.element.name = element.name.clone();
            self.name_cache = None;
        }
        self.element.count = element.count;
        self.element.unread_count = element.unread_count;
        self.element.skip_small = element.skip_small;
    }

    /// Subscribe to thumbnail updates once per provider instance.
    pub fn validate_thumbnail(&mut self, repaint: &RepaintRequest) {
        if !self.subscribed {
            self.subscribed = true;
            self.element.thumbnail.subscribe_to_updates(repaint.callback());
        }
    }

    /// Render the name unless a cache with the same color exists.
    pub fn validate_name(
        &mut self,
        shaper: &dyn TextShaper,
        available_width: i32,
        font_height: i32,
        color: Rgba,
    ) -> &TextImage {
        if self.name_cache.as_ref().is_some_and(|cache| cache.color != color) {
            self.name_cache = None;
        }
        let name = &self.element.name;
        self.name_cache
            .get_or_insert_with(|| shaper.shape_elided(name, available_width, font_height, color))
    }
}

/// Result of applying a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Snapshot equal to the current one; nothing touched.
    Unchanged,
    /// Empty snapshot; all items dropped.
    Cleared,
    /// Items rebuilt in the snapshot's order.
    Rebuilt {
        /// Item count differs from before.
        count_changed: bool,
        /// The store held no items before.
        was_empty: bool,
    },
}

/// Live ordered items.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    content: Content,
    items: Vec<Item>,
}

impl ItemStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in display order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Mutable items, for cache validation during paint.
    pub fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    /// Item at `index`.
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the first item is omitted from the compact row.
    pub fn first_skip_small(&self) -> bool {
        self.items
            .first()
            .is_some_and(|item| item.element.skip_small)
    }

    /// Reconcile against a new snapshot.
    ///
    /// Existing items are reused by id, wherever they sat before; new ids get
    /// fresh items. The result always follows the snapshot's order.
    pub fn apply(&mut self, content: Content) -> ReconcileOutcome {
        if self.content == content {
            return ReconcileOutcome::Unchanged;
        }
        if content.is_empty() {
            debug!(dropped = self.items.len(), "Stories content cleared");
            self.items.clear();
            self.content = content;
            return ReconcileOutcome::Cleared;
        }
        let was_count = self.items.len();
        let mut previous: HashMap<_, _> = std::mem::take(&mut self.items)
            .into_iter()
            .map(|item| (item.element.id, item))
            .collect();
        self.items.reserve(content.elements.len());
        for element in &content.elements {
            let item = match previous.remove(&element.id) {
                Some(mut item) => {
                    item.update_from(element);
                    item
                }
                None => Item::new(element.clone()),
            };
            self.items.push(item);
        }
        self.content = content;
        debug!(
            was = was_count,
            now = self.items.len(),
            "Stories content reconciled"
        );
        ReconcileOutcome::Rebuilt {
            count_changed: self.items.len() != was_count,
            was_empty: was_count == 0,
        }
    }
}

#[cfg(test)]
#[path = "item_store_tests.rs"]
mod tests;
