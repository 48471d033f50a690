//! Repaint requests raised by the list and by thumbnail providers.

use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Shared "needs repaint" flag.
///
/// The list owns the strong handle. Callbacks handed to thumbnail providers
/// only hold a weak one, so they become no-ops once the list is dropped.
#[derive(Debug, Clone, Default)]
pub struct RepaintRequest(Rc<Cell<bool>>);

impl RepaintRequest {
    /// Fresh flag, not requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the widget dirty.
    pub fn request(&self) {
        self.0.set(true);
    }

    /// Whether a repaint is pending, without clearing it.
    pub fn is_requested(&self) -> bool {
        self.0.get()
    }

    /// Clear and return the pending flag.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }

    /// Callback that requests a repaint while the list is alive.
    pub fn callback(&self) -> Box<dyn Fn()> {
        let weak: Weak<Cell<bool>> = Rc::downgrade(&self.0);
        Box::new(move || {
            if let Some(flag) = weak.upgrade() {
                flag.set(true);
            }
        })
    }
}
