//! Context menu requests and the popup handed back to the host.

use crate::model::{Point, StoryId};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// What opened the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMenuReason {
    /// Right click; the event position updates the selection first.
    Mouse,
    /// Menu key; the current selection is used as is.
    Keyboard,
}

/// One entry of a popup menu.
#[derive(Clone)]
pub struct MenuAction {
    /// Label.
    pub text: String,
    /// Invoked when the entry is chosen.
    pub handler: Rc<dyn Fn()>,
}

impl fmt::Debug for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuAction").field("text", &self.text).finish()
    }
}

/// Collector subscribers fill while a menu request is being dispatched.
#[derive(Debug, Clone, Default)]
pub struct MenuActions(Rc<RefCell<Vec<MenuAction>>>);

impl MenuActions {
    /// Empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn add_action(&self, text: impl Into<String>, handler: impl Fn() + 'static) {
        self.0.borrow_mut().push(MenuAction {
            text: text.into(),
            handler: Rc::new(handler),
        });
    }

    /// Number of collected entries.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// True when nobody added an entry.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Take the collected entries out.
    pub fn take(&self) -> Vec<MenuAction> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Fired when the user asks for a context menu over an item.
#[derive(Debug, Clone)]
pub struct ShowMenuRequest {
    /// Item under the pointer.
    pub id: StoryId,
    /// Where subscribers add their entries.
    pub actions: MenuActions,
}

/// Liveness token tying a popup to the list that opened it.
///
/// The list keeps the strong side; once it is dropped the token no longer
/// resolves and [`crate::state::StoriesList::menu_destroyed`] cannot reach a
/// dead widget.
#[derive(Debug, Clone)]
pub struct MenuToken {
    guard: Weak<()>,
    serial: u64,
}

impl MenuToken {
    pub(crate) fn new(guard: &Rc<()>, serial: u64) -> Self {
        Self {
            guard: Rc::downgrade(guard),
            serial,
        }
    }

    /// Whether the token was issued by the owner of `guard` and it is alive.
    pub(crate) fn belongs_to(&self, guard: &Rc<()>) -> bool {
        self.guard
            .upgrade()
            .is_some_and(|alive| Rc::ptr_eq(&alive, guard))
    }

    /// Which menu of the list this token belongs to.
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

/// Popup the host should show.
#[derive(Debug, Clone)]
pub struct MenuPopup {
    /// Entries in the order they were added.
    pub actions: Vec<MenuAction>,
    /// Global position to pop up at.
    pub position: Point,
    /// Pass back to `menu_destroyed` when the popup closes.
    pub token: MenuToken,
}
