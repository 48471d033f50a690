//! Widget state (pure).
//!
//! Everything that changes in response to input lives here and is testable
//! without a terminal: the item store, the expansion state machine, scroll
//! and drag tracking, and the [`StoriesList`] that ties them together.

pub mod events;
pub mod expansion;
pub mod item_store;
pub mod menu;
pub mod repaint;
pub mod scroll;
pub mod stories_list;

// Re-export for convenience
pub use events::{Signal, SubscriptionId};
pub use expansion::{Expansion, GeometryState, HeightUpdate};
pub use item_store::{Item, ItemStore, ReconcileOutcome};
pub use menu::{ContextMenuReason, MenuAction, MenuActions, MenuPopup, MenuToken, ShowMenuRequest};
pub use repaint::RepaintRequest;
pub use scroll::{DragTracker, ScrollState, WheelDelta};
pub use stories_list::{CollapsedGeometry, CursorShape, MouseButton, StoriesList};
