//! The stories list widget core.
//!
//! [`StoriesList`] owns the items, the scroll and drag state and the
//! expansion state machine, and exposes everything a host window system
//! needs: a control surface for the chat list above it, raw input entry
//! points, painting, and output [`Signal`]s.
//!
//! All pointer positions passed in are in the parent's coordinate space
//! (the same space [`StoriesList::geometry`] is reported in).

use super::events::Signal;
use super::expansion::{Expansion, GeometryState};
use super::item_store::{Item, ItemStore, ReconcileOutcome};
use super::menu::{ContextMenuReason, MenuActions, MenuPopup, MenuToken, ShowMenuRequest};
use super::repaint::RepaintRequest;
use super::scroll::{scroll_left_max, wheel_step, DragTracker, ScrollState, WheelDelta};
use crate::model::{Alignment, Behavior, Content, Point, Rect, StoryId, StripStyle};
use crate::view_state::animation::Timestamp;
use crate::view_state::canvas::{Canvas, TextShaper};
use crate::view_state::hit_test::hit_test;
use crate::view_state::layout::{compute_layout, small_geometry, ChangingShift, Layout, LayoutContext};
use crate::view_state::paint::{paint_strip, PaintContext};
use std::rc::Rc;
use tracing::{debug, trace};

/// Mouse button of a press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
}

/// Pointer shape the host should show over the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Arrow.
    #[default]
    Default,
    /// Hand, shown while an item is under the pointer.
    Pointer,
}

/// Compact row rectangle and how far the toggle animation progressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollapsedGeometry {
    /// Compact row in parent coordinates; empty once fully expanded.
    pub geometry: Rect,
    /// Toggle animation progress, 1 when fully expanded.
    pub expanded: f64,
}

/// Horizontal stories strip.
pub struct StoriesList {
    style: StripStyle,
    behavior: Behavior,
    store: ItemStore,
    scroll: ScrollState,
    drag: DragTracker,
    expansion: Expansion,

    geometry: Rect,
    position_small: Point,
    align_small: Alignment,
    geometry_full: Rect,
    changing_geometry_from: Rect,

    last_mouse: Point,
    selected: Option<usize>,
    pressed: Option<usize>,
    cursor: CursorShape,

    repaint: RepaintRequest,
    menu_guard: Rc<()>,
    menu_serial: u64,

    clicks: Signal<StoryId>,
    show_menu_requests: Signal<ShowMenuRequest>,
    toggle_expanded_requests: Signal<bool>,
    entered: Signal<()>,
    load_more_requests: Signal<()>,
    collapsed_geometry_changed: Signal<()>,
}

impl StoriesList {
    /// Empty, collapsed, zero-sized list.
    pub fn new(style: StripStyle, behavior: Behavior) -> Self {
        Self {
            expansion: Expansion::new(style.full.height, behavior.toggle_duration_ms),
            style,
            behavior,
            store: ItemStore::new(),
            scroll: ScrollState::new(),
            drag: DragTracker::new(),
            geometry: Rect::default(),
            position_small: Point::default(),
            align_small: Alignment::default(),
            geometry_full: Rect::default(),
            changing_geometry_from: Rect::default(),
            last_mouse: Point::default(),
            selected: None,
            pressed: None,
            cursor: CursorShape::Default,
            repaint: RepaintRequest::new(),
            menu_guard: Rc::new(()),
            menu_serial: 0,
            clicks: Signal::new(),
            show_menu_requests: Signal::new(),
            toggle_expanded_requests: Signal::new(),
            entered: Signal::new(),
            load_more_requests: Signal::new(),
            collapsed_geometry_changed: Signal::new(),
        }
    }

    // ===== Output channels =====

    /// Confirmed clicks on an item.
    pub fn clicks(&self) -> &Signal<StoryId> {
        &self.clicks
    }

    /// Context menu requests; subscribers add entries to the request.
    pub fn show_menu_requests(&self) -> &Signal<ShowMenuRequest> {
        &self.show_menu_requests
    }

    /// Every expand or collapse request, even while animating.
    pub fn toggle_expanded_requests(&self) -> &Signal<bool> {
        &self.toggle_expanded_requests
    }

    /// Pointer entered the widget.
    pub fn entered(&self) -> &Signal<()> {
        &self.entered
    }

    /// Scrolled close to the end.
    pub fn load_more_requests(&self) -> &Signal<()> {
        &self.load_more_requests
    }

    /// Fired on every toggle animation frame.
    pub fn collapsed_geometry_changed(&self) -> &Signal<()> {
        &self.collapsed_geometry_changed
    }

    // ===== Accessors =====

    /// Widget rectangle in parent coordinates.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Pointer shape to show.
    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    /// Item under the pointer.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Items in display order.
    pub fn items(&self) -> &[Item] {
        self.store.items()
    }

    /// Current horizontal scroll offset.
    pub fn scroll_left(&self) -> i32 {
        self.scroll.left()
    }

    /// Current maximum scroll offset.
    pub fn scroll_left_max(&self) -> i32 {
        self.scroll.left_max()
    }

    /// Current geometry state.
    pub fn state(&self) -> GeometryState {
        self.expansion.state()
    }

    /// Expanded flag.
    pub fn is_expanded(&self) -> bool {
        self.expansion.expanded()
    }

    /// Whether the host should keep calling [`StoriesList::tick`].
    pub fn is_animating(&self) -> bool {
        self.expansion.is_animating()
    }

    /// Clear and return the pending repaint flag.
    pub fn take_repaint_request(&self) -> bool {
        self.repaint.take()
    }

    // ===== Control surface =====

    /// Apply a content snapshot.
    pub fn show_content(&mut self, content: Content) {
        match self.store.apply(content) {
            ReconcileOutcome::Unchanged => {}
            ReconcileOutcome::Cleared => {
                self.selected = None;
                self.pressed = None;
                self.update_geometry();
                self.update_scroll_max();
            }
            ReconcileOutcome::Rebuilt { count_changed, .. } => {
                if count_changed {
                    self.update_geometry();
                }
                self.update_scroll_max();
            }
        }
    }

    /// Ask for the expanded or collapsed shape.
    pub fn request_expanded(&mut self, expanded: bool, now: Timestamp) {
        self.expansion.set_expanded(expanded, now);
        self.toggle_expanded_requests.fire(&self.expansion.expanded());
    }

    /// Report how far the chat list above is pulled open.
    pub fn update_expanding(&mut self, expanding_height: i32, expanded_height: i32, now: Timestamp) {
        if let Some(expanded) = self.expansion.update_expanding(expanding_height, expanded_height) {
            self.request_expanded(expanded, now);
        }
    }

    /// Report the height the chat list reserved for the strip.
    pub fn set_expanded_height(&mut self, height: i32, momentum: bool, now: Timestamp) {
        let before = self.expansion.state();
        self.expansion.set_expanded_height(height, momentum, now);
        self.after_state_change(before);
        self.repaint.request();
    }

    /// Where the compact row anchors and where the full panel goes.
    pub fn set_layout_constraints(&mut self, position_small: Point, align_small: Alignment, geometry_full: Rect) {
        self.position_small = position_small;
        self.align_small = align_small;
        self.geometry_full = geometry_full;
        self.update_geometry();
        self.repaint.request();
    }

    /// Compact row rectangle the host animates its own header against.
    pub fn collapsed_geometry_current(&self) -> CollapsedGeometry {
        let expanded = self.expansion.toggle_progress();
        if expanded == 1.0 {
            return CollapsedGeometry {
                geometry: Rect::default(),
                expanded: 1.0,
            };
        }
        let layout = self.layout_at(0.0);
        let small = self.count_small_geometry();
        let index = layout.first_small_slot();
        let shift = f64::from(self.geometry.x) + layout.geometry_shift.x;
        let left = (shift + layout.left + layout.single * f64::from(index)).round() as i32;
        CollapsedGeometry {
            geometry: Rect::new(left, small.y, small.x + small.width - left, small.height),
            expanded,
        }
    }

    // ===== Input =====

    /// Pointer entered the widget.
    pub fn enter(&mut self) {
        self.entered.fire(&());
    }

    /// Mouse button pressed at global `position`.
    pub fn mouse_press(&mut self, button: MouseButton, position: Point, now: Timestamp) {
        if button != MouseButton::Left || self.store.is_empty() {
            return;
        }
        match self.expansion.state() {
            GeometryState::Small => self.request_expanded(true, now),
            GeometryState::Changing => return,
            GeometryState::Full => {}
        }
        self.last_mouse = position;
        self.update_selected(now);
        self.drag.press(position);
        self.pressed = self.selected;
    }

    /// Pointer moved to global `position`.
    pub fn mouse_move(&mut self, position: Point, now: Timestamp) {
        self.last_mouse = position;
        self.update_selected(now);
        if self.expansion.state() == GeometryState::Full
            && self
                .drag
                .maybe_start(position, self.behavior.drag_distance, self.scroll.left())
        {
            debug!(start_left = self.scroll.left(), "Stories drag started");
        }
        self.check_dragging();
    }

    /// Mouse button released at global `position`.
    pub fn mouse_release(&mut self, button: MouseButton, position: Point, now: Timestamp) {
        if button != MouseButton::Left {
            return;
        }
        self.last_mouse = position;
        let pressed = self.pressed.take();
        let dragged = self.finish_dragging(now);
        self.drag.release();
        if dragged {
            return;
        }
        self.update_selected(now);
        if self.selected != pressed {
            return;
        }
        if !self.expansion.expanded() {
            self.request_expanded(true, now);
        } else if let Some(item) = self.selected.and_then(|index| self.store.get(index)) {
            let id = item.element().id;
            debug!(%id, "Story clicked");
            self.clicks.fire(&id);
        }
    }

    /// Wheel event. Returns whether the list consumed it.
    pub fn wheel(&mut self, delta: WheelDelta, now: Timestamp) -> bool {
        if self.store.is_empty() || self.expansion.state() == GeometryState::Small {
            return false;
        }
        let Some(step) = wheel_step(delta, self.behavior.right_to_left) else {
            return false;
        };
        if self.scroll.scroll_to(self.scroll.left() - step) {
            self.request_expanded(true, now);
            self.update_selected(now);
            self.check_load_more();
            self.repaint.request();
        }
        true
    }

    /// Context menu requested at global `position`.
    ///
    /// Returns the popup to show, or `None` when there is nothing to offer.
    pub fn context_menu(&mut self, position: Point, reason: ContextMenuReason, now: Timestamp) -> Option<MenuPopup> {
        if reason == ContextMenuReason::Mouse {
            self.last_mouse = position;
            self.update_selected(now);
        }
        if !self.expansion.expanded() {
            return None;
        }
        let id = self.store.get(self.selected?)?.element().id;
        let actions = MenuActions::new();
        self.show_menu_requests.fire(&ShowMenuRequest {
            id,
            actions: actions.clone(),
        });
        if actions.is_empty() {
            return None;
        }
        self.menu_serial += 1;
        debug!(%id, serial = self.menu_serial, entries = actions.len(), "Stories menu shown");
        Some(MenuPopup {
            actions: actions.take(),
            position,
            token: MenuToken::new(&self.menu_guard, self.menu_serial),
        })
    }

    /// A popup returned by [`StoriesList::context_menu`] was closed while the
    /// pointer was at global `cursor`.
    pub fn menu_destroyed(&mut self, token: &MenuToken, cursor: Point, now: Timestamp) {
        if !token.belongs_to(&self.menu_guard) {
            return;
        }
        trace!(serial = token.serial(), "Stories menu destroyed");
        let local = self.map_from_global(cursor);
        let bounds = Rect::new(0, 0, self.geometry.width, self.geometry.height);
        if bounds.contains(local) {
            self.last_mouse = cursor;
            self.update_selected(now);
        }
    }

    /// Advance animations. Returns whether anything changed.
    pub fn tick(&mut self, now: Timestamp) -> bool {
        let mut changed = false;
        if self.expansion.tick_toggle(now) {
            changed = true;
            self.check_for_full_state();
            self.collapsed_geometry_changed.fire(&());
        }
        if self.expansion.tick_catch_up(now) {
            changed = true;
            self.check_for_full_state();
        }
        if changed {
            self.repaint.request();
        }
        changed
    }

    /// Paint the current frame.
    pub fn paint(&mut self, canvas: &mut dyn Canvas, shaper: &dyn TextShaper, now: Timestamp) {
        let layout = self.current_layout(now);
        let context = PaintContext {
            style: &self.style,
            shaper,
            repaint: &self.repaint,
            changing: self.expansion.state() == GeometryState::Changing,
        };
        paint_strip(&layout, self.store.items_mut(), &context, canvas);
    }

    // ===== Internals =====

    fn map_from_global(&self, position: Point) -> Point {
        position - self.geometry.top_left()
    }

    /// Layout for the current frame.
    ///
    /// Feeds the catch-up scaled height back into the threshold check first,
    /// which may request a toggle.
    fn current_layout(&mut self, now: Timestamp) -> Layout {
        let height = self.expansion.catch_up_height();
        self.update_expanding(height, self.style.full.height, now);
        self.layout_at(self.expansion.toggle_progress())
    }

    fn layout_at(&self, expanded: f64) -> Layout {
        let shift = (self.expansion.state() == GeometryState::Changing).then(|| ChangingShift {
            from: self.changing_geometry_from.top_left(),
            full: self.geometry_full.top_left(),
            position: self.geometry.top_left(),
        });
        let context = LayoutContext {
            width: self.geometry.width,
            items_count: self.store.len(),
            first_skip_small: self.store.first_skip_small(),
            scroll_left: self.scroll.left(),
            expanded_ratio: self.expansion.last_ratio(),
            shift,
        };
        compute_layout(&context, &self.style.small, &self.style.full, expanded)
    }

    fn update_selected(&mut self, now: Timestamp) {
        if self.pressed.is_some() {
            return;
        }
        let local = self.map_from_global(self.last_mouse);
        let layout = self.current_layout(now);
        let selected = hit_test(&layout, &self.style.small, self.style.full_clickable, local.x);
        if self.selected != selected {
            self.cursor = if selected.is_some() {
                CursorShape::Pointer
            } else {
                CursorShape::Default
            };
            self.selected = selected;
        }
    }

    fn check_dragging(&mut self) {
        let Some(target) = self
            .drag
            .target_left(self.last_mouse, self.behavior.right_to_left)
        else {
            return;
        };
        if self.scroll.scroll_to(target) {
            self.check_load_more();
            self.repaint.request();
        }
    }

    fn finish_dragging(&mut self, now: Timestamp) -> bool {
        if !self.drag.is_dragging() {
            return false;
        }
        self.check_dragging();
        self.drag.finish();
        self.update_selected(now);
        true
    }

    fn check_load_more(&self) {
        if self.scroll.needs_more(self.geometry.width) {
            trace!(
                left = self.scroll.left(),
                max = self.scroll.left_max(),
                "Stories load more requested"
            );
            self.load_more_requests.fire(&());
        }
    }

    fn update_scroll_max(&mut self) {
        let max = scroll_left_max(&self.style.full, self.store.len(), self.geometry.width);
        self.scroll.set_max(max);
        self.check_load_more();
        self.repaint.request();
    }

    fn check_for_full_state(&mut self) {
        let before = self.expansion.state();
        self.expansion.check_for_full_state();
        self.after_state_change(before);
    }

    fn after_state_change(&mut self, before: GeometryState) {
        if self.expansion.state() != before {
            self.update_geometry();
        }
    }

    fn count_small_geometry(&self) -> Rect {
        small_geometry(
            &self.layout_at(0.0),
            &self.style.small,
            self.position_small,
            self.align_small,
        )
    }

    fn update_geometry(&mut self) {
        let target = match self.expansion.state() {
            GeometryState::Small => self.count_small_geometry(),
            GeometryState::Changing => {
                self.changing_geometry_from = self.count_small_geometry();
                self.geometry_full.united(&self.changing_geometry_from)
            }
            GeometryState::Full => self.geometry_full,
        };
        let target = if self.store.is_empty() {
            Rect::new(target.x, target.y, 0, 0)
        } else {
            target
        };
        self.set_geometry(target);
    }

    fn set_geometry(&mut self, geometry: Rect) {
        let resized = geometry.width != self.geometry.width || geometry.height != self.geometry.height;
        self.geometry = geometry;
        if resized {
            self.update_scroll_max();
        }
        self.repaint.request();
    }
}

#[cfg(test)]
#[path = "stories_list_tests.rs"]
mod tests;
