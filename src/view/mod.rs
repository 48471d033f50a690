//! Terminal demo host (impure shell).
//!
//! Plays the window system around a [`StoriesList`]: terminal cells map to
//! `cell_width`×`cell_height` pixels, crossterm mouse and key events become
//! list input, a timer drives animations, and frames are rasterized through
//! [`TerminalCanvas`]. The chat list the strip normally sits above is
//! simulated by a "pull" height moved with the arrow keys.

pub mod canvas;
pub mod demo;
pub mod shaper;

pub use canvas::TerminalCanvas;
pub use demo::{demo_elements, GradientThumbnail};
pub use shaper::{elide, ElidingShaper};

use crate::config::ResolvedConfig;
use crate::model::{Alignment, Element, Point, PointF, Rect, StoryId};
use crate::state::{ContextMenuReason, MenuPopup, MouseButton, StoriesList, WheelDelta};
use crate::view_state::Timestamp;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect as CellRect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::cell::RefCell;
use std::io::{self, Stdout};
use std::rc::Rc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

const WELCOME: &str = "Pull the chat list with ↑/↓ or click the stories";

/// Rows above the full panel; the compact row lives here.
const HEADER_ROWS: u16 = 2;

/// Poll timeout while an animation runs.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Poll timeout while idle.
const IDLE_INTERVAL: Duration = Duration::from_millis(250);

/// Stories appended per load-more request.
const LOAD_MORE_BATCH: usize = 8;

/// The demo data source runs dry here.
const MAX_STORIES: usize = 64;

/// Horizontal wheel angle of one notch.
const WHEEL_NOTCH: i32 = 120;

/// What signal handlers leave for the host to act on after an event.
#[derive(Debug, Default)]
struct Inbox {
    status: Option<String>,
    toggle: Option<bool>,
    load_more: bool,
    mark_read: Option<StoryId>,
}

impl Inbox {
    fn is_idle(&self) -> bool {
        self.status.is_none() && self.toggle.is_none() && !self.load_more && self.mark_read.is_none()
    }
}

/// Demo application
///
/// Generic over backend to support testing with TestBackend
pub struct DemoApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    list: StoriesList,
    shaper: ElidingShaper,
    cell_width: i32,
    cell_height: i32,
    full_height: i32,
    elements: Vec<Element>,
    pull: i32,
    momentum: bool,
    hovering: bool,
    last_cursor: Point,
    menu: Option<MenuPopup>,
    inbox: Rc<RefCell<Inbox>>,
    status: String,
}

impl<B> DemoApp<B>
where
    B: Backend,
{
    /// Build the list, wire its signals and show `items` demo stories.
    pub fn new(terminal: Terminal<B>, config: &ResolvedConfig, items: usize) -> Result<Self, TuiError> {
        let style = config.strip_style();
        let list = StoriesList::new(style, config.behavior);
        let inbox = Rc::new(RefCell::new(Inbox::default()));
        wire_signals(&list, &inbox);

        let mut app = Self {
            terminal,
            list,
            shaper: ElidingShaper::new(config.cell_width),
            cell_width: i32::from(config.cell_width),
            cell_height: i32::from(config.cell_height),
            full_height: style.full.height,
            elements: demo_elements(1, items),
            pull: 0,
            momentum: false,
            hovering: false,
            last_cursor: Point::default(),
            menu: None,
            inbox,
            status: String::new(),
        };
        let size = app.terminal.size()?;
        app.handle_resize(size.width, size.height);
        app.list.show_content(demo::content_of(&app.elements));
        app.process_inbox(Timestamp::from_millis(0));
        app.status = String::from(WELCOME);
        Ok(app)
    }

    /// The widget being hosted.
    pub fn list(&self) -> &StoriesList {
        &self.list
    }

    /// Message shown on the bottom line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Height the simulated chat list currently reserves for the strip.
    pub fn pull(&self) -> i32 {
        self.pull
    }

    /// Popup currently open, if any.
    pub fn menu(&self) -> Option<&MenuPopup> {
        self.menu.as_ref()
    }

    /// Underlying terminal, for inspecting the rendered buffer.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Run the event loop until the user quits.
    pub fn run(&mut self) -> Result<(), TuiError> {
        let started = Instant::now();
        let now = || Timestamp::from_millis(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX));

        self.draw(now())?;
        loop {
            let timeout = if self.list.is_animating() {
                FRAME_INTERVAL
            } else {
                IDLE_INTERVAL
            };
            let mut dirty = false;
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key, now()) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse, now());
                        dirty = true;
                    }
                    Event::Resize(width, height) => {
                        self.handle_resize(width, height);
                        dirty = true;
                    }
                    _ => {}
                }
            }
            let animated = self.tick(now());
            if dirty || animated || self.list.take_repaint_request() {
                self.draw(now())?;
            }
        }
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent, now: Timestamp) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        if self.menu.is_some() {
            match key.code {
                KeyCode::Esc => self.close_menu(now),
                KeyCode::Char(digit @ '1'..='9') => {
                    let choice = digit as usize - '1' as usize;
                    self.choose_menu_action(choice, now);
                }
                KeyCode::Char('q') => return true,
                _ => {}
            }
            self.process_inbox(now);
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.pull_by(self.cell_height, now),
            KeyCode::Down => self.pull_by(-self.cell_height, now),
            KeyCode::Left => {
                self.list
                    .wheel(WheelDelta::horizontal(self.cell_width * 4, WHEEL_NOTCH), now);
            }
            KeyCode::Right => {
                self.list
                    .wheel(WheelDelta::horizontal(-self.cell_width * 4, -WHEEL_NOTCH), now);
            }
            KeyCode::Char('m') => {
                self.momentum = !self.momentum;
                self.status = format!("Momentum {}", if self.momentum { "on" } else { "off" });
            }
            KeyCode::Char('e') => {
                let expanded = !self.list.is_expanded();
                self.list.request_expanded(expanded, now);
            }
            KeyCode::Char('c') => {
                self.menu = self
                    .list
                    .context_menu(self.last_cursor, ContextMenuReason::Keyboard, now);
            }
            _ => {}
        }
        self.process_inbox(now);
        false
    }

    /// Handle a single mouse event
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Timestamp) {
        let position = Point::new(
            i32::from(mouse.column) * self.cell_width + self.cell_width / 2,
            i32::from(mouse.row) * self.cell_height + self.cell_height / 2,
        );
        self.last_cursor = position;
        let inside = self.list.geometry().contains(position);
        if inside && !self.hovering {
            self.list.enter();
        }
        self.hovering = inside;

        match mouse.kind {
            MouseEventKind::Down(event::MouseButton::Left) => {
                if self.menu.is_some() {
                    self.close_menu(now);
                } else {
                    self.list.mouse_press(MouseButton::Left, position, now);
                }
            }
            MouseEventKind::Down(event::MouseButton::Right) => {
                self.close_menu(now);
                self.menu = self
                    .list
                    .context_menu(position, ContextMenuReason::Mouse, now);
            }
            MouseEventKind::Up(event::MouseButton::Left) => {
                self.list.mouse_release(MouseButton::Left, position, now);
            }
            MouseEventKind::Drag(event::MouseButton::Left) | MouseEventKind::Moved => {
                self.list.mouse_move(position, now);
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let up = mouse.kind == MouseEventKind::ScrollUp;
                let angle = if up { WHEEL_NOTCH } else { -WHEEL_NOTCH };
                let consumed = inside && self.list.wheel(WheelDelta::vertical(angle), now);
                if !consumed {
                    let step = if up { self.cell_height } else { -self.cell_height };
                    self.pull_by(step, now);
                }
            }
            MouseEventKind::ScrollLeft => {
                self.list
                    .wheel(WheelDelta::horizontal(self.cell_width * 4, WHEEL_NOTCH), now);
            }
            MouseEventKind::ScrollRight => {
                self.list
                    .wheel(WheelDelta::horizontal(-self.cell_width * 4, -WHEEL_NOTCH), now);
            }
            _ => {}
        }
        self.process_inbox(now);
    }

    /// Handle a terminal resize event
    ///
    /// The compact row anchors to the right end of the header, the full panel
    /// spans the width right under it.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "Terminal resized");
        let width_px = i32::from(width.max(1)) * self.cell_width;
        self.list.set_layout_constraints(
            Point::new(width_px - self.cell_width, 0),
            Alignment::Right,
            Rect::new(
                0,
                i32::from(HEADER_ROWS) * self.cell_height,
                width_px,
                self.full_height,
            ),
        );
    }

    /// Advance animations. Returns whether anything moved.
    pub fn tick(&mut self, now: Timestamp) -> bool {
        let changed = self.list.tick(now);
        self.process_inbox(now);
        changed
    }

    /// Render the current frame
    pub fn draw(&mut self, now: Timestamp) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let area = CellRect::new(0, 0, size.width, size.height);
        let geometry = self.list.geometry();
        let mut canvas = TerminalCanvas::new(
            area,
            self.cell_width as u16,
            self.cell_height as u16,
            PointF::new(f64::from(geometry.x), f64::from(geometry.y)),
        );
        self.list.paint(&mut canvas, &self.shaper, now);

        let chats_top = i32::from(HEADER_ROWS) * self.cell_height + self.pull;
        let chats_row = u16::try_from((chats_top + self.cell_height - 1) / self.cell_height).unwrap_or(u16::MAX);
        let footer = FooterInfo {
            status: &self.status,
            momentum: self.momentum,
            scroll: (self.list.scroll_left(), self.list.scroll_left_max()),
        };
        let menu = self.menu.as_ref();
        let (cell_width, cell_height) = (self.cell_width, self.cell_height);

        self.terminal.draw(|frame| {
            render_chats(frame, chats_row);
            canvas.render(frame.buffer_mut());
            render_header(frame);
            render_footer(frame, &footer);
            if let Some(menu) = menu {
                render_menu(frame, menu, cell_width, cell_height);
            }
        })?;
        Ok(())
    }

    fn pull_by(&mut self, delta: i32, now: Timestamp) {
        let pull = (self.pull + delta).clamp(0, self.full_height);
        if pull == self.pull {
            return;
        }
        self.pull = pull;
        self.list.set_expanded_height(pull, self.momentum, now);
        self.list.update_expanding(pull, self.full_height, now);
    }

    fn close_menu(&mut self, now: Timestamp) {
        if let Some(popup) = self.menu.take() {
            self.list.menu_destroyed(&popup.token, self.last_cursor, now);
        }
    }

    fn choose_menu_action(&mut self, choice: usize, now: Timestamp) {
        let Some(action) = self
            .menu
            .as_ref()
            .and_then(|popup| popup.actions.get(choice).cloned())
        else {
            return;
        };
        self.close_menu(now);
        (action.handler)();
    }

    /// Act on whatever the signal handlers queued, including anything
    /// queued while acting.
    fn process_inbox(&mut self, now: Timestamp) {
        loop {
            let inbox = std::mem::take(&mut *self.inbox.borrow_mut());
            if inbox.is_idle() {
                return;
            }
            if let Some(status) = inbox.status {
                self.status = status;
            }
            if let Some(expanded) = inbox.toggle {
                // The chat list follows the strip: snap open or shut.
                let target = if expanded { self.full_height } else { 0 };
                if self.pull != target {
                    self.pull = target;
                    self.list.set_expanded_height(target, false, now);
                }
            }
            if let Some(id) = inbox.mark_read {
                if let Some(element) = self.elements.iter_mut().find(|e| e.id == id) {
                    element.unread_count = 0;
                    self.status = format!("Marked {} as read", element.name);
                }
                self.list.show_content(demo::content_of(&self.elements));
            }
            if inbox.load_more && self.elements.len() < MAX_STORIES {
                let next = self.elements.last().map_or(1, |e| e.id.get() + 1);
                self.elements.extend(demo_elements(next, LOAD_MORE_BATCH));
                info!(total = self.elements.len(), "Loaded more stories");
                self.status = format!(
                    "Loaded {} more stories ({} total)",
                    LOAD_MORE_BATCH,
                    self.elements.len()
                );
                self.list.show_content(demo::content_of(&self.elements));
            }
        }
    }
}

impl DemoApp<CrosstermBackend<Stdout>> {
    /// Put the terminal in raw mode with alternate screen and mouse capture.
    pub fn start(config: &ResolvedConfig, items: usize) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(event::EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Self::new(terminal, config, items)
    }
}

fn wire_signals(list: &StoriesList, inbox: &Rc<RefCell<Inbox>>) {
    let sink = Rc::clone(inbox);
    list.clicks().subscribe(move |id| {
        sink.borrow_mut().status = Some(format!("Opened story {}", id));
    });

    let sink = Rc::clone(inbox);
    list.toggle_expanded_requests().subscribe(move |expanded| {
        sink.borrow_mut().toggle = Some(*expanded);
    });

    let sink = Rc::clone(inbox);
    list.load_more_requests().subscribe(move |_| {
        sink.borrow_mut().load_more = true;
    });

    let sink = Rc::clone(inbox);
    list.show_menu_requests().subscribe(move |request| {
        let id = request.id;
        let open = Rc::clone(&sink);
        request.actions.add_action("Open", move || {
            open.borrow_mut().status = Some(format!("Opened story {}", id));
        });
        let read = Rc::clone(&sink);
        request.actions.add_action("Mark as read", move || {
            read.borrow_mut().mark_read = Some(id);
        });
    });

    list.entered().subscribe(|_| debug!("Pointer entered stories"));
}

struct FooterInfo<'a> {
    status: &'a str,
    momentum: bool,
    scroll: (i32, i32),
}

fn render_header(frame: &mut Frame) {
    let area = frame.area();
    let header = CellRect::new(area.x, area.y, area.width.min(8), area.height.min(1));
    let title = Paragraph::new(Line::from("Chats")).style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(title, header);
}

fn render_chats(frame: &mut Frame, first_row: u16) {
    let area = frame.area();
    let last_row = area.bottom().saturating_sub(1);
    for (n, row) in (first_row..last_row).enumerate() {
        let line = CellRect::new(area.x, row, area.width, 1);
        let text = format!("  Chat {:<3} last message preview", n + 1);
        frame.render_widget(
            Paragraph::new(Line::from(text)).style(Style::default().fg(Color::Gray)),
            line,
        );
    }
}

fn render_footer(frame: &mut Frame, info: &FooterInfo) {
    let area = frame.area();
    if area.height == 0 {
        return;
    }
    let footer = CellRect::new(area.x, area.bottom() - 1, area.width, 1);
    let text = format!(
        "{} | scroll {}/{} | ↑/↓ pull  m momentum:{}  e toggle  q quit",
        info.status,
        info.scroll.0,
        info.scroll.1,
        if info.momentum { "on" } else { "off" },
    );
    frame.render_widget(
        Paragraph::new(Line::from(text)).style(Style::default().fg(Color::Black).bg(Color::Gray)),
        footer,
    );
}

fn render_menu(frame: &mut Frame, menu: &MenuPopup, cell_width: i32, cell_height: i32) {
    let area = frame.area();
    let lines: Vec<Line> = menu
        .actions
        .iter()
        .enumerate()
        .map(|(n, action)| Line::from(format!("{} {}", n + 1, action.text)))
        .collect();
    let width = menu
        .actions
        .iter()
        .map(|a| a.text.chars().count() as u16 + 4)
        .max()
        .unwrap_or(0)
        .max(8);
    let height = lines.len() as u16 + 2;
    let column = u16::try_from(menu.position.x / cell_width).unwrap_or(0);
    let row = u16::try_from(menu.position.y / cell_height).unwrap_or(0);
    let x = column.min(area.width.saturating_sub(width));
    let y = row.min(area.height.saturating_sub(height));
    let popup = CellRect::new(x, y, width.min(area.width), height.min(area.height));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

/// Initialize and run the demo
///
/// Handles terminal setup, runs the event loop, and ensures cleanup on exit.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_demo(config: &ResolvedConfig, items: usize) -> Result<(), TuiError> {
    let mut app = DemoApp::start(config, items)?;

    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "demo_app_tests.rs"]
mod tests;
