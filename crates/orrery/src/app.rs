//! The application state and event loop.

use std::{
    collections::HashSet,
    time::{Duration, Instant},
};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use orrery_background::{BackgroundOptions, BackgroundState};
use orrery_core::SceneKey;
use ratatui::{
    DefaultTerminal, Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::{
    content::{EntryId, Portfolio},
    nav::{self, NAV_HEIGHT, NavBar},
    page::{EntrySpan, PageLayout},
    scroll_spy::ScrollSpy,
};

/// Lines moved per wheel notch.
const WHEEL_STEP: usize = 3;
/// Left margin of the text column.
const TEXT_MARGIN: u16 = 4;

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    portfolio: Portfolio,
    /// Entries showing their details.
    expanded: HashSet<EntryId>,
    layout: PageLayout,
    spy: ScrollSpy,
    /// First page line shown at the top of the content area.
    scroll: usize,
    /// Section highlighted in the nav bar and shown by the backdrop.
    active: SceneKey,
    background: BackgroundState,
    /// Last known terminal area.
    size: Rect,
}

/// Split the screen into nav bar, content and help line.
fn areas(size: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(NAV_HEIGHT),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(size)
}

fn text_width(content: Rect) -> u16 {
    content.width.saturating_sub(TEXT_MARGIN * 2)
}

impl App {
    /// Construct a new instance of [`App`] for a terminal of `size`.
    pub fn new(portfolio: Portfolio, options: BackgroundOptions, size: Rect) -> Self {
        let initial: SceneKey = options.initial_scene.parse().unwrap_or_default();
        let [nav_area, content, _] = areas(size);
        let expanded = portfolio.initially_open();
        let layout = PageLayout::build(
            &portfolio,
            text_width(content),
            content.height as usize,
            &expanded,
        );
        let spy = ScrollSpy::new(layout.spans());
        let background = BackgroundState::new(options, size, nav_area);
        let mut app = Self {
            running: false,
            portfolio,
            expanded,
            layout,
            spy,
            scroll: 0,
            active: SceneKey::Hero,
            background,
            size,
        };
        app.spy.update(0, content.height as usize);
        app.jump_to(initial);
        app
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            self.background.advance(Instant::now());
            terminal.draw(|frame| self.render(frame))?;
            let timeout = self.background.until_next_frame(Instant::now());
            self.handle_crossterm_events(timeout)?;
        }
        self.background.teardown();
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.draw(area, frame.buffer_mut());
    }

    /// Paint every layer into `buf`, back to front.
    pub fn draw(&self, area: Rect, buf: &mut Buffer) {
        let [nav_area, content, help_area] = areas(area);
        self.background.render_background(buf, area);

        let text_area = Rect {
            x: content.x + TEXT_MARGIN,
            width: text_width(content),
            ..content
        };
        let lines = self.layout.visible(self.scroll, content.height as usize);
        Paragraph::new(lines.to_vec()).render(text_area, buf);
        if let Some(focused) = self.focused_entry() {
            let header = focused.lines.start;
            if let Some(line) = header.checked_sub(self.scroll).and_then(|i| lines.get(i)) {
                let row = content.y + (header - self.scroll) as u16;
                let width = (line.width() as u16).min(text_area.width);
                let underline = Rect::new(text_area.x, row, width, 1).intersection(buf.area);
                buf.set_style(underline, Style::new().underlined());
            }
        }

        nav::dim(buf, nav_area, nav::DIM);
        self.background.render_rain(buf, nav_area);
        self.nav_bar().render(nav_area, buf);

        let help = Line::from(vec![
            "q".bold().red(),
            " quit  ".dark_gray(),
            "j/k".bold().red(),
            " scroll  ".dark_gray(),
            "1-0".bold().red(),
            " jump  ".dark_gray(),
            "tab".bold().red(),
            " next  ".dark_gray(),
            "enter".bold().red(),
            " open  ".dark_gray(),
            "s".bold().red(),
            format!(" speed: {}  ", self.background.speed().name()).dark_gray(),
            "h".bold().red(),
            " home".dark_gray(),
        ])
        .centered();
        help.render(help_area, buf);

        self.background.render_halo(buf, area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most `timeout` so the next frame is not late.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(width, height) => self.resize(Rect::new(0, 0, width, height)),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.scroll_by(1),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.scroll_by(-1),
            (_, KeyCode::PageDown | KeyCode::Char(' ')) => self.scroll_by(self.page_step()),
            (_, KeyCode::PageUp) => self.scroll_by(-self.page_step()),
            (_, KeyCode::Home | KeyCode::Char('h')) => self.jump_to(SceneKey::Hero),
            (_, KeyCode::End | KeyCode::Char('G')) => self.scroll_to(self.max_scroll()),
            (_, KeyCode::Tab) => self.cycle(1),
            (_, KeyCode::BackTab) => self.cycle(-1),
            (_, KeyCode::Enter) => {
                if let Some(id) = self.focused_entry().map(|e| e.id) {
                    self.toggle(id);
                }
            }
            (_, KeyCode::Char('s')) => {
                let speed = self.background.speed().next();
                self.background.set_speed(speed);
            }
            (_, KeyCode::Char(c @ '0'..='9')) => {
                let index = (c as usize - '0' as usize + 9) % 10;
                if let Some(key) = SceneKey::NAV.get(index) {
                    self.jump_to(*key);
                }
            }
            _ => {}
        }
    }

    /// Handles wheel, pointer motion and clicks on the nav bar or an entry.
    pub fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_STEP as isize),
            MouseEventKind::ScrollUp => self.scroll_by(-(WHEEL_STEP as isize)),
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.background.pointer_move(mouse.column, mouse.row);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let [nav_area, content, _] = areas(self.size);
                if let Some(key) = self.nav_bar().hit(nav_area, mouse.column, mouse.row) {
                    self.jump_to(key);
                } else if content.contains((mouse.column, mouse.row).into()) {
                    let line = self.scroll + (mouse.row - content.y) as usize;
                    if let Some(id) = self.layout.entry_at(line) {
                        self.toggle(id);
                    }
                }
                self.background.pointer_move(mouse.column, mouse.row);
            }
            _ => {}
        }
    }

    /// Adapt the layout and every animation to a new terminal size.
    pub fn resize(&mut self, size: Rect) {
        if size == self.size {
            return;
        }
        log::debug!("terminal resized to {}x{}", size.width, size.height);
        let [nav_area, content, _] = areas(size);
        self.size = size;
        self.background.resize(size, nav_area);
        self.rebuild_layout(content);
        self.spy.set_sections(self.layout.spans());
        // Section offsets moved, so keep the active one in view.
        self.jump_to(self.active);
    }

    fn rebuild_layout(&mut self, content: Rect) {
        self.layout = PageLayout::build(
            &self.portfolio,
            text_width(content),
            content.height as usize,
            &self.expanded,
        );
    }

    fn nav_bar(&self) -> NavBar<'_> {
        NavBar {
            name: &self.portfolio.name,
            active: self.active,
        }
    }

    /// The entry Enter acts on: the one under the spy band, else the first
    /// one starting below it, else the first one in view.
    fn focused_entry(&self) -> Option<&EntrySpan> {
        let height = self.content_height();
        let band = ScrollSpy::band(self.scroll, height);
        let end = self.scroll + height;
        self.layout
            .entries()
            .iter()
            .find(|e| e.lines.contains(&band.start))
            .or_else(|| self.layout.entry_from(band.start, end))
            .or_else(|| self.layout.entry_from(self.scroll, end))
    }

    /// Open or close an entry. Later sections move, but the scroll offset
    /// and the active section stay put.
    fn toggle(&mut self, id: EntryId) {
        let open = !self.expanded.remove(&id);
        if open {
            self.expanded.insert(id);
        }
        log::debug!("entry {} #{} {}", id.section, id.index, if open { "opened" } else { "closed" });
        self.rebuild_layout(areas(self.size)[1]);
        self.spy.relayout(self.layout.spans());
        self.scroll_to(self.scroll);
    }

    fn content_height(&self) -> usize {
        areas(self.size)[1].height as usize
    }

    fn page_step(&self) -> isize {
        (self.content_height() as isize - 2).max(1)
    }

    /// Furthest scroll at which the last line still reaches the spy band.
    fn max_scroll(&self) -> usize {
        let band = ScrollSpy::band(0, self.content_height());
        self.layout.len().saturating_sub(band.start + 1)
    }

    fn scroll_by(&mut self, delta: isize) {
        self.scroll_to(self.scroll.saturating_add_signed(delta));
    }

    /// Scroll to `offset` and let the scroll-spy pick the active section.
    fn scroll_to(&mut self, offset: usize) {
        self.scroll = offset.min(self.max_scroll());
        if let Some(key) = self.spy.update(self.scroll, self.content_height()) {
            self.activate(key);
        }
    }

    /// Select `key` and bring its section up to the spy band. The chosen
    /// section wins over whatever the spy sees on arrival.
    fn jump_to(&mut self, key: SceneKey) {
        let top = ScrollSpy::band(0, self.content_height()).start;
        let offset = match key {
            SceneKey::Hero => 0,
            _ => self
                .layout
                .section_start(key)
                .map_or(self.scroll, |start| start.saturating_sub(top)),
        };
        self.scroll = offset.min(self.max_scroll());
        self.spy.update(self.scroll, self.content_height());
        self.activate(key);
    }

    /// Move to the next (`1`) or previous (`-1`) nav item.
    fn cycle(&mut self, step: isize) {
        let len = SceneKey::NAV.len() as isize;
        let next = match SceneKey::NAV.iter().position(|k| *k == self.active) {
            Some(i) => (i as isize + step).rem_euclid(len),
            None if step > 0 => 0,
            None => len - 1,
        };
        self.jump_to(SceneKey::NAV[next as usize]);
    }

    fn activate(&mut self, key: SceneKey) {
        if key != self.active {
            log::debug!("active section {} -> {}", self.active, key);
            self.active = key;
            self.background.set_active_scene(key.as_str());
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn app() -> App {
        let options = BackgroundOptions {
            seed: Some(3),
            star_count: 30,
            ..Default::default()
        };
        App::new(Portfolio::sample(), options, Rect::new(0, 0, 100, 30))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key_event(KeyEvent::from(code));
    }

    #[test]
    fn test_starts_on_hero() {
        let app = app();
        assert_eq!(app.active, SceneKey::Hero);
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = app();
            app.running = true;
            press(&mut app, code);
            assert!(!app.running);
        }
        let mut app = app();
        app.running = true;
        app.on_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_number_keys_jump() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.active, SceneKey::Skills);
        assert!(app.scroll > 0);
        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.active, SceneKey::Contact);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.active, SceneKey::Hero);
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_tab_cycles() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active, SceneKey::About);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active, SceneKey::Contact);
    }

    #[test]
    fn test_scrolling_activates_sections() {
        let mut app = app();
        for _ in 0..200 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.scroll, app.max_scroll());
        assert_eq!(app.active, SceneKey::Contact);

        // Scrolling back to the top leaves the last entered section active.
        for _ in 0..200 {
            press(&mut app, KeyCode::Char('k'));
        }
        assert_eq!(app.scroll, 0);
        assert_eq!(app.active, SceneKey::Contact);
    }

    #[test]
    fn test_wheel_scrolls() {
        let mut app = app();
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 10,
            row: 10,
            modifiers: KeyModifiers::NONE,
        };
        app.on_mouse_event(wheel);
        assert_eq!(app.scroll, WHEEL_STEP);
    }

    #[test]
    fn test_click_on_pill() {
        let mut app = app();
        let [nav_area, _, _] = areas(app.size);
        let (key, rect) = NavBar::pills(nav_area)[2];
        app.on_mouse_event(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rect.x,
            row: rect.y,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.active, key);
    }

    #[test]
    fn test_click_on_name_goes_home() {
        let mut app = app();
        press(&mut app, KeyCode::Char('5'));
        assert!(app.scroll > 0);
        let [nav_area, _, _] = areas(app.size);
        let name = app.nav_bar().name_rect(nav_area);
        app.on_mouse_event(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: name.x + 1,
            row: name.y,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.active, SceneKey::Hero);
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_enter_toggles_focused_entry() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active, SceneKey::Featured);
        let scroll = app.scroll;
        let before = app.layout.len();
        let first = EntryId {
            section: SceneKey::Featured,
            index: 0,
        };
        assert_eq!(app.focused_entry().map(|e| e.id), Some(first));

        press(&mut app, KeyCode::Enter);
        assert!(app.expanded.contains(&first));
        assert_eq!(app.layout.len(), before + 3);
        assert_eq!(app.active, SceneKey::Featured);
        assert_eq!(app.scroll, scroll);

        press(&mut app, KeyCode::Enter);
        assert!(app.expanded.is_empty());
        assert_eq!(app.layout.len(), before);
        assert_eq!(app.active, SceneKey::Featured);
    }

    #[test]
    fn test_click_toggles_entry() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        let [_, content, _] = areas(app.size);
        let entry = app.layout.entries()[0].clone();
        assert!(!entry.expanded);
        let row = content.y + (entry.lines.start - app.scroll) as u16;
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: content.x + TEXT_MARGIN,
            row,
            modifiers: KeyModifiers::NONE,
        };
        app.on_mouse_event(click);
        assert!(app.expanded.contains(&entry.id));
        assert!(app.layout.entries()[0].expanded);
        app.on_mouse_event(click);
        assert!(!app.expanded.contains(&entry.id));
    }

    #[test]
    fn test_speed_key_cycles() {
        let mut app = app();
        let start = app.background.speed();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.background.speed(), start.next());
    }

    #[test]
    fn test_resize_keeps_active() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        app.resize(Rect::new(0, 0, 50, 20));
        assert_eq!(app.active, SceneKey::Featured);
        assert!(app.scroll <= app.max_scroll());
    }

    #[test]
    fn test_render_shows_name_and_help() {
        let mut app = app();
        app.background.advance(Instant::now());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buf = terminal.backend().buffer();
        let row = |y: u16| -> String {
            (0..buf.area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(0).contains("Your Name"));
        assert!(row(29).contains("quit"));
        assert!((3..29).any(|y| row(y).contains("Your Name")));
    }
}
