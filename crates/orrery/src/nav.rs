//! The sticky navigation bar across the top of the screen.

use orrery_core::{Rgb, SceneKey, palette};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

/// Rows taken by the bar: name, pills, rule.
pub const NAV_HEIGHT: u16 = 3;
/// How much the bar darkens the scene behind it.
pub const DIM: f32 = 0.3;

/// Background of the active pill: jet with a red wash.
const ACTIVE_BG: Rgb = Rgb::new(0x24, 0x13, 0x16);
const PILL_GAP: u16 = 1;
const LEFT_PAD: u16 = 2;
const NAME_MARKER: &str = "● ";

/// Darken every colored cell in `area` toward black by `amount`.
pub fn dim(buf: &mut Buffer, area: Rect, amount: f32) {
    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.bg = darken(cell.bg, amount);
                cell.fg = darken(cell.fg, amount);
            }
        }
    }
}

fn darken(color: Color, amount: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => Rgb::new(r, g, b).lerp(Rgb::BLACK, amount).into(),
        other => other,
    }
}

/// Text shown in a pill for the nav item at `index`.
fn pill_text(index: usize, key: SceneKey) -> String {
    format!(" {} {} ", (index + 1) % 10, key.label())
}

/// The bar's text layer. Rain and dimming are painted before it.
#[derive(Debug, Clone, Copy)]
pub struct NavBar<'a> {
    pub name: &'a str,
    pub active: SceneKey,
}

impl NavBar<'_> {
    /// Where each pill lands inside `area`. Pills that do not fit are dropped.
    pub fn pills(area: Rect) -> Vec<(SceneKey, Rect)> {
        let mut x = area.x + LEFT_PAD;
        let y = area.y + 1;
        let mut out = Vec::new();
        for (index, key) in SceneKey::NAV.into_iter().enumerate() {
            let width = pill_text(index, key).width() as u16;
            if x + width > area.right() || area.height < 2 {
                break;
            }
            out.push((key, Rect::new(x, y, width, 1)));
            x += width + PILL_GAP;
        }
        out
    }

    /// The marker and name on the first row. Clicking it goes home.
    pub fn name_rect(&self, area: Rect) -> Rect {
        let width = (NAME_MARKER.width() + self.name.width()) as u16;
        let x = area.x + LEFT_PAD;
        Rect::new(x, area.y, width, 1).intersection(area)
    }

    /// The nav item under terminal cell (`col`, `row`).
    pub fn hit(&self, area: Rect, col: u16, row: u16) -> Option<SceneKey> {
        let pos = (col, row).into();
        if self.name_rect(area).contains(pos) {
            return Some(SceneKey::Hero);
        }
        Self::pills(area)
            .into_iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(key, _)| key)
    }
}

impl Widget for NavBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }
        let name = Line::from(vec![
            Span::styled(NAME_MARKER, Style::new().fg(Color::from(palette::RED))),
            self.name.to_string().bold().fg(Color::from(palette::WHITE)),
        ]);
        buf.set_line(area.x + LEFT_PAD, area.y, &name, area.width.saturating_sub(LEFT_PAD));

        for (index, (key, rect)) in Self::pills(area).into_iter().enumerate() {
            let style = if key == self.active {
                Style::new()
                    .fg(Color::from(palette::WHITE))
                    .bg(Color::from(ACTIVE_BG))
                    .bold()
            } else {
                Style::new().fg(Color::from(palette::SILVER))
            };
            buf.set_string(rect.x, rect.y, pill_text(index, key), style);
        }

        if area.height >= NAV_HEIGHT {
            let rule = "─".repeat(area.width as usize);
            let style = Style::new().fg(Color::from(palette::RULE));
            buf.set_string(area.x, area.y + 2, rule, style);
        }
    }
}
