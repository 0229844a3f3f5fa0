//! Vertical page layout: the hero followed by each content section.

use std::{borrow::Cow, collections::HashSet, ops::Range};

use orrery_core::{Rgb, SceneKey, palette};
use ratatui::{
    style::{Color, Style, Stylize},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use crate::content::{Entry, EntryId, Portfolio};

/// Widest the text column gets, leaving the right side to the planet.
const MAX_TEXT_WIDTH: u16 = 64;
/// Narrowest text column we lay out for.
const MIN_TEXT_WIDTH: u16 = 16;
/// Fewest blank lines below the hero block.
const HERO_PADDING: usize = 6;

/// Lines occupied by one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub key: SceneKey,
    pub lines: Range<usize>,
}

/// Lines occupied by one collapsible entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySpan {
    pub id: EntryId,
    pub lines: Range<usize>,
    pub expanded: bool,
}

/// The page flattened into styled lines.
#[derive(Debug, Default)]
pub struct PageLayout {
    lines: Vec<Line<'static>>,
    spans: Vec<SectionSpan>,
    entries: Vec<EntrySpan>,
}

impl PageLayout {
    /// Lay `portfolio` out for a content area `width` cells wide. The hero
    /// is padded to at least `view_height` lines so it fills the first screen.
    /// Entries in `expanded` show their details.
    pub fn build(
        portfolio: &Portfolio,
        width: u16,
        view_height: usize,
        expanded: &HashSet<EntryId>,
    ) -> Self {
        let width = width.clamp(MIN_TEXT_WIDTH, MAX_TEXT_WIDTH) as usize;
        let mut page = Self::default();

        let start = page.lines.len();
        page.blank(2);
        page.lines
            .push(Line::from(span(portfolio.name.clone(), palette::WHITE).bold()));
        for line in wrap(&portfolio.tagline, width) {
            page.lines.push(Line::from(span(line, palette::SILVER)));
        }
        let contact: Vec<&str> = [portfolio.location.as_str(), portfolio.email.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !contact.is_empty() {
            page.lines
                .push(Line::from(span(contact.join(" · "), palette::GRAY)));
        }
        if !portfolio.links.is_empty() {
            page.blank(1);
            for link in &portfolio.links {
                page.lines.push(Line::from(vec![
                    span(format!("{} ", link.label), palette::WHITE).bold(),
                    span(link.url.clone(), palette::GRAY),
                ]));
            }
        }
        let padding = view_height
            .saturating_sub(page.lines.len() - start)
            .max(HERO_PADDING);
        page.blank(padding);
        page.spans.push(SectionSpan {
            key: SceneKey::Hero,
            lines: start..page.lines.len(),
        });

        for section in &portfolio.sections {
            let start = page.lines.len();
            page.lines.push(Line::from(vec![
                span("▍ ", palette::RED),
                span(section.title.to_uppercase(), palette::WHITE).bold(),
            ]));
            if !section.subtitle.is_empty() {
                page.lines
                    .push(Line::from(span(section.subtitle.clone(), palette::GRAY)));
            }
            page.blank(1);
            for text in &section.lines {
                page.bullet(text, width);
            }
            if section.key == SceneKey::Contact {
                for link in &portfolio.links {
                    page.bullet(&format!("{}: {}", link.label, link.url), width);
                }
            }
            for (index, entry) in section.entries.iter().enumerate() {
                let id = EntryId {
                    section: section.key,
                    index,
                };
                page.entry(id, entry, width, expanded.contains(&id));
            }
            page.blank(2);
            page.spans.push(SectionSpan {
                key: section.key,
                lines: start..page.lines.len(),
            });
        }
        page
    }

    fn bullet(&mut self, text: &str, width: usize) {
        for (i, line) in wrap(text, width.saturating_sub(2)).into_iter().enumerate() {
            let lead = if i == 0 { "• " } else { "  " };
            self.lines.push(Line::from(vec![
                span(lead, palette::RED),
                span(line, palette::SILVER),
            ]));
        }
    }

    fn entry(&mut self, id: EntryId, entry: &Entry, width: usize, expanded: bool) {
        let start = self.lines.len();
        let marker = if expanded { "▾ " } else { "▸ " };
        self.lines.push(Line::from(vec![
            span(marker, palette::RED),
            span(entry.title.clone(), palette::WHITE).bold(),
        ]));
        let inner = width.saturating_sub(2);
        if !entry.subtitle.is_empty() {
            for line in wrap(&entry.subtitle, inner) {
                self.lines.push(Line::from(vec![
                    span("  ", palette::GRAY),
                    span(line, palette::GRAY),
                ]));
            }
        }
        if !entry.preview.is_empty() {
            for line in wrap(&entry.preview, inner) {
                self.lines.push(Line::from(vec![
                    span("  ", palette::SILVER),
                    span(line, palette::SILVER),
                ]));
            }
        }
        if expanded {
            let rule = format!("  {}", "─".repeat(inner.min(24)));
            self.lines.push(Line::from(span(rule, palette::RULE)));
            for text in &entry.details {
                for (i, line) in wrap(text, inner.saturating_sub(2)).into_iter().enumerate() {
                    let lead = if i == 0 { "  · " } else { "    " };
                    self.lines.push(Line::from(vec![
                        span(lead, palette::RED),
                        span(line, palette::SILVER),
                    ]));
                }
            }
        }
        self.blank(1);
        self.entries.push(EntrySpan {
            id,
            lines: start..self.lines.len(),
            expanded,
        });
    }

    fn blank(&mut self, n: usize) {
        self.lines.extend(std::iter::repeat_n(Line::default(), n));
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn spans(&self) -> &[SectionSpan] {
        &self.spans
    }

    pub fn entries(&self) -> &[EntrySpan] {
        &self.entries
    }

    /// The entry drawn on page line `line`, if any.
    pub fn entry_at(&self, line: usize) -> Option<EntryId> {
        self.entries
            .iter()
            .find(|e| e.lines.contains(&line))
            .map(|e| e.id)
    }

    /// First entry that starts at or after `line` and before `end`.
    pub fn entry_from(&self, line: usize, end: usize) -> Option<&EntrySpan> {
        self.entries
            .iter()
            .find(|e| e.lines.start >= line && e.lines.start < end)
    }

    /// First line of `key`'s section.
    pub fn section_start(&self, key: SceneKey) -> Option<usize> {
        self.spans
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.lines.start)
    }

    /// Lines visible when scrolled to `offset` in a view `height` lines tall.
    pub fn visible(&self, offset: usize, height: usize) -> &[Line<'static>] {
        let start = offset.min(self.lines.len());
        let end = (start + height).min(self.lines.len());
        &self.lines[start..end]
    }
}

fn span(text: impl Into<Cow<'static, str>>, color: Rgb) -> Span<'static> {
    Span::styled(text, Style::new().fg(Color::from(color)))
}

/// Greedy word wrap to `width` display columns.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;
    for word in text.split_whitespace() {
        let word_width = word.width();
        if line_width > 0 && line_width + 1 + word_width > width {
            out.push(std::mem::take(&mut line));
            line_width = 0;
        }
        if line_width > 0 {
            line.push(' ');
            line_width += 1;
        }
        line.push_str(word);
        line_width += word_width;
    }
    if !line.is_empty() || out.is_empty() {
        out.push(line);
    }
    out
}
