//! Decides which section is active from the scroll position.
//!
//! A section activates when it starts overlapping a thin band 40% to 45%
//! down the content view. Leaving the band changes nothing.

use std::{collections::HashSet, ops::Range};

use orrery_core::SceneKey;

use crate::page::SectionSpan;

/// Fraction of the view height cut from the top of the band.
const TOP_MARGIN: f32 = 0.40;
/// Fraction of the view height cut from the bottom of the band.
const BOTTOM_MARGIN: f32 = 0.55;

#[derive(Debug, Default)]
pub struct ScrollSpy {
    sections: Vec<SectionSpan>,
    intersecting: HashSet<SceneKey>,
}

impl ScrollSpy {
    pub fn new(spans: &[SectionSpan]) -> Self {
        let mut spy = Self::default();
        spy.set_sections(spans);
        spy
    }

    /// Observe a new set of sections. The hero is never observed.
    pub fn set_sections(&mut self, spans: &[SectionSpan]) {
        self.sections = spans
            .iter()
            .filter(|s| s.key != SceneKey::Hero)
            .cloned()
            .collect();
        self.intersecting.clear();
    }

    /// Swap in moved sections without forgetting which ones are already in
    /// the band, so a layout change alone raises no new edge.
    pub fn relayout(&mut self, spans: &[SectionSpan]) {
        let intersecting = std::mem::take(&mut self.intersecting);
        self.set_sections(spans);
        self.intersecting = intersecting
            .into_iter()
            .filter(|key| self.sections.iter().any(|s| s.key == *key))
            .collect();
    }

    /// Band of page lines watched when scrolled to `offset` in a view `height` lines tall.
    pub fn band(offset: usize, height: usize) -> Range<usize> {
        let top = (height as f32 * TOP_MARGIN).round() as usize;
        let bottom = (height as f32 * BOTTOM_MARGIN).round() as usize;
        let start = offset + top;
        let end = (offset + height.saturating_sub(bottom)).max(start + 1);
        start..end
    }

    /// Recompute intersections. Returns the section that most recently
    /// entered the band, if any did.
    pub fn update(&mut self, offset: usize, height: usize) -> Option<SceneKey> {
        let band = Self::band(offset, height);
        let mut entered = None;
        for span in &self.sections {
            let hit = span.lines.start < band.end && band.start < span.lines.end;
            if hit {
                if self.intersecting.insert(span.key) {
                    entered = Some(span.key);
                }
            } else {
                self.intersecting.remove(&span.key);
            }
        }
        entered
    }
}
