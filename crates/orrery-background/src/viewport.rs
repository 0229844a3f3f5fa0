//! Logical viewport size and device pixel ratio.

/// Logical width of one terminal cell.
pub const CELL_WIDTH_PX: f32 = 8.0;
/// Logical height of one terminal cell. Half-block rendering splits it in two.
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Upper bound on the device pixel ratio.
const MAX_PIXEL_RATIO: f32 = 2.0;
/// Lower bound, so a degenerate ratio can never zero the canvas out.
const MIN_PIXEL_RATIO: f32 = 1.0 / 64.0;

/// Viewport dimensions in logical pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Surface pixels per logical pixel.
    pub pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Viewport covering `cols × rows` terminal cells.
    ///
    /// Each cell maps to one pixel across and two pixels down.
    pub fn for_cells(cols: u16, rows: u16) -> Self {
        Self::new(
            cols as f32 * CELL_WIDTH_PX,
            rows as f32 * CELL_HEIGHT_PX,
            1.0 / CELL_WIDTH_PX,
        )
    }

    /// Clamped device pixel ratio.
    pub fn dpr(&self) -> f32 {
        if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio.clamp(MIN_PIXEL_RATIO, MAX_PIXEL_RATIO)
        } else {
            1.0
        }
    }

    /// Surface dimensions in device pixels.
    pub fn canvas_size(&self) -> (usize, usize) {
        let dpr = self.dpr();
        (
            (self.width.max(0.0) * dpr).floor() as usize,
            (self.height.max(0.0) * dpr).floor() as usize,
        )
    }

    /// Same viewport with a minimum logical height.
    pub fn with_min_height(self, min_height: f32) -> Self {
        Self {
            height: self.height.max(min_height),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_cells_maps_to_half_blocks() {
        let viewport = Viewport::for_cells(80, 24);
        assert_eq!(viewport.canvas_size(), (80, 48));
    }

    #[test]
    fn test_dpr_is_clamped() {
        assert_eq!(Viewport::new(10.0, 10.0, 3.0).dpr(), 2.0);
        assert_eq!(Viewport::new(10.0, 10.0, 0.0).dpr(), 1.0);
        assert_eq!(Viewport::new(10.0, 10.0, f32::NAN).dpr(), 1.0);
        assert_eq!(Viewport::new(100.5, 50.9, 2.0).canvas_size(), (201, 101));
    }

    #[test]
    fn test_min_height() {
        let viewport = Viewport::new(100.0, 48.0, 1.0).with_min_height(54.0);
        assert_eq!(viewport.height, 54.0);
    }
}
