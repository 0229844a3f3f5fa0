//! Character constants for background animations.

/// Glyphs dropped by the navigation rain.
pub const RAIN_CHARS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H',
    'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Upper half block: foreground paints the top pixel, background the bottom.
pub const HALF_BLOCK: &str = "▀";
