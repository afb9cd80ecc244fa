pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Helvetica ascender in 1000-units, used to turn a line's top edge into a baseline.
pub(crate) const HELVETICA_ASCENT_1000: f32 = 718.0;

/// Size and spacing of one text style. Line height is constant for every line it measures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    pub font_size: f32,
    pub line_height_factor: f32,
}

impl FontMetrics {
    pub fn new(font_size: f32, line_height_factor: f32) -> Self {
        Self {
            font_size,
            line_height_factor,
        }
    }

    /// Same spacing, different size.
    pub fn with_size(self, font_size: f32) -> Self {
        Self { font_size, ..self }
    }

    /// Line pitch in millimetres.
    pub fn line_height(&self) -> f32 {
        self.font_size * self.line_height_factor * MM_PER_PT
    }

    /// Rendered width of `text` in millimetres. Characters the PDF text
    /// encoding drops take no space.
    pub fn text_width(&self, text: &str) -> f32 {
        let units: f32 = text.chars().map(char_width_1000).sum();
        units * self.font_size / 1000.0 * MM_PER_PT
    }
}

/// Width of a single character in 1000-units. Zero for characters with no WinAnsi code.
pub(crate) fn char_width_1000(ch: char) -> f32 {
    match char_to_winansi(ch) {
        0 => 0.0,
        byte => helvetica_width(byte),
    }
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi bytes 32..=255.
fn helvetica_width(b: u8) -> f32 {
    match b {
        32 => 278.0,                                 // space
        33..=47 => 333.0,                            // punctuation
        48..=57 => 556.0,                            // digits
        58..=64 => 333.0,                            // more punctuation
        73 | 74 => 278.0,                            // I J (narrow uppercase)
        77 => 833.0,                                 // M (wide)
        65..=90 => 667.0,                            // uppercase A-Z (average)
        91..=96 => 333.0,                            // brackets etc.
        102 | 105 | 106 | 108 | 116 => 278.0,        // narrow lowercase: f i j l t
        109 | 119 => 833.0,                          // m w (wide)
        97..=122 => 556.0,                           // lowercase a-z (average)
        0xC0..=0xD6 | 0xD8..=0xDE => 667.0,          // accented uppercase (Å Ä Ö ...)
        _ => 556.0,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for a PDF `Str`.
/// Characters with no WinAnsi code point are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}
