pub mod page_flow;
pub mod placement;
pub mod text_flow;

use crate::fonts::FontMetrics;

pub use page_flow::{LineBlock, PageCursor, PageFlow, needs_break};
pub use placement::{Placement, place};
pub use text_flow::flow;

/// Fixed portrait sheet and the sizes every album page is laid out with.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub page_width: f32,
    pub page_height: f32,
    /// Outer margin on all four sides.
    pub margin: f32,
    /// Tallest an image may be, as a fraction of the page height.
    pub image_max_height_ratio: f32,
    pub heading_font_size: f32,
    /// Added to the heading size for the cover title.
    pub title_size_offset: f32,
    pub subtitle_font_size: f32,
    pub body_font_size: f32,
    /// Continuation headers are this much smaller than body text.
    pub continuation_size_reduction: f32,
    /// Vertical space reserved for a continuation header.
    pub continuation_allowance: f32,
    /// Gap between an image's bottom edge and the first text line.
    pub image_text_gap: f32,
    pub line_height_factor: f32,
    pub cover_title_y: f32,
    pub cover_subtitle_offset: f32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 15.0,
            image_max_height_ratio: 0.6,
            heading_font_size: 16.0,
            title_size_offset: 8.0,
            subtitle_font_size: 16.0,
            body_font_size: 12.0,
            continuation_size_reduction: 2.0,
            continuation_allowance: 7.0,
            image_text_gap: 10.0,
            line_height_factor: 1.15,
            cover_title_y: 120.0,
            cover_subtitle_offset: 12.0,
        }
    }
}

impl Geometry {
    /// Usable column width between the side margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn image_max_height(&self) -> f32 {
        self.page_height * self.image_max_height_ratio
    }

    /// Nothing may extend below this line.
    pub fn bottom_limit(&self) -> f32 {
        self.page_height - self.margin
    }

    pub fn title_font_size(&self) -> f32 {
        self.heading_font_size + self.title_size_offset
    }

    pub fn continuation_font_size(&self) -> f32 {
        self.body_font_size - self.continuation_size_reduction
    }

    pub fn body_metrics(&self) -> FontMetrics {
        FontMetrics::new(self.body_font_size, self.line_height_factor)
    }
}

/// Horizontal anchoring of a text run relative to its `x` coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TextAlign {
    Left,
    Center,
}
