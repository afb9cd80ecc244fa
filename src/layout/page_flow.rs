use crate::fonts::FontMetrics;
use crate::layout::{Geometry, TextAlign};
use crate::sink::DocumentSink;

/// True when a line of `line_height` starting at `cursor_y` would cross the bottom margin.
pub fn needs_break(cursor_y: f32, line_height: f32, page_height: f32, bottom_margin: f32) -> bool {
    cursor_y + line_height > page_height - bottom_margin
}

/// Write position on the current page. Replaced, never reused, when a page starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageCursor {
    /// Distance from the top of the page to the next free line.
    pub y_position: f32,
    pub page_has_content: bool,
}

impl PageCursor {
    fn at_top(geometry: &Geometry) -> Self {
        Self {
            y_position: geometry.margin,
            page_has_content: false,
        }
    }
}

/// One line on its way to the sink.
#[derive(Clone, Debug, PartialEq)]
pub struct LineBlock {
    pub text: String,
    pub is_continuation_header: bool,
}

impl LineBlock {
    pub fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_continuation_header: false,
        }
    }

    pub fn continuation(label: &str) -> Self {
        Self {
            text: format!("(Fortsättning för: {label})"),
            is_continuation_header: true,
        }
    }
}

/// Sole owner of the vertical write position. Breaks are decided before a
/// line is drawn, so nothing lands below the bottom margin.
pub struct PageFlow<'g> {
    geometry: &'g Geometry,
    cursor: PageCursor,
    pages_started: usize,
}

impl<'g> PageFlow<'g> {
    /// Ask the sink for a new page and put a fresh cursor at its top margin.
    pub fn begin_page<S: DocumentSink + ?Sized>(geometry: &'g Geometry, sink: &mut S) -> Self {
        sink.new_page();
        Self {
            geometry,
            cursor: PageCursor::at_top(geometry),
            pages_started: 1,
        }
    }

    pub fn y(&self) -> f32 {
        self.cursor.y_position
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Pages started by this flow, including the first.
    pub fn pages_started(&self) -> usize {
        self.pages_started
    }

    pub fn advance(&mut self, dy: f32) {
        self.cursor.y_position += dy;
    }

    /// Claim `height` of vertical space at the cursor and return where it starts.
    pub fn reserve(&mut self, height: f32) -> f32 {
        let top = self.cursor.y_position;
        self.cursor.y_position += height;
        self.cursor.page_has_content = true;
        top
    }

    pub fn has_room(&self, line_height: f32) -> bool {
        !needs_break(
            self.cursor.y_position,
            line_height,
            self.geometry.page_height,
            self.geometry.margin,
        )
    }

    /// Break to a new page (no header) if one line of `line_height` no longer fits.
    pub fn ensure_room<S: DocumentSink + ?Sized>(&mut self, sink: &mut S, line_height: f32) -> bool {
        if self.has_room(line_height) {
            return false;
        }
        self.break_page(sink);
        true
    }

    /// Draw one line at the cursor and move past it. The caller decides about room.
    pub fn draw_line<S: DocumentSink + ?Sized>(
        &mut self,
        sink: &mut S,
        block: &LineBlock,
        metrics: &FontMetrics,
    ) {
        sink.draw_text(
            &block.text,
            self.geometry.margin,
            self.cursor.y_position,
            metrics.font_size,
            TextAlign::Left,
        );
        self.cursor.y_position += metrics.line_height();
        self.cursor.page_has_content = true;
    }

    /// Flow wrapped `lines` of one item's text, breaking pages as needed.
    /// `label` names the item in continuation headers.
    pub fn flow<S: DocumentSink + ?Sized>(
        &mut self,
        sink: &mut S,
        lines: &[String],
        metrics: &FontMetrics,
        label: &str,
    ) {
        let line_height = metrics.line_height();
        for line in lines {
            if !self.has_room(line_height) {
                self.break_page(sink);
                self.emit_continuation_header(sink, label);
                // A paragraph gap has nothing to separate right under the header.
                if line.is_empty() {
                    continue;
                }
            }
            self.draw_line(sink, &LineBlock::body(line.as_str()), metrics);
        }
    }

    fn emit_continuation_header<S: DocumentSink + ?Sized>(&mut self, sink: &mut S, label: &str) {
        let header = LineBlock::continuation(label);
        sink.draw_text(
            &header.text,
            self.geometry.margin,
            self.cursor.y_position,
            self.geometry.continuation_font_size(),
            TextAlign::Left,
        );
        self.cursor.y_position += self.geometry.continuation_allowance;
        self.cursor.page_has_content = true;
    }

    fn break_page<S: DocumentSink + ?Sized>(&mut self, sink: &mut S) {
        log::debug!(
            "page break at y={:.1}mm (page had content: {})",
            self.cursor.y_position,
            self.cursor.page_has_content
        );
        sink.new_page();
        self.cursor = PageCursor::at_top(self.geometry);
        self.pages_started += 1;
    }
}
