use std::path::PathBuf;

use serde::Serialize;

use crate::error::Error;
use crate::layout::TextAlign;
use crate::media::ResolvedMedia;

/// The document writer the album is drawn into.
///
/// Coordinates are millimetres from the top-left corner of the current page;
/// `y` is the top edge of the text line or image. A sink is owned by one
/// build at a time.
pub trait DocumentSink {
    fn new_page(&mut self);

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, align: TextAlign);

    /// Fails only if the sink cannot embed this particular image.
    fn draw_image(
        &mut self,
        media: &ResolvedMedia,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), Error>;

    /// Native file extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Finish the document as `{file_stem}.{extension}`. Failure here is fatal for the build.
    fn save(&mut self, file_stem: &str) -> Result<PathBuf, Error>;
}

/// One recorded sink call.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    NewPage,
    #[serde(rename_all = "camelCase")]
    Text {
        text: String,
        x: f32,
        y: f32,
        font_size: f32,
        align: TextAlign,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        mime_type: String,
        pixel_width: u32,
        pixel_height: u32,
    },
    #[serde(rename_all = "camelCase")]
    Saved { file_name: String },
}

/// Sink that keeps every draw call as a [`DrawOp`] instead of producing a file.
#[derive(Debug, Default)]
pub struct RecordingSink {
    ops: Vec<DrawOp>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Ops grouped per page, in page order. `NewPage` and `Saved` markers are left out.
    pub fn pages(&self) -> Vec<Vec<DrawOp>> {
        let mut pages: Vec<Vec<DrawOp>> = Vec::new();
        for op in &self.ops {
            match op {
                DrawOp::NewPage => pages.push(Vec::new()),
                DrawOp::Saved { .. } => {}
                other => {
                    if let Some(page) = pages.last_mut() {
                        page.push(other.clone());
                    }
                }
            }
        }
        pages
    }

    pub fn page_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::NewPage))
            .count()
    }

    pub fn saved_as(&self) -> Option<&str> {
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Saved { file_name } => Some(file_name.as_str()),
            _ => None,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.ops)
    }
}

impl DocumentSink for RecordingSink {
    fn new_page(&mut self) {
        self.ops.push(DrawOp::NewPage);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, align: TextAlign) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font_size,
            align,
        });
    }

    fn draw_image(
        &mut self,
        media: &ResolvedMedia,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), Error> {
        self.ops.push(DrawOp::Image {
            x,
            y,
            width,
            height,
            mime_type: media.mime_type.clone(),
            pixel_width: media.pixel_width,
            pixel_height: media.pixel_height,
        });
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn save(&mut self, file_stem: &str) -> Result<PathBuf, Error> {
        let file_name = format!("{file_stem}.{}", self.extension());
        self.ops.push(DrawOp::Saved {
            file_name: file_name.clone(),
        });
        Ok(PathBuf::from(file_name))
    }
}
