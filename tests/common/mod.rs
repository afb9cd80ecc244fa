#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;

use fotoalbum_pdf::{
    DocumentSink, DrawOp, Error, FetchedBody, Fetcher, MediaError, RecordingSink, ResolvedMedia,
    TextAlign,
};

/// In-memory fetcher: canned responses per URI, every request logged in call order.
/// Unknown URIs fail like an unreachable host.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, FetchedBody>,
    pub requests: RefCell<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, uri: &str, status: u16, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        self.responses.insert(
            uri.to_string(),
            FetchedBody {
                status,
                content_type: content_type.map(str::to_string),
                bytes,
            },
        );
        self
    }

    pub fn not_found(self, uri: &str) -> Self {
        self.respond(uri, 404, Some("text/html"), Vec::new())
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, uri: &str) -> Result<FetchedBody, MediaError> {
        self.requests.borrow_mut().push(uri.to_string());
        self.responses
            .get(uri)
            .cloned()
            .ok_or_else(|| MediaError::FetchFailed(format!("connection refused: {uri}")))
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode png");
    buf
}

pub fn transparent_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |_, _| image::Rgba([255, 0, 0, 128]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode png");
    buf
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |_, _| image::Rgb([0, 128, 255]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    buf
}

/// (text, y, font_size) of every text op on a page.
pub fn texts(page: &[DrawOp]) -> Vec<(String, f32, f32)> {
    page.iter()
        .filter_map(|op| match op {
            DrawOp::Text {
                text, y, font_size, ..
            } => Some((text.clone(), *y, *font_size)),
            _ => None,
        })
        .collect()
}

pub fn image_count(page: &[DrawOp]) -> usize {
    page.iter()
        .filter(|op| matches!(op, DrawOp::Image { .. }))
        .count()
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

/// Records like [`RecordingSink`] but refuses every image.
#[derive(Default)]
pub struct ImageRejectingSink {
    pub inner: RecordingSink,
}

impl DocumentSink for ImageRejectingSink {
    fn new_page(&mut self) {
        self.inner.new_page();
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, align: TextAlign) {
        self.inner.draw_text(text, x, y, font_size, align);
    }

    fn draw_image(&mut self, media: &ResolvedMedia, _: f32, _: f32, _: f32, _: f32) -> Result<(), Error> {
        Err(Error::Image(format!("cannot embed {}", media.mime_type)))
    }

    fn extension(&self) -> &'static str {
        self.inner.extension()
    }

    fn save(&mut self, file_stem: &str) -> Result<PathBuf, Error> {
        self.inner.save(file_stem)
    }
}

/// Records like [`RecordingSink`] but cannot be saved.
#[derive(Default)]
pub struct UnsavableSink {
    pub inner: RecordingSink,
}

impl DocumentSink for UnsavableSink {
    fn new_page(&mut self) {
        self.inner.new_page();
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, align: TextAlign) {
        self.inner.draw_text(text, x, y, font_size, align);
    }

    fn draw_image(&mut self, media: &ResolvedMedia, x: f32, y: f32, w: f32, h: f32) -> Result<(), Error> {
        self.inner.draw_image(media, x, y, w, h)
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn save(&mut self, _file_stem: &str) -> Result<PathBuf, Error> {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only volume",
        )))
    }
}
