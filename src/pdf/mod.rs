mod images;

use std::path::{Path, PathBuf};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::fonts::{FontMetrics, HELVETICA_ASCENT_1000, to_winansi_bytes};
use crate::layout::{Geometry, TextAlign};
use crate::media::ResolvedMedia;
use crate::sink::DocumentSink;

use images::embed_image;

const PT_PER_MM: f32 = 72.0 / 25.4;
const BODY_FONT: &[u8] = b"F1";

struct PageContent {
    content: Content,
    /// Indices into `PdfSink::images` drawn on this page.
    images: Vec<usize>,
}

/// [`DocumentSink`] that writes a PDF with `pdf-writer`.
///
/// Images are embedded as they are drawn; page objects are written on `save`
/// once the page count is known.
pub struct PdfSink {
    output_dir: PathBuf,
    title: String,
    page_width_pt: f32,
    page_height_pt: f32,
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    pages_id: Ref,
    font_ref: Ref,
    pages: Vec<PageContent>,
    images: Vec<(String, Ref)>,
    saved: bool,
}

impl PdfSink {
    pub fn new(output_dir: impl Into<PathBuf>, geometry: &Geometry) -> Self {
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_ref = Ref::new(3);
        let mut pdf = Pdf::new();
        pdf.type1_font(font_ref)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        Self {
            output_dir: output_dir.into(),
            title: String::new(),
            page_width_pt: geometry.page_width * PT_PER_MM,
            page_height_pt: geometry.page_height * PT_PER_MM,
            pdf,
            next_id: 4,
            catalog_id,
            pages_id,
            font_ref,
            pages: Vec::new(),
            images: Vec::new(),
            saved: false,
        }
    }

    /// Document title written to the info dictionary.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    fn current_page(&mut self) -> &mut PageContent {
        if self.pages.is_empty() {
            self.new_page();
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Serialize the whole document. Consumes the pages drawn so far.
    pub fn finish(&mut self) -> Result<Vec<u8>, Error> {
        if self.saved {
            return Err(Error::Pdf("document already finished".into()));
        }
        self.saved = true;

        let pages = std::mem::take(&mut self.pages);
        let n = pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();
        let info_id = self.alloc();

        let mut page_images: Vec<Vec<usize>> = Vec::with_capacity(n);
        for (i, page) in pages.into_iter().enumerate() {
            let raw = page.content.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            self.pdf
                .stream(content_ids[i], &compressed)
                .filter(Filter::FlateDecode);
            page_images.push(page.images);
        }

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.pdf
            .pages(self.pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        for i in 0..n {
            let mut page = self.pdf.page(page_ids[i]);
            page.media_box(Rect::new(0.0, 0.0, self.page_width_pt, self.page_height_pt))
                .parent(self.pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            resources.fonts().pair(Name(BODY_FONT), self.font_ref);
            if !page_images[i].is_empty() {
                let mut xobjects = resources.x_objects();
                for &idx in &page_images[i] {
                    let (name, xobj_ref) = &self.images[idx];
                    xobjects.pair(Name(name.as_bytes()), *xobj_ref);
                }
            }
        }

        let mut info = self.pdf.document_info(info_id);
        if !self.title.is_empty() {
            info.title(TextStr(&self.title));
        }
        info.producer(TextStr(concat!("fotoalbum-pdf ", env!("CARGO_PKG_VERSION"))));
        drop(info);

        let pdf = std::mem::replace(&mut self.pdf, Pdf::new());
        Ok(pdf.finish())
    }

    fn write_file(path: &Path, bytes: &[u8]) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl DocumentSink for PdfSink {
    fn new_page(&mut self) {
        self.pages.push(PageContent {
            content: Content::new(),
            images: Vec::new(),
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, align: TextAlign) {
        let bytes = to_winansi_bytes(text);
        if bytes.is_empty() {
            return;
        }
        let width_mm = FontMetrics::new(font_size, 1.0).text_width(text);
        let left_mm = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - width_mm / 2.0,
        };
        let baseline_pt = y * PT_PER_MM + font_size * HELVETICA_ASCENT_1000 / 1000.0;
        let page_height_pt = self.page_height_pt;

        let content = &mut self.current_page().content;
        content.begin_text();
        content.set_font(Name(BODY_FONT), font_size);
        content.next_line(left_mm * PT_PER_MM, page_height_pt - baseline_pt);
        content.show(Str(&bytes));
        content.end_text();
    }

    fn draw_image(
        &mut self,
        media: &ResolvedMedia,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), Error> {
        let xobj_ref = self.alloc();
        let mut next_id = self.next_id;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };
        embed_image(&mut self.pdf, xobj_ref, media, &mut alloc)?;
        self.next_id = next_id;

        let pdf_name = format!("Im{}", self.images.len() + 1);
        self.images.push((pdf_name.clone(), xobj_ref));
        let idx = self.images.len() - 1;

        let (w_pt, h_pt) = (width * PT_PER_MM, height * PT_PER_MM);
        let bottom_pt = self.page_height_pt - (y + height) * PT_PER_MM;
        let page = self.current_page();
        page.images.push(idx);
        page.content.save_state();
        page.content
            .transform([w_pt, 0.0, 0.0, h_pt, x * PT_PER_MM, bottom_pt]);
        page.content.x_object(Name(pdf_name.as_bytes()));
        page.content.restore_state();
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn save(&mut self, file_stem: &str) -> Result<PathBuf, Error> {
        let bytes = self.finish()?;
        let path = self
            .output_dir
            .join(format!("{file_stem}.{}", self.extension()));
        Self::write_file(&path, &bytes)?;
        log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
