use std::path::PathBuf;

use crate::config::AlbumConfig;
use crate::error::{Error, MediaError, item_failure_line};
use crate::layout::{LineBlock, PageFlow, Placement, TextAlign, flow, place};
use crate::media::{Fetcher, MediaResolver, ResolvedMedia};
use crate::model::{AlbumItem, AlbumProject};
use crate::sink::DocumentSink;

/// Summary of a finished build.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildReport {
    /// Whatever the sink reported from `save`.
    pub file: PathBuf,
    /// All pages, cover included.
    pub pages: usize,
    pub items: usize,
    /// Items rendered with a placeholder instead of (or after) their image.
    pub degraded_items: usize,
}

struct ItemOutcome {
    pages: usize,
    degraded: bool,
}

/// Cover page, then one page per item in input order. A failing item degrades
/// to a placeholder line; only the sink's save failure ends the build early.
pub struct AlbumBuilder<'a, F> {
    config: &'a AlbumConfig,
    resolver: MediaResolver<'a, F>,
}

impl<'a, F: Fetcher> AlbumBuilder<'a, F> {
    pub fn new(config: &'a AlbumConfig, fetcher: &'a F) -> Self {
        Self {
            config,
            resolver: MediaResolver::new(fetcher),
        }
    }

    pub async fn build<S: DocumentSink>(
        &self,
        project: &AlbumProject,
        sink: &mut S,
    ) -> Result<BuildReport, Error> {
        self.draw_cover(project, sink);

        let mut pages = 1;
        let mut degraded_items = 0;
        for (index, item) in project.items.iter().enumerate() {
            log::debug!("item {}/{}: {}", index + 1, project.items.len(), item.display_name);
            let outcome = self.render_item(item, sink).await;
            pages += outcome.pages;
            if outcome.degraded {
                degraded_items += 1;
            }
        }

        let file = sink.save(&project.file_stem())?;
        log::info!(
            "Album '{}': {} items, {} pages, {} degraded → {}",
            project.name,
            project.items.len(),
            pages,
            degraded_items,
            file.display(),
        );

        Ok(BuildReport {
            file,
            pages,
            items: project.items.len(),
            degraded_items,
        })
    }

    fn draw_cover<S: DocumentSink>(&self, project: &AlbumProject, sink: &mut S) {
        let g = &self.config.geometry;
        let center_x = g.page_width / 2.0;
        sink.new_page();
        sink.draw_text(
            &project.name,
            center_x,
            g.cover_title_y,
            g.title_font_size(),
            TextAlign::Center,
        );
        sink.draw_text(
            &self.config.subtitle,
            center_x,
            g.cover_title_y + g.cover_subtitle_offset,
            g.subtitle_font_size,
            TextAlign::Center,
        );
    }

    async fn render_item<S: DocumentSink>(&self, item: &AlbumItem, sink: &mut S) -> ItemOutcome {
        let g = &self.config.geometry;
        let body = g.body_metrics();
        let mut page = PageFlow::begin_page(g, sink);

        let prepared = match self.resolve(item).await {
            Ok(prepared) => prepared,
            Err(e) => {
                log::warn!("'{}': {e}", item.display_name);
                page.draw_line(sink, &LineBlock::body(e.placeholder(&item.display_name)), &body);
                return ItemOutcome {
                    pages: page.pages_started(),
                    degraded: true,
                };
            }
        };

        let (media, placement) = prepared;
        let mut degraded = false;
        if let Err(e) = self.draw_content(&mut page, sink, item, &media, placement) {
            log::warn!("'{}': {e}", item.display_name);
            page.ensure_room(sink, body.line_height());
            page.draw_line(sink, &LineBlock::body(item_failure_line(&item.display_name)), &body);
            degraded = true;
        }

        ItemOutcome {
            pages: page.pages_started(),
            degraded,
        }
    }

    async fn resolve(&self, item: &AlbumItem) -> Result<(ResolvedMedia, Placement), MediaError> {
        let g = &self.config.geometry;
        let reference = item.media.as_ref().ok_or(MediaError::MediaUnavailable)?;
        let media = self.resolver.resolve(reference).await?;
        let placement = place(
            media.pixel_width,
            media.pixel_height,
            g.content_width(),
            g.image_max_height(),
            g.page_width,
        )?;
        Ok((media, placement))
    }

    fn draw_content<S: DocumentSink>(
        &self,
        page: &mut PageFlow<'_>,
        sink: &mut S,
        item: &AlbumItem,
        media: &ResolvedMedia,
        placement: Placement,
    ) -> Result<(), Error> {
        let g = &self.config.geometry;
        let top = page.reserve(placement.render_height);
        sink.draw_image(
            media,
            placement.origin_x,
            top,
            placement.render_width,
            placement.render_height,
        )?;
        page.advance(g.image_text_gap);

        let Some(story) = item.story() else {
            return Ok(());
        };
        let body = g.body_metrics();
        let lines = flow(story, g.content_width(), &body);
        page.flow(sink, &lines, &body, &item.display_name);
        Ok(())
    }
}
