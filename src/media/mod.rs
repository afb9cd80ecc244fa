mod http;

use std::io::Cursor;

use crate::error::MediaError;
use crate::model::MediaReference;

pub use http::HttpFetcher;

/// Raster formats an album may contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl ImageFormat {
    /// Allow-list lookup on a MIME type's subtype (`image/JPG; q=1` → `Jpeg`).
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        let subtype = essence.rsplit('/').next().unwrap_or("").to_ascii_lowercase();
        match subtype.as_str() {
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect the format from magic bytes. Formats outside the allow-list give `None`.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match image::guess_format(data).ok()? {
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Png => Some(ImageFormat::Png),
            image::ImageFormat::Gif => Some(ImageFormat::Gif),
            image::ImageFormat::WebP => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
        }
    }

    pub(crate) fn codec(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }
}

/// Image bytes ready for placement and drawing.
#[derive(Clone)]
pub struct ResolvedMedia {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub format: ImageFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl std::fmt::Debug for ResolvedMedia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedMedia")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("pixel_width", &self.pixel_width)
            .field("pixel_height", &self.pixel_height)
            .finish()
    }
}

/// Raw result of one GET.
#[derive(Clone, Debug, Default)]
pub struct FetchedBody {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FetchedBody {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network side of remote references. One call per item, no retries.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, uri: &str) -> Result<FetchedBody, MediaError>;
}

/// Inline bytes are checked against their declared type. Remote URIs are
/// fetched once and the response's MIME type wins.
pub struct MediaResolver<'f, F> {
    fetcher: &'f F,
}

impl<'f, F: Fetcher> MediaResolver<'f, F> {
    pub fn new(fetcher: &'f F) -> Self {
        Self { fetcher }
    }

    pub async fn resolve(&self, media: &MediaReference) -> Result<ResolvedMedia, MediaError> {
        match media {
            MediaReference::Inline {
                bytes,
                declared_mime_type,
            } => resolve_inline(bytes, declared_mime_type),
            MediaReference::Remote { uri } => self.resolve_remote(uri).await,
        }
    }

    async fn resolve_remote(&self, uri: &str) -> Result<ResolvedMedia, MediaError> {
        let body = self.fetcher.fetch(uri).await?;
        if !body.is_success() {
            return Err(MediaError::FetchFailed(format!("HTTP {} for {uri}", body.status)));
        }
        if body.bytes.is_empty() {
            return Err(MediaError::MediaUnavailable);
        }

        // Only an image/* Content-Type counts as reported; generic types are sniffed.
        let reported = body
            .content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| ct.to_ascii_lowercase().starts_with("image/"));

        let (format, mime_type) = match reported {
            Some(ct) => {
                let format = ImageFormat::from_mime(ct)
                    .ok_or_else(|| MediaError::UnsupportedFormat(ct.to_string()))?;
                (format, format.mime_type().to_string())
            }
            None => {
                let format = ImageFormat::sniff(&body.bytes).ok_or_else(|| {
                    MediaError::DecodeFailed("response body is not a recognised image".into())
                })?;
                (format, format.mime_type().to_string())
            }
        };

        decode_header(body.bytes, format, mime_type)
    }
}

fn resolve_inline(bytes: &[u8], declared_mime_type: &str) -> Result<ResolvedMedia, MediaError> {
    let declared = ImageFormat::from_mime(declared_mime_type)
        .ok_or_else(|| MediaError::UnsupportedFormat(declared_mime_type.to_string()))?;
    if bytes.is_empty() {
        return Err(MediaError::MediaUnavailable);
    }
    let mut media = decode_header(bytes.to_vec(), declared, declared.mime_type().to_string())?;
    // No response reported a type, so the detected format names the bytes.
    media.mime_type = media.format.mime_type().to_string();
    Ok(media)
}

/// Read pixel dimensions from the image header without decoding pixels.
/// When the magic bytes name a different allowed format than expected, they win.
fn decode_header(
    bytes: Vec<u8>,
    expected: ImageFormat,
    mime_type: String,
) -> Result<ResolvedMedia, MediaError> {
    let format = match ImageFormat::sniff(&bytes) {
        Some(actual) if actual != expected => {
            log::debug!("image declared as {mime_type} is actually {}", actual.mime_type());
            actual
        }
        _ => expected,
    };

    let (pixel_width, pixel_height) =
        image::ImageReader::with_format(Cursor::new(&bytes), format.codec())
            .into_dimensions()
            .map_err(|e| MediaError::DecodeFailed(e.to_string()))?;

    Ok(ResolvedMedia {
        bytes,
        mime_type,
        format,
        pixel_width,
        pixel_height,
    })
}
