use thiserror::Error;

/// Document-level failures. Only these ever escape a build.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid album project: {0}")]
    Project(String),
    /// The sink could not embed an image. Recovered per item by the builder.
    #[error("image error: {0}")]
    Image(String),
}

/// Why a single item's media could not be resolved. Never fatal for the document.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("no image data")]
    MediaUnavailable,
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("fetch failed: {0}")]
    FetchFailed(String),
    #[error("could not decode image: {0}")]
    DecodeFailed(String),
    #[error("invalid pixel dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

impl MediaError {
    /// The line written into the album in place of the image.
    pub fn placeholder(&self, name: &str) -> String {
        match self {
            MediaError::MediaUnavailable | MediaError::InvalidDimensions { .. } => {
                format!("Bilddata saknas för: {name}")
            }
            MediaError::UnsupportedFormat(mime) => {
                format!("Bildformatet stöds inte ({mime}): {name}")
            }
            MediaError::FetchFailed(_) => {
                format!("Kunde inte ladda bilddata (nätverksfel): {name}")
            }
            MediaError::DecodeFailed(_) => format!("Kunde inte läsa bilddata: {name}"),
        }
    }
}

/// Placeholder for a failure raised after the item's media was resolved.
pub(crate) fn item_failure_line(name: &str) -> String {
    format!("Ett fel uppstod för: {name}")
}
