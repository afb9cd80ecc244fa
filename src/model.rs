use std::fmt;

use serde::{Deserialize, Deserializer};

/// A project ready to be turned into an album: a title and its items in page order.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumProject {
    pub name: String,
    #[serde(default)]
    pub items: Vec<AlbumItem>,
}

impl AlbumProject {
    pub fn new(name: impl Into<String>, items: Vec<AlbumItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// `"Sommar  2024"` → `"sommar_2024_fotoalbum"`. The sink appends its extension.
    pub fn file_stem(&self) -> String {
        let words: Vec<String> = self
            .name
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();
        if words.is_empty() {
            return "fotoalbum".to_string();
        }
        format!("{}_fotoalbum", words.join("_"))
    }
}

/// One image-plus-text unit. Immutable snapshot taken before the build starts.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumItem {
    pub display_name: String,
    /// `None` when absent or malformed; the item then renders as a placeholder.
    #[serde(default, deserialize_with = "lenient_media")]
    pub media: Option<MediaReference>,
    #[serde(default)]
    pub story_text: Option<String>,
    /// Author id of whoever uploaded the image.
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub descriptions: Vec<Description>,
}

impl AlbumItem {
    pub fn new(display_name: impl Into<String>, media: MediaReference) -> Self {
        Self {
            display_name: display_name.into(),
            media: Some(media),
            story_text: None,
            uploaded_by: None,
            descriptions: Vec::new(),
        }
    }

    pub fn with_story(mut self, text: impl Into<String>) -> Self {
        self.story_text = Some(text.into());
        self
    }

    /// Text flowed under the image: the compiled story, else the uploader's own
    /// description. Descriptions by other contributors are never used.
    pub fn story(&self) -> Option<&str> {
        if let Some(story) = self.story_text.as_deref() {
            if !story.trim().is_empty() {
                return Some(story);
            }
        }
        let uploader = self.uploaded_by.as_deref()?;
        self.descriptions
            .iter()
            .find(|d| d.author == uploader)
            .map(|d| d.text.as_str())
            .filter(|t| !t.trim().is_empty())
    }
}

/// A broken media reference costs its item the image, not the whole project its load.
fn lenient_media<'de, D: Deserializer<'de>>(d: D) -> Result<Option<MediaReference>, D::Error> {
    let Some(value) = Option::<serde_json::Value>::deserialize(d)? else {
        return Ok(None);
    };
    match MediaReference::deserialize(value) {
        Ok(media) => Ok(Some(media)),
        Err(e) => {
            log::warn!("ignoring media reference: {e}");
            Ok(None)
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Description {
    pub author: String,
    pub text: String,
}

/// Where an item's image bytes come from. Decided by the caller, never sniffed from strings.
#[derive(Clone, Deserialize)]
#[serde(try_from = "RawMediaReference")]
pub enum MediaReference {
    Inline {
        bytes: Vec<u8>,
        declared_mime_type: String,
    },
    Remote {
        uri: String,
    },
}

impl MediaReference {
    pub fn inline(bytes: Vec<u8>, declared_mime_type: impl Into<String>) -> Self {
        MediaReference::Inline {
            bytes,
            declared_mime_type: declared_mime_type.into(),
        }
    }

    pub fn remote(uri: impl Into<String>) -> Self {
        MediaReference::Remote { uri: uri.into() }
    }
}

impl fmt::Debug for MediaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaReference::Inline {
                bytes,
                declared_mime_type,
            } => f
                .debug_struct("Inline")
                .field("len", &bytes.len())
                .field("declared_mime_type", declared_mime_type)
                .finish(),
            MediaReference::Remote { uri } => f.debug_struct("Remote").field("uri", uri).finish(),
        }
    }
}

/// JSON shape: `{"kind": "inline", "data": "<base64 | data URI>", "mimeType": "image/png"}`
/// or `{"kind": "remote", "uri": "https://..."}`.
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RawMediaReference {
    Inline {
        data: String,
        #[serde(default, rename = "mimeType")]
        mime_type: Option<String>,
    },
    Remote {
        uri: String,
    },
}

impl TryFrom<RawMediaReference> for MediaReference {
    type Error = String;

    fn try_from(raw: RawMediaReference) -> Result<Self, Self::Error> {
        match raw {
            RawMediaReference::Remote { uri } => Ok(MediaReference::Remote { uri }),
            RawMediaReference::Inline { data, mime_type } => {
                let (uri_mime, payload) = split_data_uri(&data)?;
                let declared_mime_type = mime_type
                    .or(uri_mime)
                    .ok_or_else(|| "inline media needs a mimeType".to_string())?;
                Ok(MediaReference::Inline {
                    bytes: base64_decode(payload)?,
                    declared_mime_type,
                })
            }
        }
    }
}

/// `data:image/png;base64,iVBOR...` → (`Some("image/png")`, `"iVBOR..."`).
/// Plain base64 passes through with no MIME type.
fn split_data_uri(data: &str) -> Result<(Option<String>, &str), String> {
    let Some(rest) = data.strip_prefix("data:") else {
        return Ok((None, data));
    };
    let comma = rest
        .find(',')
        .ok_or_else(|| "invalid data URI: missing comma".to_string())?;
    let header = &rest[..comma];
    let mime = header.split(';').next().unwrap_or("").trim();
    let mime = (!mime.is_empty()).then(|| mime.to_string());
    Ok((mime, &rest[comma + 1..]))
}

fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| format!("base64 decode error: {e}"))
}
