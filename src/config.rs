use std::time::Duration;

use crate::layout::Geometry;

/// Settings for one album build.
#[derive(Clone, Debug)]
pub struct AlbumConfig {
    pub geometry: Geometry,
    /// Per-request limit for remote images. `None` means a hung server blocks the build.
    pub fetch_timeout: Option<Duration>,
    /// Line under the title on the cover page.
    pub subtitle: String,
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            fetch_timeout: None,
            subtitle: "Fotoalbum".to_string(),
        }
    }
}
