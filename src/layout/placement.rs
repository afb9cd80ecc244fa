use crate::error::MediaError;

/// Final size and horizontal origin of an image block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub render_width: f32,
    pub render_height: f32,
    pub origin_x: f32,
}

/// Scale an image to `max_width`, shrink to `max_height` if that is too tall,
/// and center it horizontally on a page `page_width` wide. Aspect ratio is kept.
pub fn place(
    pixel_width: u32,
    pixel_height: u32,
    max_width: f32,
    max_height: f32,
    page_width: f32,
) -> Result<Placement, MediaError> {
    if pixel_width == 0 || pixel_height == 0 {
        return Err(MediaError::InvalidDimensions {
            width: pixel_width,
            height: pixel_height,
        });
    }

    let aspect = pixel_width as f32 / pixel_height as f32;
    let mut render_width = max_width;
    let mut render_height = render_width / aspect;
    if render_height > max_height {
        render_height = max_height;
        render_width = render_height * aspect;
    }

    Ok(Placement {
        render_width,
        render_height,
        origin_x: (page_width - render_width) / 2.0,
    })
}
