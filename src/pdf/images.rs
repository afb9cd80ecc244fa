use pdf_writer::{Filter, Pdf, Ref};

use crate::error::Error;
use crate::media::{ImageFormat, ResolvedMedia};

/// Write `media` as an image XObject at `xobj_ref`, allocating a soft mask if needed.
///
/// JPEG is passed through untouched (DCTDecode). Everything else is decoded
/// to RGB, with a separate gray alpha channel when any pixel is transparent.
pub(super) fn embed_image(
    pdf: &mut Pdf,
    xobj_ref: Ref,
    media: &ResolvedMedia,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<(), Error> {
    if media.format == ImageFormat::Jpeg {
        let components = jpeg_components(&media.bytes);
        let mut xobj = pdf.image_xobject(xobj_ref, &media.bytes);
        xobj.filter(Filter::DctDecode);
        xobj.width(media.pixel_width as i32);
        xobj.height(media.pixel_height as i32);
        match components {
            1 => xobj.color_space().device_gray(),
            4 => xobj.color_space().device_cmyk(),
            _ => xobj.color_space().device_rgb(),
        };
        xobj.bits_per_component(8);
        return Ok(());
    }

    let decoded = image::load_from_memory_with_format(&media.bytes, media.format.codec())
        .map_err(|e| Error::Image(format!("{}: {e}", media.mime_type)))?;
    let rgba = decoded.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w as i32);
        mask.height(h as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w as i32);
    xobj.height(h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    Ok(())
}

/// Component count from the first SOF marker; 3 when it cannot be found.
fn jpeg_components(data: &[u8]) -> u8 {
    let mut i = 2; // skip SOI
    while i + 3 < data.len() {
        if data[i] != 0xFF {
            break;
        }
        let marker = data[i + 1];
        // SOF markers: C0-C3, C5-C7, C9-CB, CD-CF
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof && i + 9 < data.len() {
            return data[i + 9];
        }
        let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + seg_len;
    }
    3
}
