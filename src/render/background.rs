//! Background images: inline `data:` URLs and cover-fit placement.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use image::DynamicImage;
use std::path::Path;

use crate::error::{LaurelError, Result};

/// Decode a `data:<mime>;base64,<payload>` URL (or bare base64) into an image.
pub fn decode_data_url(source: &str) -> Result<DynamicImage> {
    let payload = match source.trim().strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| LaurelError::Image("Malformed data URL".to_string()))?;
            if !header.ends_with(";base64") {
                return Err(LaurelError::Image(
                    "Only base64 data URLs are supported".to_string(),
                ));
            }
            data
        }
        None => source.trim(),
    };

    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = B64
        .decode(cleaned.as_bytes())
        .map_err(|e| LaurelError::Image(format!("Invalid base64 background: {}", e)))?;
    image::load_from_memory(&bytes)
        .map_err(|e| LaurelError::Image(format!("Failed to decode background: {}", e)))
}

/// Encode raw image bytes as an inline data URL.
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, B64.encode(bytes))
}

/// Read an image file into an inline data URL.
pub fn data_url_from_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let format = image::guess_format(&bytes)
        .map_err(|e| LaurelError::Image(format!("{}: {}", path.display(), e)))?;
    Ok(encode_data_url(&bytes, format.to_mime_type()))
}

/// Placement of a `src_w`×`src_h` image covering a `dst_w`×`dst_h` area,
/// centered: `(offset_x, offset_y, scaled_w, scaled_h)`.
///
/// The image is scaled uniformly until both sides cover the area; the excess
/// is split evenly on both sides (negative offsets).
pub fn cover_rect(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (i64, i64, u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (0, 0, 0, 0);
    }
    let scale = (dst_w as f64 / src_w as f64).max(dst_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).ceil() as u32).max(dst_w);
    let h = ((src_h as f64 * scale).ceil() as u32).max(dst_h);
    let x = (dst_w as i64 - w as i64) / 2;
    let y = (dst_h as i64 - h as i64) / 2;
    (x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_data_url_round_trip() {
        let url = encode_data_url(&png_bytes(3, 2), "image/png");
        assert!(url.starts_with("data:image/png;base64,"));
        let img = decode_data_url(&url).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
    }

    #[test]
    fn test_bare_base64_accepted() {
        let bare = B64.encode(png_bytes(1, 1));
        assert!(decode_data_url(&bare).is_ok());
    }

    #[test]
    fn test_garbage_is_image_error() {
        assert!(matches!(
            decode_data_url("data:image/png;base64,!!!"),
            Err(LaurelError::Image(_))
        ));
        assert!(matches!(
            decode_data_url("data:text/plain,hello"),
            Err(LaurelError::Image(_))
        ));
    }

    #[test]
    fn test_cover_wide_source() {
        // 200x100 into 100x100: scale 1.0 by height, crop 50px each side.
        assert_eq!(cover_rect(200, 100, 100, 100), (-50, 0, 200, 100));
    }

    #[test]
    fn test_cover_small_source_upscales() {
        assert_eq!(cover_rect(1, 1, 800, 600), (0, -100, 800, 800));
    }
}
