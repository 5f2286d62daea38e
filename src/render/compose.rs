//! Scene compositing.
//!
//! Paints a filled template onto an RGBA raster at a given scale:
//!
//! ```text
//! white canvas (width·s × height·s)
//!   └─ background, cover-fit and centered
//!       └─ fields in template order (later fields paint over earlier ones)
//!            text wrapped to the box width, each line centered,
//!            block centered vertically in the box
//! ```
//!
//! Field geometry is multiplied by the scale and nothing else, so a capture at
//! any scale is the same picture at a different pixel density.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

use super::background::cover_rect;
use super::text::{Coverage, FontBook, Window};
use crate::fill::{FilledField, FilledTemplate};
use crate::template::Color;

/// Pixel size of a canvas dimension at `scale`.
pub fn scaled_len(len: u32, scale: f32) -> u32 {
    ((len as f32 * scale).round() as u32).max(1)
}

/// Composite the whole scene.
pub fn compose(
    filled: &FilledTemplate,
    background: Option<&DynamicImage>,
    fonts: &FontBook,
    scale: f32,
) -> RgbaImage {
    let out_w = scaled_len(filled.width, scale);
    let out_h = scaled_len(filled.height, scale);
    let mut canvas = RgbaImage::from_pixel(out_w, out_h, Rgba([255, 255, 255, 255]));

    if let Some(bg) = background {
        draw_background(&mut canvas, bg);
    }

    for field in &filled.fields {
        draw_field(&mut canvas, field, fonts, scale);
    }

    canvas
}

fn draw_background(canvas: &mut RgbaImage, bg: &DynamicImage) {
    let (x, y, w, h) = cover_rect(bg.width(), bg.height(), canvas.width(), canvas.height());
    if w == 0 || h == 0 {
        return;
    }
    let resized = imageops::resize(&bg.to_rgba8(), w, h, FilterType::Triangle);
    imageops::overlay(canvas, &resized, x, y);
}

fn draw_field(canvas: &mut RgbaImage, field: &FilledField, fonts: &FontBook, scale: f32) {
    let pixel_height = field.font_size as f32 * scale;
    if pixel_height <= 0.0 || field.text.is_empty() {
        return;
    }

    let box_x = field.x as f32 * scale;
    let box_y = field.y as f32 * scale;
    let box_w = field.width as f32 * scale;
    let box_h = field.height as f32 * scale;

    let lines: Vec<(String, (usize, usize))> = fonts
        .wrap(field.font_family, &field.text, pixel_height, box_w)
        .into_iter()
        .map(|line| {
            let size = fonts.line_size(field.font_family, &line, pixel_height);
            (line, size)
        })
        .collect();

    let block_h: usize = lines.iter().map(|(_, (_, h))| h).sum();
    let mut top = box_y + (box_h - block_h as f32) / 2.0;
    let (canvas_w, canvas_h) = canvas.dimensions();

    for (text, (line_w, line_h)) in &lines {
        let left = (box_x + (box_w - *line_w as f32) / 2.0).round() as i64;
        let line_top = top.round() as i64;
        top += *line_h as f32;

        let Some(window) = Window::visible(*line_w, *line_h, left, line_top, canvas_w, canvas_h)
        else {
            continue;
        };
        let coverage = fonts.render_line(field.font_family, text, pixel_height, window);
        blit_coverage(
            canvas,
            &coverage,
            left + window.x as i64,
            line_top + window.y as i64,
            field.color,
        );
    }
}

/// Paint `color` through a coverage mask with its top-left at (`x0`, `y0`).
/// Pixels outside the canvas are dropped.
fn blit_coverage(canvas: &mut RgbaImage, cov: &Coverage, x0: i64, y0: i64, color: Color) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    let ink = [color.r, color.g, color.b];

    for cy in 0..cov.height {
        let y = y0 + cy as i64;
        if y < 0 || y >= ch {
            continue;
        }
        for cx in 0..cov.width {
            let x = x0 + cx as i64;
            if x < 0 || x >= cw {
                continue;
            }
            let alpha = cov.data[cy * cov.width + cx];
            if alpha <= 0.0 {
                continue;
            }
            let px = canvas.get_pixel_mut(x as u32, y as u32);
            for c in 0..3 {
                let dst = px.0[c] as f32;
                px.0[c] = (dst + (ink[c] as f32 - dst) * alpha).round() as u8;
            }
            px.0[3] = 255;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::{FillValues, fill};
    use crate::template::{CanvasSize, Field, FontFamily, Template};

    fn single_field(x: i32, y: i32, color: Color) -> FilledTemplate {
        let mut template = Template::new("Award", CanvasSize::new(400, 300));
        let mut field = Field::new_default(0);
        field.x = x;
        field.y = y;
        field.width = 200;
        field.height = 40;
        field.font_size = 24;
        field.color = color;
        field.placeholder = "HELLO".to_string();
        template.fields.push(field);
        fill(&template, &FillValues::new())
    }

    fn ink_bounds(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in img.enumerate_pixels() {
            if p.0[..3] != [255, 255, 255] {
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((a, b, c, d)) => (a.min(x), b.min(y), c.max(x), d.max(y)),
                });
            }
        }
        bounds
    }

    #[test]
    fn test_canvas_size_follows_scale() {
        let filled = single_field(10, 10, Color::BLACK);
        let fonts = FontBook::builtin();
        assert_eq!(compose(&filled, None, &fonts, 1.0).dimensions(), (400, 300));
        assert_eq!(compose(&filled, None, &fonts, 2.0).dimensions(), (800, 600));
    }

    #[test]
    fn test_text_is_centered_in_box() {
        let filled = single_field(100, 100, Color::BLACK);
        let img = compose(&filled, None, &FontBook::builtin(), 1.0);
        let (x0, y0, x1, y1) = ink_bounds(&img).expect("text should be drawn");

        // Box is 100..300 x 100..140; "HELLO" is 60x24 → 170..230 x 108..132.
        assert!(x0 >= 170 && x1 < 230, "x range {}..{}", x0, x1);
        assert!(y0 >= 108 && y1 < 132, "y range {}..{}", y0, y1);
    }

    #[test]
    fn test_text_uses_field_color() {
        let red = Color::rgb(200, 0, 0);
        let filled = single_field(100, 100, red);
        let img = compose(&filled, None, &FontBook::builtin(), 1.0);
        assert!(img.pixels().any(|p| p.0 == [200, 0, 0, 255]));
    }

    #[test]
    fn test_scaled_capture_places_text_proportionally() {
        let filled = single_field(100, 100, Color::BLACK);
        let fonts = FontBook::builtin();
        let one = ink_bounds(&compose(&filled, None, &fonts, 1.0)).unwrap();
        let two = ink_bounds(&compose(&filled, None, &fonts, 2.0)).unwrap();
        assert_eq!(two.0, one.0 * 2);
        assert_eq!(two.1, one.1 * 2);
    }

    #[test]
    fn test_offcanvas_field_is_clipped() {
        let filled = single_field(-500, -500, Color::BLACK);
        let img = compose(&filled, None, &FontBook::builtin(), 1.0);
        assert!(ink_bounds(&img).is_none());
    }

    #[test]
    fn test_background_covers_canvas() {
        let filled = single_field(0, 0, Color::BLACK);
        let bg = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255])));
        let img = compose(&filled, Some(&bg), &FontBook::builtin(), 1.0);
        assert_eq!(img.get_pixel(399, 299).0, [0, 0, 255, 255]);
        assert_eq!(img.get_pixel(0, 299).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_huge_font_renders_within_canvas() {
        let mut template = Template::new("Award", CanvasSize::new(100, 100));
        let mut field = Field::new_default(0);
        field.x = 0;
        field.y = 0;
        field.font_size = 1_000_000;
        template.fields.push(field);
        let filled = fill(&template, &FillValues::new());

        let img = compose(&filled, None, &FontBook::builtin(), 2.0);
        assert_eq!(img.dimensions(), (200, 200));
    }

    #[test]
    fn test_outline_text_lands_in_box() {
        let mut fonts = FontBook::builtin();
        fonts
            .insert_bytes(
                FontFamily::CourierNew,
                include_bytes!("../../tests/fixtures/DejaVuSansMono.ttf").to_vec(),
            )
            .unwrap();

        let mut filled = single_field(100, 100, Color::BLACK);
        filled.fields[0].font_family = FontFamily::CourierNew;
        let img = compose(&filled, None, &fonts, 1.0);
        let (x0, y0, x1, y1) = ink_bounds(&img).expect("text should be drawn");

        // Box is 100..300 x 100..140
        assert!(x0 >= 100 && x1 < 300, "x range {}..{}", x0, x1);
        assert!(y0 >= 100 && y1 < 140, "y range {}..{}", y0, y1);
        // Centered: equal margins within a pixel or two
        let (left, right) = (x0 - 100, 299 - x1);
        assert!(left.abs_diff(right) <= 4, "margins {} / {}", left, right);
    }
}
