//! Text rasterization for field contents.
//!
//! Outline fonts are rendered to anti-aliased f32 coverage buffers with
//! ab_glyph. Families with no outline face loaded fall back to the embedded
//! Spleen 12x24 bitmap face, scaled to the requested pixel size, so rendering
//! works on machines without any fonts installed.

use ab_glyph::{Font, FontArc, ScaleFont};
use spleen_font::{FONT_12X24, PSF2Font};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{LaurelError, Result};
use crate::template::FontFamily;

/// Native cell size of the bitmap fallback face.
const BITMAP_CELL_W: usize = 12;
const BITMAP_CELL_H: usize = 24;

/// Rendered text as a coverage buffer.
pub struct Coverage {
    pub width: usize,
    pub height: usize,
    /// 0.0 = untouched, 1.0 = full ink, intermediate for anti-aliasing.
    pub data: Vec<f32>,
}

/// The part of a line that gets rasterized, in line-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Window {
    /// The whole `width` × `height` line.
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// The part of a `line_w` × `line_h` line with its top-left at
    /// (`left`, `top`) that lands on a `canvas_w` × `canvas_h` raster.
    ///
    /// `None` when the line is entirely off the canvas.
    pub fn visible(
        line_w: usize,
        line_h: usize,
        left: i64,
        top: i64,
        canvas_w: u32,
        canvas_h: u32,
    ) -> Option<Self> {
        let x0 = left.saturating_neg().max(0);
        let y0 = top.saturating_neg().max(0);
        let x1 = (canvas_w as i64).saturating_sub(left).min(line_w as i64);
        let y1 = (canvas_h as i64).saturating_sub(top).min(line_h as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            x: x0 as usize,
            y: y0 as usize,
            width: (x1 - x0) as usize,
            height: (y1 - y0) as usize,
        })
    }

    /// Shrink to fit inside a `width` × `height` line.
    fn clamp_to(self, width: usize, height: usize) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }
}

/// File names tried, in order, when loading a family from a font directory.
fn candidate_files(family: FontFamily) -> &'static [&'static str] {
    match family {
        FontFamily::Arial => &[
            "Arial.ttf",
            "arial.ttf",
            "LiberationSans-Regular.ttf",
            "DejaVuSans.ttf",
        ],
        FontFamily::TimesNewRoman => &[
            "Times New Roman.ttf",
            "times.ttf",
            "LiberationSerif-Regular.ttf",
            "DejaVuSerif.ttf",
        ],
        FontFamily::Helvetica => &[
            "Helvetica.ttf",
            "LiberationSans-Regular.ttf",
            "DejaVuSans.ttf",
        ],
        FontFamily::CourierNew => &[
            "Courier New.ttf",
            "cour.ttf",
            "LiberationMono-Regular.ttf",
            "DejaVuSansMono.ttf",
        ],
        FontFamily::Verdana => &["Verdana.ttf", "verdana.ttf", "DejaVuSans.ttf"],
    }
}

/// Outline faces per family.
#[derive(Default)]
pub struct FontBook {
    faces: HashMap<FontFamily, FontArc>,
}

impl FontBook {
    /// No outline faces; everything renders with the bitmap fallback.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Load whatever families can be found in `dir`.
    ///
    /// Missing families are not an error; they use the bitmap fallback.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(LaurelError::Validation(format!(
                "Font directory {} does not exist",
                dir.display()
            )));
        }

        let mut book = Self::builtin();
        for family in FontFamily::ALL {
            for name in candidate_files(family) {
                let path = dir.join(name);
                if !path.is_file() {
                    continue;
                }
                let bytes = std::fs::read(&path)?;
                match FontArc::try_from_vec(bytes) {
                    Ok(font) => {
                        tracing::info!(family = %family, path = %path.display(), "Loaded font");
                        book.faces.insert(family, font);
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Unreadable font file")
                    }
                }
            }
        }
        Ok(book)
    }

    /// Register an outline face from raw TTF/OTF bytes.
    pub fn insert_bytes(&mut self, family: FontFamily, bytes: Vec<u8>) -> Result<()> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| LaurelError::Validation(format!("Invalid font for {}: {}", family, e)))?;
        self.faces.insert(family, font);
        Ok(())
    }

    pub fn has_outline(&self, family: FontFamily) -> bool {
        self.faces.contains_key(&family)
    }

    /// Advance width of `text` at `pixel_height`.
    pub fn measure(&self, family: FontFamily, text: &str, pixel_height: f32) -> f32 {
        match self.faces.get(&family) {
            Some(font) => {
                let scaled = font.as_scaled(pixel_height);
                text.chars()
                    .map(|ch| scaled.h_advance(font.glyph_id(ch)))
                    .sum()
            }
            None => {
                let (cell_w, _) = bitmap_cell(pixel_height);
                (text.chars().count() * cell_w) as f32
            }
        }
    }

    /// Height of one rendered line at `pixel_height`.
    pub fn line_height(&self, family: FontFamily, pixel_height: f32) -> usize {
        match self.faces.get(&family) {
            Some(font) => {
                let scaled = font.as_scaled(pixel_height);
                ((scaled.ascent() - scaled.descent()).ceil() as usize).max(1)
            }
            None => bitmap_cell(pixel_height).1,
        }
    }

    /// Pixel size of `text` rendered as one line.
    pub fn line_size(&self, family: FontFamily, text: &str, pixel_height: f32) -> (usize, usize) {
        let width = match self.faces.get(&family) {
            Some(_) => self.measure(family, text, pixel_height).ceil() as usize,
            None => text
                .chars()
                .count()
                .saturating_mul(bitmap_cell(pixel_height).0),
        };
        (width.max(1), self.line_height(family, pixel_height))
    }

    /// Greedy word wrap to `max_width` pixels.
    ///
    /// A word wider than `max_width` gets a line of its own and overflows.
    pub fn wrap(
        &self,
        family: FontFamily,
        text: &str,
        pixel_height: f32,
        max_width: f32,
    ) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if self.measure(family, &candidate, pixel_height) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Rasterize the `window` part of one line of text.
    ///
    /// The buffer is the size of the window (clamped to [`line_size`]), never
    /// of the whole line, so very large text costs only what is visible.
    ///
    /// [`line_size`]: FontBook::line_size
    pub fn render_line(
        &self,
        family: FontFamily,
        text: &str,
        pixel_height: f32,
        window: Window,
    ) -> Coverage {
        let (line_w, line_h) = self.line_size(family, text, pixel_height);
        let window = window.clamp_to(line_w, line_h);
        match self.faces.get(&family) {
            Some(font) => render_outline(font, text, pixel_height, window),
            None => render_bitmap(text, pixel_height, window),
        }
    }
}

fn render_outline(font: &FontArc, text: &str, pixel_height: f32, window: Window) -> Coverage {
    let scaled = font.as_scaled(pixel_height);
    let ascent = scaled.ascent();
    let mut data = vec![0.0f32; window.width * window.height];

    let (win_x0, win_y0) = (window.x as f32, window.y as f32);
    let (win_x1, win_y1) = (
        win_x0 + window.width as f32,
        win_y0 + window.height as f32,
    );

    let mut caret_x = 0.0f32;
    for ch in text.chars() {
        // Glyphs right of the window (plus one em for overhang) cannot reach it
        if caret_x > win_x1 + pixel_height {
            break;
        }
        let glyph_id = font.glyph_id(ch);
        let glyph =
            glyph_id.with_scale_and_position(pixel_height, ab_glyph::point(caret_x, ascent));
        caret_x += scaled.h_advance(glyph_id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        if bounds.max.x <= win_x0
            || bounds.min.x >= win_x1
            || bounds.max.y <= win_y0
            || bounds.min.y >= win_y1
        {
            continue;
        }

        outlined.draw(|px, py, coverage| {
            let x = px as i64 + bounds.min.x as i64 - window.x as i64;
            let y = py as i64 + bounds.min.y as i64 - window.y as i64;
            if x >= 0 && (x as usize) < window.width && y >= 0 && (y as usize) < window.height {
                let idx = y as usize * window.width + x as usize;
                data[idx] = (data[idx] + coverage).min(1.0);
            }
        });
    }

    Coverage {
        width: window.width,
        height: window.height,
        data,
    }
}

/// Cell size of the bitmap face scaled to `pixel_height`.
fn bitmap_cell(pixel_height: f32) -> (usize, usize) {
    let factor = pixel_height / BITMAP_CELL_H as f32;
    let w = ((BITMAP_CELL_W as f32 * factor).round() as usize).max(1);
    let h = ((BITMAP_CELL_H as f32 * factor).round() as usize).max(1);
    (w, h)
}

fn render_bitmap(text: &str, pixel_height: f32, window: Window) -> Coverage {
    let (cell_w, cell_h) = bitmap_cell(pixel_height);
    let mut data = vec![0.0f32; window.width * window.height];
    if window.width == 0 || window.height == 0 {
        return Coverage {
            width: window.width,
            height: window.height,
            data,
        };
    }

    let mut spleen = PSF2Font::new(FONT_12X24).ok();
    let first = window.x / cell_w;
    let last = (window.x + window.width - 1) / cell_w;

    for (i, ch) in text.chars().enumerate().skip(first).take(last + 1 - first) {
        let glyph = bitmap_glyph(spleen.as_mut(), ch);
        let cell_x = i * cell_w;
        let x_from = window.x.max(cell_x);
        let x_to = (window.x + window.width).min(cell_x + cell_w);

        // Nearest-neighbor sample of the 12x24 cell, visible pixels only
        for y in window.y..window.y + window.height {
            let sy = y * BITMAP_CELL_H / cell_h;
            for x in x_from..x_to {
                let sx = (x - cell_x) * BITMAP_CELL_W / cell_w;
                if glyph[sy * BITMAP_CELL_W + sx] != 0 {
                    data[(y - window.y) * window.width + (x - window.x)] = 1.0;
                }
            }
        }
    }

    Coverage {
        width: window.width,
        height: window.height,
        data,
    }
}

/// 12x24 glyph bitmap (0 or 1 per pixel). Unknown characters draw a box.
fn bitmap_glyph(spleen: Option<&mut PSF2Font>, ch: char) -> Vec<u8> {
    let mut glyph = vec![0u8; BITMAP_CELL_W * BITMAP_CELL_H];
    if ch == ' ' {
        return glyph;
    }

    let utf8 = ch.to_string();
    let found = match spleen.and_then(|font| font.glyph_for_utf8(utf8.as_bytes())) {
        Some(rows) => {
            for (row_y, row) in rows.enumerate() {
                for (col_x, on) in row.enumerate() {
                    let idx = row_y * BITMAP_CELL_W + col_x;
                    if col_x < BITMAP_CELL_W && idx < glyph.len() {
                        glyph[idx] = on as u8;
                    }
                }
            }
            true
        }
        None => false,
    };

    if !found {
        draw_box(&mut glyph, BITMAP_CELL_W, BITMAP_CELL_H);
    }
    glyph
}

fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}
