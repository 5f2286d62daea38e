//! # Export Engine
//!
//! Captures a mounted [`RenderTarget`] and emits a single-page document whose
//! size is exactly the template's `width` × `height`.
//!
//! Two scales are kept apart on purpose:
//!
//! | Parameter | Used for | Affects output page size |
//! |-----------|----------|--------------------------|
//! | `export_scale` | oversampled capture for crisp text | no |
//! | `preview_scale` | on-screen preview PNGs only | n/a (never exported) |
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use laurel::export::{ExportFormat, ExportSettings, Exporter, Orientation};
//! use laurel::fill::{FillValues, fill};
//! use laurel::render::{FontBook, RenderTarget};
//! use laurel::template::{CanvasSize, Template};
//!
//! let template = Template::new("Award", CanvasSize::new(800, 600));
//! let mut target = RenderTarget::new(Arc::new(FontBook::builtin()));
//! target.mount(fill(&template, &FillValues::new())).unwrap();
//!
//! let doc = Exporter::new(ExportSettings::default()).export(&target).unwrap();
//! assert_eq!(doc.file_name, "Award_certificate.pdf");
//! assert_eq!((doc.page_width, doc.page_height), (800, 600));
//! assert_eq!(doc.orientation, Orientation::Landscape);
//! ```

pub mod pdf;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::error::{LaurelError, Result};
use crate::render::RenderTarget;

/// Oversampling factor applied during capture.
pub const DEFAULT_EXPORT_SCALE: f32 = 2.0;
/// Cosmetic zoom for preview images.
pub const DEFAULT_PREVIEW_SCALE: f32 = 0.5;
/// Upper bound on the preview zoom.
pub const MAX_PREVIEW_SCALE: f32 = 4.0;

/// Page orientation, derived from the canvas aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Landscape when strictly wider than tall.
    pub fn for_size(width: u32, height: u32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Png => "image/png",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Some(ExportFormat::Pdf),
            "png" => Some(ExportFormat::Png),
            _ => None,
        }
    }
}

/// Export knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSettings {
    pub format: ExportFormat,
    /// Capture density multiplier. Quality only; never changes the page size.
    pub export_scale: f32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Pdf,
            export_scale: DEFAULT_EXPORT_SCALE,
        }
    }
}

/// A finished single-page document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub format: ExportFormat,
    pub orientation: Orientation,
    /// Page size in canvas pixels; always the template's width × height.
    pub page_width: u32,
    pub page_height: u32,
    /// Pixel size of the embedded raster.
    pub raster_width: u32,
    pub raster_height: u32,
    pub bytes: Vec<u8>,
}

/// Produces documents from a render target.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    settings: ExportSettings,
}

impl Exporter {
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Capture and encode.
    ///
    /// Fails with `RenderTargetUnavailable` when nothing is mounted; no bytes
    /// are produced in that case.
    pub fn export(&self, target: &RenderTarget) -> Result<ExportedDocument> {
        let filled = target.mounted().ok_or_else(|| {
            LaurelError::RenderTargetUnavailable("no filled template is mounted".to_string())
        })?;
        let (page_width, page_height) = (filled.width, filled.height);
        let file_name = filled.file_name(self.settings.format.extension());

        let captured = target.capture(self.settings.export_scale)?;

        let (raster_width, raster_height, bytes) = match self.settings.format {
            ExportFormat::Pdf => {
                let rgb = DynamicImage::ImageRgba8(captured).to_rgb8();
                let bytes = pdf::single_page(&rgb, page_width, page_height)?;
                (rgb.width(), rgb.height(), bytes)
            }
            ExportFormat::Png => {
                let page = downsample(captured, page_width, page_height);
                let bytes = encode_png(&page)?;
                (page.width(), page.height(), bytes)
            }
        };

        tracing::info!(
            file = %file_name,
            page_width,
            page_height,
            raster_width,
            raster_height,
            "Exported certificate"
        );

        Ok(ExportedDocument {
            file_name,
            format: self.settings.format,
            orientation: Orientation::for_size(page_width, page_height),
            page_width,
            page_height,
            raster_width,
            raster_height,
            bytes,
        })
    }
}

/// Render a PNG for on-screen preview at `preview_scale`.
///
/// Independent of any export settings.
pub fn preview_png(target: &RenderTarget, preview_scale: f32) -> Result<Vec<u8>> {
    if !preview_scale.is_finite() || preview_scale <= 0.0 || preview_scale > MAX_PREVIEW_SCALE {
        return Err(LaurelError::Validation(format!(
            "Preview scale must be in (0, {}], got {}",
            MAX_PREVIEW_SCALE, preview_scale
        )));
    }
    let captured = target.capture(preview_scale)?;
    encode_png(&captured)
}

fn downsample(img: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img;
    }
    image::imageops::resize(&img, width, height, FilterType::Lanczos3)
}

fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| LaurelError::Image(format!("PNG encoding failed: {}", e)))?;
    Ok(out.into_inner())
}
