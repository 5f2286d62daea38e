//! # Rendering Module
//!
//! Turns a [`FilledTemplate`] into pixels.
//!
//! ## Modules
//!
//! - [`text`]: outline and bitmap text rasterization, word wrap
//! - [`background`]: `data:` URL decoding and cover-fit placement
//! - [`compose`]: paints background and fields onto an RGBA raster
//!
//! ## Render target
//!
//! A [`RenderTarget`] is the mounted visual tree that export captures from.
//! Nothing can be captured until a filled template is mounted:
//!
//! ```
//! use std::sync::Arc;
//! use laurel::fill::{FillValues, fill};
//! use laurel::render::{FontBook, RenderTarget};
//! use laurel::template::{CanvasSize, Template};
//!
//! let template = Template::new("Award", CanvasSize::new(800, 600));
//! let mut target = RenderTarget::new(Arc::new(FontBook::builtin()));
//! assert!(target.capture(1.0).is_err());
//!
//! target.mount(fill(&template, &FillValues::new())).unwrap();
//! let raster = target.capture(2.0).unwrap();
//! assert_eq!(raster.dimensions(), (1600, 1200));
//! ```

pub mod background;
pub mod compose;
pub mod text;

pub use text::FontBook;

use image::{DynamicImage, RgbaImage};
use std::sync::Arc;

use crate::error::{LaurelError, Result};
use crate::fill::FilledTemplate;

/// Largest raster side a capture may produce.
pub const MAX_RASTER_SIDE: u32 = 16_384;

/// Largest raster area (width × height) a capture may produce.
pub const MAX_RASTER_PIXELS: u64 = 50_000_000;

/// Tallest text, in captured pixels, a capture will draw.
pub const MAX_TEXT_PX: f32 = MAX_RASTER_SIDE as f32;

/// A mounted scene: the filled description plus its decoded background.
struct Scene {
    filled: FilledTemplate,
    background: Option<DynamicImage>,
}

/// The visual tree that captures are taken from.
pub struct RenderTarget {
    fonts: Arc<FontBook>,
    scene: Option<Scene>,
}

impl RenderTarget {
    pub fn new(fonts: Arc<FontBook>) -> Self {
        Self { fonts, scene: None }
    }

    /// Attach a filled template, replacing whatever was mounted.
    ///
    /// Fails with `Image` if the background cannot be decoded; the previous
    /// scene stays mounted in that case.
    pub fn mount(&mut self, filled: FilledTemplate) -> Result<()> {
        let background = filled
            .background_image
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(background::decode_data_url)
            .transpose()?;
        self.scene = Some(Scene { filled, background });
        Ok(())
    }

    /// Detach the scene, returning its description.
    pub fn unmount(&mut self) -> Option<FilledTemplate> {
        self.scene.take().map(|s| s.filled)
    }

    pub fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    pub fn mounted(&self) -> Option<&FilledTemplate> {
        self.scene.as_ref().map(|s| &s.filled)
    }

    /// Rasterize the mounted scene at `scale` × its canvas size.
    pub fn capture(&self, scale: f32) -> Result<RgbaImage> {
        let scene = self.scene.as_ref().ok_or_else(|| {
            LaurelError::RenderTargetUnavailable("no filled template is mounted".to_string())
        })?;

        let size = scene.filled.canvas_size();
        if size.is_empty() {
            return Err(LaurelError::RenderTargetUnavailable(format!(
                "canvas {}x{} has no area",
                size.width, size.height
            )));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(LaurelError::Validation(format!(
                "Capture scale must be positive, got {}",
                scale
            )));
        }
        let (w, h) = (
            compose::scaled_len(size.width, scale),
            compose::scaled_len(size.height, scale),
        );
        if w > MAX_RASTER_SIDE || h > MAX_RASTER_SIDE {
            return Err(LaurelError::Validation(format!(
                "Capture of {}x{} exceeds the {}px limit",
                w, h, MAX_RASTER_SIDE
            )));
        }
        if w as u64 * h as u64 > MAX_RASTER_PIXELS {
            return Err(LaurelError::Validation(format!(
                "Capture of {}x{} exceeds the {} pixel limit",
                w, h, MAX_RASTER_PIXELS
            )));
        }
        if let Some(field) = scene
            .filled
            .fields
            .iter()
            .find(|f| f.font_size as f32 * scale > MAX_TEXT_PX)
        {
            return Err(LaurelError::Validation(format!(
                "Field {} font size {} is too large to render at {}x",
                field.id, field.font_size, scale
            )));
        }

        Ok(compose::compose(
            &scene.filled,
            scene.background.as_ref(),
            &self.fonts,
            scale,
        ))
    }
}
