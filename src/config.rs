//! Runtime configuration shared by the CLI and the HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::export::{DEFAULT_EXPORT_SCALE, DEFAULT_PREVIEW_SCALE, ExportFormat, ExportSettings};
use crate::render::FontBook;

/// Rendering configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Directory searched for outline fonts. `None` uses the bitmap face only.
    pub font_dir: Option<PathBuf>,
    /// Capture oversampling for exports.
    pub export_scale: f32,
    /// Zoom for preview images.
    pub preview_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_dir: None,
            export_scale: DEFAULT_EXPORT_SCALE,
            preview_scale: DEFAULT_PREVIEW_SCALE,
        }
    }
}

impl RenderConfig {
    /// Load the configured fonts.
    pub fn font_book(&self) -> Result<Arc<FontBook>> {
        let book = match &self.font_dir {
            Some(dir) => FontBook::load_dir(dir)?,
            None => FontBook::builtin(),
        };
        Ok(Arc::new(book))
    }

    pub fn export_settings(&self, format: ExportFormat) -> ExportSettings {
        ExportSettings {
            format,
            export_scale: self.export_scale,
        }
    }
}
