//! # Template Model
//!
//! A [`Template`] is a named canvas (`width` × `height` pixels), an optional
//! background image, and an ordered list of [`Field`]s. The canvas size is the
//! single coordinate space shared by the editor and the exported document.
//!
//! ## Wire format
//!
//! ```json
//! {
//!   "id": "5f0c…",
//!   "name": "Certificate of Achievement",
//!   "width": 800,
//!   "height": 600,
//!   "backgroundImage": "data:image/png;base64,…",
//!   "fields": [
//!     {"id": "1700000000000-0", "x": 100, "y": 150, "width": 300, "height": 50,
//!      "placeholder": "Recipient Name", "fontSize": 24,
//!      "fontFamily": "Times New Roman", "color": "#000080"}
//!   ]
//! }
//! ```
//!
//! `inputs` is accepted as an alias of `fields`.

mod color;
mod field;

pub use color::Color;
pub use field::{
    DEFAULT_FONT_SIZE, DEFAULT_HEIGHT, DEFAULT_WIDTH, FONT_SIZE_RANGE, Field, FieldId, FieldPatch,
    FontFamily, HEIGHT_RANGE, WIDTH_RANGE,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LaurelError, Result};

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// A named, sized, reusable certificate layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Assigned by the store; `None` until the first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// `data:` URL (or bare base64) of the background; absent or empty means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, alias = "inputs")]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Template {
    /// An unsaved template with no fields and no background.
    pub fn new(name: impl Into<String>, size: CanvasSize) -> Self {
        Self {
            id: None,
            name: name.into(),
            width: size.width,
            height: size.height,
            background_image: None,
            fields: Vec::new(),
            created_at: None,
        }
    }

    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }

    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }

    /// Background payload, treating an empty string as no background.
    pub fn background(&self) -> Option<&str> {
        self.background_image
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// Checks a store applies before creating a record.
    pub fn validate_for_create(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LaurelError::Validation(
                "Template name cannot be empty".to_string(),
            ));
        }
        if self.canvas_size().is_empty() {
            return Err(LaurelError::Validation(format!(
                "Canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for field in &self.fields {
            if !seen.insert(&field.id) {
                return Err(LaurelError::Validation(format!(
                    "Duplicate field id '{}'",
                    field.id
                )));
            }
        }
        Ok(())
    }

    /// Output file name for an export with the given extension.
    pub fn certificate_file_name(&self, extension: &str) -> String {
        format!("{}_certificate.{}", self.name, extension)
    }
}
