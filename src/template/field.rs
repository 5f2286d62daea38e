//! Positionable text fields.
//!
//! A [`Field`] is one styled, single-line text slot placed at absolute canvas
//! pixel coordinates. Geometry is never normalized: `x`, `y`, `width` and
//! `height` mean the same thing in the editor and in the exported page.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::color::Color;

/// Default box width for a new field.
pub const DEFAULT_WIDTH: u32 = 200;
/// Default box height for a new field.
pub const DEFAULT_HEIGHT: u32 = 40;
/// Default font size for a new field.
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// Editor slider range for `width`. Guidance only, never enforced.
pub const WIDTH_RANGE: RangeInclusive<u32> = 50..=600;
/// Editor slider range for `height`.
pub const HEIGHT_RANGE: RangeInclusive<u32> = 20..=200;
/// Editor slider range for `font_size`.
pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 10..=72;

static NEXT_FIELD_SEQ: AtomicU64 = AtomicU64::new(0);

/// Stable identifier of a field within its template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    /// Generate a fresh id.
    ///
    /// Combines a millisecond timestamp with a process-wide sequence number,
    /// so ids created within the same millisecond still differ.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let seq = NEXT_FIELD_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!("{}-{}", millis, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Font families offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Arial,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    Helvetica,
    #[serde(rename = "Courier New")]
    CourierNew,
    Verdana,
}

impl FontFamily {
    pub const ALL: [FontFamily; 5] = [
        FontFamily::Arial,
        FontFamily::TimesNewRoman,
        FontFamily::Helvetica,
        FontFamily::CourierNew,
        FontFamily::Verdana,
    ];

    /// Display name, identical to the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::Helvetica => "Helvetica",
            FontFamily::CourierNew => "Courier New",
            FontFamily::Verdana => "Verdana",
        }
    }

    /// Parse a display name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One positionable text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    /// Left edge in canvas pixels.
    pub x: i32,
    /// Top edge in canvas pixels.
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub placeholder: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub color: Color,
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

impl Field {
    /// A defaulted field for slot `index` (0-based) of a template.
    ///
    /// Each slot is offset by 20px so freshly added fields cascade instead of
    /// stacking exactly on top of each other.
    pub fn new_default(index: usize) -> Self {
        let offset = 50 + 20 * index as i32;
        Self {
            id: FieldId::generate(),
            x: offset,
            y: offset,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            placeholder: format!("Text Input {}", index + 1),
            font_size: DEFAULT_FONT_SIZE,
            font_family: FontFamily::Arial,
            color: Color::BLACK,
        }
    }

    /// Names of attributes that fall outside the editor's slider ranges.
    pub fn outside_editor_ranges(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !WIDTH_RANGE.contains(&self.width) {
            out.push("width");
        }
        if !HEIGHT_RANGE.contains(&self.height) {
            out.push("height");
        }
        if !FONT_SIZE_RANGE.contains(&self.font_size) {
            out.push("fontSize");
        }
        out
    }
}

/// A partial set of style attributes to merge into a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldPatch {
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn font_family(mut self, family: FontFamily) -> Self {
        self.font_family = Some(family);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `field`, leaving unspecified attributes untouched.
    pub fn apply(&self, field: &mut Field) {
        if let Some(w) = self.width {
            field.width = w;
        }
        if let Some(h) = self.height {
            field.height = h;
        }
        if let Some(size) = self.font_size {
            field.font_size = size;
        }
        if let Some(family) = self.font_family {
            field.font_family = family;
        }
        if let Some(color) = self.color {
            field.color = color;
        }
        if let Some(text) = &self.placeholder {
            field.placeholder = text.clone();
        }
    }
}
