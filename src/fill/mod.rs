//! # Fill Engine
//!
//! Substitutes user-entered values for field placeholders. Geometry and style
//! are copied from the template untouched; only the displayed text changes.
//!
//! ```
//! use laurel::fill::{FillValues, fill};
//! use laurel::template::{CanvasSize, Field, Template};
//!
//! let mut template = Template::new("Award", CanvasSize::new(800, 600));
//! template.fields.push(Field::new_default(0));
//! let id = template.fields[0].id.clone();
//!
//! let mut values = FillValues::new();
//! values.set(id.clone(), "Ada Lovelace");
//!
//! let filled = fill(&template, &values);
//! assert_eq!(filled.fields[0].text, "Ada Lovelace");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::template::{CanvasSize, Color, FieldId, FontFamily, Template};

/// User-entered text keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FillValues(HashMap<FieldId, String>);

impl FillValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// One empty entry per template field, as a blank form starts out.
    pub fn blank_for(template: &Template) -> Self {
        Self(
            template
                .fields
                .iter()
                .map(|f| (f.id.clone(), String::new()))
                .collect(),
        )
    }

    pub fn set(&mut self, id: impl Into<FieldId>, value: impl Into<String>) {
        self.0.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &FieldId) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<FieldId>, V: Into<String>> FromIterator<(K, V)> for FillValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A field ready to draw: template geometry and style plus resolved text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledField {
    pub id: FieldId,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    pub font_family: FontFamily,
    pub color: Color,
    pub text: String,
    /// True when `text` fell back to the placeholder.
    pub is_placeholder: bool,
}

/// Render description of a filled template, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledTemplate {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub background_image: Option<String>,
    pub fields: Vec<FilledField>,
}

impl FilledTemplate {
    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }

    /// `{name}_certificate.{extension}`
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}_certificate.{}", self.name, extension)
    }
}

/// Resolve every field's display text.
///
/// A present, non-empty value wins; otherwise the placeholder is shown. Each
/// field is resolved on its own. Values for unknown ids are ignored.
pub fn fill(template: &Template, values: &FillValues) -> FilledTemplate {
    for id in values.0.keys() {
        if template.field(id).is_none() {
            tracing::debug!(field = %id, "Ignoring value for unknown field");
        }
    }

    let fields = template
        .fields
        .iter()
        .map(|field| {
            let (text, is_placeholder) = match values.get(&field.id) {
                Some(v) if !v.is_empty() => (v.to_string(), false),
                _ => (field.placeholder.clone(), true),
            };
            FilledField {
                id: field.id.clone(),
                x: field.x,
                y: field.y,
                width: field.width,
                height: field.height,
                font_size: field.font_size,
                font_family: field.font_family,
                color: field.color,
                text,
                is_placeholder,
            }
        })
        .collect();

    FilledTemplate {
        name: template.name.clone(),
        width: template.width,
        height: template.height,
        background_image: template.background().map(str::to_string),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Field;

    fn two_field_template() -> Template {
        let mut template = Template::new("Award", CanvasSize::new(800, 600));
        let mut name = Field::new_default(0);
        name.placeholder = "Recipient Name".to_string();
        let mut reason = Field::new_default(1);
        reason.placeholder = "Achievement".to_string();
        template.fields = vec![name, reason];
        template
    }

    #[test]
    fn test_absent_value_uses_placeholder() {
        let template = two_field_template();
        let filled = fill(&template, &FillValues::new());
        assert_eq!(filled.fields[0].text, "Recipient Name");
        assert!(filled.fields[0].is_placeholder);
    }

    #[test]
    fn test_empty_value_uses_placeholder_per_field() {
        let template = two_field_template();
        let values: FillValues = [
            (template.fields[0].id.clone(), ""),
            (template.fields[1].id.clone(), "Best in Show"),
        ]
        .into_iter()
        .collect();

        let filled = fill(&template, &values);
        assert_eq!(filled.fields[0].text, "Recipient Name");
        assert_eq!(filled.fields[1].text, "Best in Show");
        assert!(!filled.fields[1].is_placeholder);
    }

    #[test]
    fn test_geometry_and_style_unchanged() {
        let template = two_field_template();
        let values: FillValues = [(template.fields[0].id.clone(), "Ada")].into_iter().collect();
        let filled = fill(&template, &values);

        for (src, out) in template.fields.iter().zip(&filled.fields) {
            assert_eq!((out.x, out.y, out.width, out.height), (src.x, src.y, src.width, src.height));
            assert_eq!(out.font_size, src.font_size);
            assert_eq!(out.font_family, src.font_family);
            assert_eq!(out.color, src.color);
        }
        assert_eq!((filled.width, filled.height), (800, 600));
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let template = two_field_template();
        let values: FillValues = [("nope", "x")].into_iter().collect();
        let filled = fill(&template, &values);
        assert_eq!(filled.fields.len(), 2);
        assert!(filled.fields.iter().all(|f| f.is_placeholder));
    }

    #[test]
    fn test_blank_form() {
        let template = two_field_template();
        let values = FillValues::blank_for(&template);
        assert_eq!(values.len(), 2);
        assert_eq!(values.get(&template.fields[0].id), Some(""));
    }
}
