//! # Editor Engine
//!
//! An [`EditorSession`] owns one draft template and the current selection.
//! Every operation is synchronous and touches at most one field, so a failed
//! or ignored operation never leaves the draft half-edited.
//!
//! ## Example
//!
//! ```
//! use laurel::editor::EditorSession;
//! use laurel::template::FieldPatch;
//!
//! let mut session = EditorSession::new();
//! session.set_name("Certificate of Achievement");
//!
//! let id = session.add_field();
//! session.move_field(&id, 120, 240);
//! session.update_field_style(&id, &FieldPatch::default().font_size(32));
//!
//! assert_eq!(session.selected_field().map(|f| f.font_size), Some(32));
//! ```
//!
//! Selection is a weak reference: the stored id is resolved against the live
//! field list on every read, so deleting a field can never leave a dangling
//! selection behind.

pub mod drag;

pub use drag::{DragGesture, PreviewTransform};

use crate::error::{LaurelError, Result};
use crate::store::TemplateStore;
use crate::template::{CanvasSize, Field, FieldId, FieldPatch, Template};

/// One authoring session over one unsaved template.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    name: String,
    canvas: CanvasSize,
    background_image: Option<String>,
    fields: Vec<Field>,
    selected: Option<FieldId>,
}

impl EditorSession {
    /// An empty session on the default 800x600 canvas.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }

    // ---- draft settings ----

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    /// Change the canvas size. Field coordinates are left as they are.
    pub fn set_canvas_size(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    pub fn background_image(&self) -> Option<&str> {
        self.background_image.as_deref()
    }

    /// Set the background as an inline `data:` URL.
    pub fn set_background_image(&mut self, data_url: impl Into<String>) {
        self.background_image = Some(data_url.into());
    }

    pub fn clear_background_image(&mut self) {
        self.background_image = None;
    }

    // ---- fields ----

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }

    fn field_mut(&mut self, id: &FieldId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| &f.id == id)
    }

    /// Append a defaulted field and select it.
    pub fn add_field(&mut self) -> FieldId {
        let field = Field::new_default(self.fields.len());
        let id = field.id.clone();
        tracing::debug!(field = %id, "Added field");
        self.fields.push(field);
        self.selected = Some(id.clone());
        id
    }

    /// Select a live field. Unknown ids leave the selection as it was.
    pub fn select_field(&mut self, id: &FieldId) -> bool {
        if self.field(id).is_none() {
            tracing::debug!(field = %id, "Ignoring selection of unknown field");
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    /// Clear the selection (pointer landed on the canvas background).
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Currently selected id, if it still names a live field.
    pub fn selected_id(&self) -> Option<&FieldId> {
        self.selected_field().map(|f| &f.id)
    }

    pub fn selected_field(&self) -> Option<&Field> {
        self.selected.as_ref().and_then(|id| self.field(id))
    }

    /// Commit a drag: overwrite the field's canvas position.
    pub fn move_field(&mut self, id: &FieldId, x: i32, y: i32) -> bool {
        match self.field_mut(id) {
            Some(field) => {
                field.x = x;
                field.y = y;
                tracing::debug!(field = %id, x, y, "Moved field");
                true
            }
            None => false,
        }
    }

    /// Merge a partial style into a field.
    pub fn update_field_style(&mut self, id: &FieldId, patch: &FieldPatch) -> bool {
        let Some(field) = self.field_mut(id) else {
            return false;
        };
        patch.apply(field);
        let outside = field.outside_editor_ranges();
        if !outside.is_empty() {
            tracing::debug!(field = %id, ?outside, "Field style outside editor ranges");
        }
        true
    }

    /// Remove a field, clearing the selection if it pointed at it.
    pub fn delete_field(&mut self, id: &FieldId) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| &f.id != id);
        if self.fields.len() == before {
            return false;
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        tracing::debug!(field = %id, "Deleted field");
        true
    }

    // ---- persistence ----

    /// Snapshot of the draft as an unsaved template. The name is kept exactly
    /// as typed.
    pub fn to_template(&self) -> Template {
        let mut template = Template::new(self.name.clone(), self.canvas);
        template.background_image = self.background_image.clone();
        template.fields = self.fields.clone();
        template
    }

    /// Persist the draft as a new template.
    ///
    /// An empty or whitespace-only name fails with `Validation` before the
    /// store is contacted. Surrounding whitespace only matters for that check;
    /// the name is stored as typed. On success the session is cleared (name, fields,
    /// background, selection; the canvas size is kept) and the stored template
    /// is returned. On failure the session is left exactly as it was.
    ///
    /// The session stays mutably borrowed until the store answers, so no edit
    /// can race an in-flight save.
    pub async fn save(&mut self, store: &dyn TemplateStore) -> Result<Template> {
        if self.name.trim().is_empty() {
            return Err(LaurelError::Validation(
                "Please enter a template name".to_string(),
            ));
        }

        let stored = store.create_template(self.to_template()).await?;
        tracing::info!(
            id = stored.id.as_deref().unwrap_or_default(),
            name = %stored.name,
            fields = stored.fields.len(),
            "Template saved"
        );

        *self = Self::with_canvas(self.canvas);
        Ok(stored)
    }
}
