//! Drag gestures and preview-space conversion.
//!
//! A drag is transient: pointer moves update only the [`DragGesture`], and the
//! session sees exactly one [`EditorSession::move_field`] call on release.
//!
//! The editor canvas may be displayed zoomed. [`PreviewTransform`] maps screen
//! pixels back to canvas pixels so the committed position never carries the
//! display zoom.

use super::EditorSession;
use crate::template::FieldId;

/// Cosmetic zoom and offset applied when displaying a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewTransform {
    /// Screen pixels per canvas pixel.
    pub scale: f32,
    /// Screen position of the canvas origin.
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for PreviewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl PreviewTransform {
    pub const fn identity() -> Self {
        Self {
            scale: 1.0,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }

    pub fn scaled(scale: f32) -> Self {
        Self {
            scale,
            ..Self::identity()
        }
    }

    /// Screen point → canvas point, rounded to whole pixels.
    pub fn to_canvas(&self, screen_x: f32, screen_y: f32) -> (i32, i32) {
        let scale = self.effective_scale();
        (
            ((screen_x - self.origin_x) / scale).round() as i32,
            ((screen_y - self.origin_y) / scale).round() as i32,
        )
    }

    /// Canvas point → screen point.
    pub fn to_screen(&self, canvas_x: i32, canvas_y: i32) -> (f32, f32) {
        let scale = self.effective_scale();
        (
            canvas_x as f32 * scale + self.origin_x,
            canvas_y as f32 * scale + self.origin_y,
        )
    }

    /// Screen distance → canvas distance (no rounding).
    fn delta_to_canvas(&self, dx: f32, dy: f32) -> (f32, f32) {
        let scale = self.effective_scale();
        (dx / scale, dy / scale)
    }

    fn effective_scale(&self) -> f32 {
        if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        }
    }
}

/// An in-progress drag of one field.
#[derive(Debug, Clone)]
pub struct DragGesture {
    field: FieldId,
    transform: PreviewTransform,
    start_x: i32,
    start_y: i32,
    pointer_start: (f32, f32),
    current: (i32, i32),
}

impl DragGesture {
    /// Start dragging `id` from the given screen pointer position.
    ///
    /// Returns `None` if the field does not exist.
    pub fn begin(
        session: &EditorSession,
        id: &FieldId,
        pointer_x: f32,
        pointer_y: f32,
        transform: PreviewTransform,
    ) -> Option<Self> {
        let field = session.field(id)?;
        Some(Self {
            field: id.clone(),
            transform,
            start_x: field.x,
            start_y: field.y,
            pointer_start: (pointer_x, pointer_y),
            current: (field.x, field.y),
        })
    }

    pub fn field(&self) -> &FieldId {
        &self.field
    }

    /// Track the pointer. Only the gesture changes; the session is untouched.
    pub fn pointer_moved(&mut self, pointer_x: f32, pointer_y: f32) {
        let (dx, dy) = self.transform.delta_to_canvas(
            pointer_x - self.pointer_start.0,
            pointer_y - self.pointer_start.1,
        );
        self.current = (
            self.start_x + dx.round() as i32,
            self.start_y + dy.round() as i32,
        );
    }

    /// Canvas position the field would land at if released now.
    pub fn position(&self) -> (i32, i32) {
        self.current
    }

    /// Commit the final position to the session.
    ///
    /// Returns `false` if the field was deleted while being dragged.
    pub fn release(self, session: &mut EditorSession) -> bool {
        let (x, y) = self.current;
        session.move_field(&self.field, x, y)
    }
}
