//! # Certificate Flow Tests
//!
//! End-to-end runs through the public API: author a template in an editor
//! session, save it to a store, list it back, fill it and export it.

use async_trait::async_trait;
use image::GenericImageView;
use lopdf::Document;
use pretty_assertions::assert_eq;
use std::sync::Arc;

use laurel::LaurelError;
use laurel::editor::EditorSession;
use laurel::export::{ExportFormat, ExportSettings, Exporter, Orientation};
use laurel::fill::{FillValues, fill};
use laurel::render::{FontBook, RenderTarget};
use laurel::store::{MemoryStore, TemplateStore};
use laurel::template::{CanvasSize, Color, FieldPatch, Template};

// ============================================================================
// HELPERS
// ============================================================================

/// A store whose service is down.
struct FailingStore;

#[async_trait]
impl TemplateStore for FailingStore {
    async fn list_templates(&self) -> laurel::error::Result<Vec<Template>> {
        Err(LaurelError::StoreUnavailable("connection refused".into()))
    }

    async fn get_template(&self, _id: &str) -> laurel::error::Result<Template> {
        Err(LaurelError::StoreUnavailable("connection refused".into()))
    }

    async fn create_template(&self, _template: Template) -> laurel::error::Result<Template> {
        Err(LaurelError::StoreUnavailable("connection refused".into()))
    }

    async fn delete_template(&self, _id: &str) -> laurel::error::Result<()> {
        Err(LaurelError::StoreUnavailable("connection refused".into()))
    }
}

fn media_box(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1, "expected a single page");
    let page_id = *pages.values().next().unwrap();
    doc.get_object(page_id)
        .unwrap()
        .as_dict()
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o.as_i64().unwrap())
        .collect()
}

fn target_for(template: &Template, values: &FillValues) -> RenderTarget {
    let mut target = RenderTarget::new(Arc::new(FontBook::builtin()));
    target.mount(fill(template, values)).unwrap();
    target
}

// ============================================================================
// AUTHORING AND STORAGE
// ============================================================================

#[tokio::test]
async fn test_saved_template_lists_back_unchanged() {
    let store = MemoryStore::new();
    let mut session = EditorSession::new();
    session.set_name("Award");

    let name = session.add_field();
    session.move_field(&name, 300, 250);
    session.update_field_style(
        &name,
        &FieldPatch::default()
            .font_size(32)
            .color(Color::rgb(0x33, 0x33, 0x99))
            .placeholder("Recipient"),
    );
    let date = session.add_field();
    session.move_field(&date, 300, 400);

    let expected_fields = session.fields().to_vec();
    let saved = session.save(&store).await.unwrap();

    assert!(saved.id.is_some());
    assert!(saved.created_at.is_some());

    let listed = store.list_templates().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Award");
    assert_eq!((listed[0].width, listed[0].height), (800, 600));
    assert_eq!(listed[0].fields, expected_fields);

    // Session is fresh for the next design
    assert_eq!(session.name(), "");
    assert!(session.fields().is_empty());
    assert!(session.selected_id().is_none());
}

#[tokio::test]
async fn test_failed_save_leaves_session_untouched() {
    let mut session = EditorSession::new();
    session.set_name("Award");
    let id = session.add_field();
    session.move_field(&id, 120, 80);

    let before = session.to_template();
    let result = session.save(&FailingStore).await;

    assert!(matches!(result, Err(LaurelError::StoreUnavailable(_))));
    assert_eq!(session.to_template(), before);
    assert_eq!(session.selected_id(), Some(&id));
}

// ============================================================================
// FILL AND EXPORT
// ============================================================================

#[tokio::test]
async fn test_landscape_pdf_has_one_template_sized_page() {
    let store = MemoryStore::new();
    let mut session = EditorSession::new();
    session.set_name("Certificate of Achievement");
    let name = session.add_field();
    session.move_field(&name, 300, 250);
    let template = session.save(&store).await.unwrap();

    let mut values = FillValues::new();
    values.set(name, "Ada Lovelace");
    let target = target_for(&template, &values);

    let doc = Exporter::default().export(&target).unwrap();
    assert_eq!(doc.file_name, "Certificate of Achievement_certificate.pdf");
    assert_eq!(doc.orientation, Orientation::Landscape);
    assert_eq!(media_box(&doc.bytes), vec![0, 0, 800, 600]);
    assert_eq!((doc.raster_width, doc.raster_height), (1600, 1200));
}

#[test]
fn test_portrait_pdf_page() {
    let template = Template::new("Diploma", CanvasSize::new(400, 800));
    let target = target_for(&template, &FillValues::new());

    let doc = Exporter::default().export(&target).unwrap();
    assert_eq!(doc.orientation, Orientation::Portrait);
    assert_eq!(media_box(&doc.bytes), vec![0, 0, 400, 800]);
}

#[test]
fn test_png_export_is_template_sized() {
    let template = Template::new("Diploma", CanvasSize::new(400, 800));
    let target = target_for(&template, &FillValues::new());

    let doc = Exporter::new(ExportSettings {
        format: ExportFormat::Png,
        export_scale: 3.0,
    })
    .export(&target)
    .unwrap();

    let img = image::load_from_memory(&doc.bytes).unwrap();
    assert_eq!(img.dimensions(), (400, 800));
    assert_eq!(doc.file_name, "Diploma_certificate.png");
}

#[tokio::test]
async fn test_export_is_repeatable() {
    let store = MemoryStore::new();
    let mut session = EditorSession::new();
    session.set_name("Award");
    let id = session.add_field();
    let template = session.save(&store).await.unwrap();

    let mut values = FillValues::new();
    values.set(id, "Grace Hopper");
    let target = target_for(&template, &values);

    let exporter = Exporter::default();
    let first = exporter.export(&target).unwrap();
    let second = exporter.export(&target).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_filled_text_differs_from_placeholder_render() {
    let store = MemoryStore::new();
    let mut session = EditorSession::new();
    session.set_name("Award");
    let id = session.add_field();
    let template = session.save(&store).await.unwrap();

    let exporter = Exporter::new(ExportSettings {
        format: ExportFormat::Png,
        export_scale: 1.0,
    });
    let blank = exporter
        .export(&target_for(&template, &FillValues::blank_for(&template)))
        .unwrap();

    let mut values = FillValues::new();
    values.set(id, "Grace Hopper");
    let filled = exporter.export(&target_for(&template, &values)).unwrap();

    assert_ne!(blank.bytes, filled.bytes);
}
