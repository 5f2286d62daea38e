//! # Laurel - Certificate Template Library
//!
//! Laurel designs certificate templates and renders them into fixed-size
//! documents. It provides:
//!
//! - **Template model**: positioned, styled text fields over a background
//! - **Editor sessions**: add, select, drag, restyle, delete, save
//! - **Fill**: substitute entered values for placeholders
//! - **Export**: rasterize at an oversampling scale into a single-page PDF or PNG
//! - **Stores**: in-memory, JSON directory, and HTTP template stores
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use laurel::{
//!     editor::EditorSession,
//!     export::{ExportSettings, Exporter},
//!     fill::{FillValues, fill},
//!     render::{FontBook, RenderTarget},
//!     store::MemoryStore,
//! };
//!
//! # tokio_test_block(async {
//! let store = MemoryStore::new();
//!
//! // Author a template
//! let mut session = EditorSession::new();
//! session.set_name("Certificate of Achievement");
//! let name_field = session.add_field();
//! session.move_field(&name_field, 300, 250);
//! let template = session.save(&store).await?;
//!
//! // Fill and export it
//! let mut values = FillValues::new();
//! values.set(name_field, "Ada Lovelace");
//!
//! let mut target = RenderTarget::new(Arc::new(FontBook::builtin()));
//! target.mount(fill(&template, &values))?;
//! let doc = Exporter::new(ExportSettings::default()).export(&target)?;
//! assert_eq!(doc.file_name, "Certificate of Achievement_certificate.pdf");
//! # Ok::<(), laurel::LaurelError>(())
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | Field and template data model |
//! | [`editor`] | Authoring sessions and drag gestures |
//! | [`store`] | Template persistence |
//! | [`fill`] | Placeholder substitution |
//! | [`render`] | Text and background compositing |
//! | [`export`] | Single-page document output |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |
//!
//! ## Coordinates
//!
//! A template's `width` × `height` is the only coordinate space. Field
//! positions are absolute canvas pixels in the editor and in the output page
//! alike; display zoom and export oversampling are applied on top and never
//! written back.

pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod fill;
pub mod render;
pub mod server;
pub mod store;
pub mod template;

// Re-exports for convenience
pub use error::LaurelError;
pub use template::{Field, FieldId, Template};
