//! # Template Store
//!
//! Thin async interface to the persistence service that holds saved templates.
//!
//! ## Available Stores
//!
//! - [`MemoryStore`]: process-local, used by tests and `serve` without a data dir
//! - [`FileStore`]: one JSON document per template in a directory
//! - [`HttpStore`]: client for a remote `/api/templates` service
//!
//! Stores assign a fresh `id` and `createdAt` on every create. There is no
//! update: saving an edited template again creates a new record.

mod file;
mod http;
mod memory;

pub use file::FileStore;
pub use http::HttpStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::template::Template;

/// Persistence collaborator for templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// All saved templates, oldest first.
    async fn list_templates(&self) -> Result<Vec<Template>>;

    /// A single template by id.
    async fn get_template(&self, id: &str) -> Result<Template>;

    /// Persist a new record. Any `id` on the input is ignored.
    async fn create_template(&self, template: Template) -> Result<Template>;

    /// Remove a record. Missing ids yield `NotFound`.
    async fn delete_template(&self, id: &str) -> Result<()>;
}

/// Validate and stamp a template with a fresh identity.
pub(crate) fn materialize(mut template: Template) -> Result<Template> {
    template.validate_for_create()?;
    template.id = Some(Uuid::new_v4().to_string());
    template.created_at = Some(Utc::now());
    Ok(template)
}
