//! Directory-backed template store.
//!
//! Each template lives in `<dir>/<id>.json`. Listing reads every document and
//! orders by `createdAt`.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{TemplateStore, materialize};
use crate::error::{LaurelError, Result};
use crate::template::Template;

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            LaurelError::StoreUnavailable(format!("Cannot create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for `id`, or `None` if the id could escape the directory.
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        safe.then(|| self.dir.join(format!("{}.json", id)))
    }
}

fn unavailable(action: &str, path: &Path, e: impl std::fmt::Display) -> LaurelError {
    LaurelError::StoreUnavailable(format!("Failed to {} {}: {}", action, path.display(), e))
}

fn not_found(id: &str) -> LaurelError {
    LaurelError::NotFound(format!("Template '{}' not found", id))
}

#[async_trait]
impl TemplateStore for FileStore {
    async fn list_templates(&self) -> Result<Vec<Template>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| unavailable("read", &self.dir, e))?;

        let mut templates = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| unavailable("read", &self.dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| unavailable("read", &path, e))?;
            match serde_json::from_slice::<Template>(&bytes) {
                Ok(t) => templates.push(t),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable template"),
            }
        }

        templates.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(templates)
    }

    async fn get_template(&self, id: &str) -> Result<Template> {
        let path = self.path_for(id).ok_or_else(|| not_found(id))?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found(id)),
            Err(e) => return Err(unavailable("read", &path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| unavailable("parse", &path, e))
    }

    async fn create_template(&self, template: Template) -> Result<Template> {
        let stored = materialize(template)?;
        let id = stored.id.as_deref().unwrap_or_default();
        let path = self.path_for(id).ok_or_else(|| not_found(id))?;

        let json = serde_json::to_vec_pretty(&stored)
            .map_err(|e| LaurelError::Validation(format!("Cannot serialize template: {}", e)))?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| unavailable("write", &path, e))?;
        Ok(stored)
    }

    async fn delete_template(&self, id: &str) -> Result<()> {
        let path = self.path_for(id).ok_or_else(|| not_found(id))?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found(id)),
            Err(e) => Err(unavailable("delete", &path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{CanvasSize, Field};

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut template = Template::new("Award", CanvasSize::new(400, 800));
        template.fields.push(Field::new_default(0));

        let id = {
            let store = FileStore::open(dir.path()).await.unwrap();
            store.create_template(template.clone()).await.unwrap().id.unwrap()
        };

        let store = FileStore::open(dir.path()).await.unwrap();
        let loaded = store.get_template(&id).await.unwrap();
        assert_eq!(loaded.name, "Award");
        assert_eq!((loaded.width, loaded.height), (400, 800));
        assert_eq!(loaded.fields, template.fields);
        assert_eq!(store.list_templates().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert!(matches!(
            store.delete_template("does-not-exist").await,
            Err(LaurelError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert!(matches!(
            store.get_template("../etc/passwd").await,
            Err(LaurelError::NotFound(_))
        ));
    }
}
