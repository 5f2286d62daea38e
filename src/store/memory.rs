//! In-process template store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::{TemplateStore, materialize};
use crate::error::{LaurelError, Result};
use crate::template::Template;

/// Keeps templates in insertion order behind an async lock.
#[derive(Default)]
pub struct MemoryStore {
    templates: RwLock<Vec<Template>>,
    creates: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `create_template` calls seen, successful or not.
    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn list_templates(&self) -> Result<Vec<Template>> {
        Ok(self.templates.read().await.clone())
    }

    async fn get_template(&self, id: &str) -> Result<Template> {
        self.templates
            .read()
            .await
            .iter()
            .find(|t| t.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| LaurelError::NotFound(format!("Template '{}' not found", id)))
    }

    async fn create_template(&self, template: Template) -> Result<Template> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let stored = materialize(template)?;
        self.templates.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn delete_template(&self, id: &str) -> Result<()> {
        let mut templates = self.templates.write().await;
        let before = templates.len();
        templates.retain(|t| t.id.as_deref() != Some(id));
        if templates.len() == before {
            return Err(LaurelError::NotFound(format!("Template '{}' not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{CanvasSize, Field};

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let store = MemoryStore::new();
        let mut template = Template::new("Award", CanvasSize::new(800, 600));
        template.fields.push(Field::new_default(0));

        let stored = store.create_template(template.clone()).await.unwrap();
        assert!(stored.id.is_some());
        assert!(stored.created_at.is_some());

        let listed = store.list_templates().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, template.name);
        assert_eq!(listed[0].fields, template.fields);
    }

    #[tokio::test]
    async fn test_resave_creates_new_record() {
        let store = MemoryStore::new();
        let template = Template::new("Award", CanvasSize::default());
        let a = store.create_template(template.clone()).await.unwrap();
        let b = store.create_template(a.clone()).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list_templates().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let store = MemoryStore::new();
        let stored = store
            .create_template(Template::new("Award", CanvasSize::default()))
            .await
            .unwrap();
        let id = stored.id.unwrap();

        store.delete_template(&id).await.unwrap();
        assert!(matches!(
            store.delete_template(&id).await,
            Err(LaurelError::NotFound(_))
        ));
        assert!(matches!(
            store.get_template(&id).await,
            Err(LaurelError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let store = MemoryStore::new();
        let result = store
            .create_template(Template::new("", CanvasSize::default()))
            .await;
        assert!(matches!(result, Err(LaurelError::Validation(_))));
        assert!(store.list_templates().await.unwrap().is_empty());
    }
}
