//! REST client for a remote template service.
//!
//! Speaks the same API that `laurel serve` exposes:
//!
//! | Method | Path | Result |
//! |--------|------|--------|
//! | GET | `/api/templates` | list |
//! | GET | `/api/templates/{id}` | one template |
//! | POST | `/api/templates` | created template |
//! | DELETE | `/api/templates/{id}` | `{"message": …}` |

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::time::Duration;

use super::TemplateStore;
use crate::error::{LaurelError, Result};
use crate::template::Template;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpStore {
    client: reqwest::Client,
    /// `{base}/api/templates`
    collection: Url,
}

impl HttpStore {
    /// Create a client for the service at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("laurel/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| LaurelError::StoreUnavailable(format!("HTTP client: {}", e)))?;
        let collection = Url::parse(&format!(
            "{}/api/templates",
            base_url.trim_end_matches('/')
        ))
        .map_err(|e| LaurelError::Validation(format!("Invalid store URL '{}': {}", base_url, e)))?;
        if collection.cannot_be_a_base() {
            return Err(LaurelError::Validation(format!(
                "Invalid store URL '{}'",
                base_url
            )));
        }
        Ok(Self { client, collection })
    }

    /// URL of one template, with `id` encoded as a single path segment.
    fn item_url(&self, id: &str) -> Result<Url> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(LaurelError::NotFound(format!("Template '{}' not found", id)));
        }
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|_| LaurelError::Validation(format!("Invalid store URL '{}'", self.collection)))?
            .push(id);
        Ok(url)
    }

    /// Check the status and decode the JSON body.
    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| LaurelError::StoreUnavailable(format!("Invalid response body: {}", e)))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }
}

/// Map a non-success HTTP status to the store error taxonomy.
fn status_error(status: StatusCode, body: &str) -> LaurelError {
    let detail = if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body)
    };
    match status {
        StatusCode::NOT_FOUND => LaurelError::NotFound(detail),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            LaurelError::Validation(detail)
        }
        _ => LaurelError::StoreUnavailable(detail),
    }
}

fn transport_error(e: reqwest::Error) -> LaurelError {
    LaurelError::StoreUnavailable(format!("Request failed: {}", e))
}

#[async_trait]
impl TemplateStore for HttpStore {
    async fn list_templates(&self) -> Result<Vec<Template>> {
        let response = self
            .client
            .get(self.collection.clone())
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(response).await
    }

    async fn get_template(&self, id: &str) -> Result<Template> {
        let response = self
            .client
            .get(self.item_url(id)?)
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(response).await
    }

    async fn create_template(&self, mut template: Template) -> Result<Template> {
        template.validate_for_create()?;
        template.id = None;
        template.created_at = None;

        let response = self
            .client
            .post(self.collection.clone())
            .json(&template)
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(response).await
    }

    async fn delete_template(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.item_url(id)?)
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "Template not found"),
            LaurelError::NotFound(_)
        ));
        assert!(matches!(
            status_error(StatusCode::UNPROCESSABLE_ENTITY, ""),
            LaurelError::Validation(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, ""),
            LaurelError::StoreUnavailable(_)
        ));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let store = HttpStore::new("http://localhost:8080/").unwrap();
        assert_eq!(
            store.item_url("abc").unwrap().as_str(),
            "http://localhost:8080/api/templates/abc"
        );
    }

    #[test]
    fn test_item_url_encodes_id() {
        let store = HttpStore::new("http://localhost:8080/prefix").unwrap();
        assert_eq!(
            store.item_url("a/b?c#d").unwrap().as_str(),
            "http://localhost:8080/prefix/api/templates/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn test_item_url_rejects_dot_segments() {
        let store = HttpStore::new("http://localhost:8080").unwrap();
        for id in ["", ".", ".."] {
            assert!(matches!(store.item_url(id), Err(LaurelError::NotFound(_))));
        }
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpStore::new("not a url"),
            Err(LaurelError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_store_unavailable() {
        // Port 9 (discard) on localhost is not expected to run an HTTP server.
        let store = HttpStore::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        assert!(matches!(
            store.list_templates().await,
            Err(LaurelError::StoreUnavailable(_))
        ));
    }
}
