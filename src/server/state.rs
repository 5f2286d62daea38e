//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::RenderConfig;
use crate::render::FontBook;
use crate::store::TemplateStore;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Directory for the JSON template store; in-memory when unset.
    pub data_dir: Option<PathBuf>,
    pub render: RenderConfig,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<dyn TemplateStore>,
    pub fonts: Arc<FontBook>,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn TemplateStore>, fonts: Arc<FontBook>) -> Self {
        Self {
            config,
            store,
            fonts,
        }
    }
}
