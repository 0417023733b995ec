//! Shared application state.

use std::sync::Arc;

use crate::app_config::ServerConfig;
use crate::document::DocumentRenderer;
use crate::translation::TranslationService;

/// State shared by all handlers. Everything inside is read-only.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<TranslationService>,
    pub renderer: Arc<DocumentRenderer>,
    /// Request limits and download location
    pub server: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        service: TranslationService,
        renderer: DocumentRenderer,
        server: ServerConfig,
    ) -> Self {
        Self {
            service: Arc::new(service),
            renderer: Arc::new(renderer),
            server: Arc::new(server),
        }
    }
}
