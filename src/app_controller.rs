use anyhow::{Context, Result};
use axum::Router;
use log::{info, warn};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::app_config::Config;
use crate::document::DocumentRenderer;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::providers::Provider;
use crate::providers::openai::OpenAi;
use crate::server::{AppState, create_router};
use crate::translation::TranslationService;

// @module: Application controller wiring configuration, services and the HTTP server

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Shared handler state
    state: AppState,
}

impl Controller {
    // @method: Create a controller talking to the configured upstream API
    pub fn with_config(config: Config) -> Result<Self> {
        let provider: Arc<dyn Provider> = Arc::new(OpenAi::new(&config.upstream));
        Self::with_provider(config, provider)
    }

    // @method: Create a controller with an explicit provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Result<Self> {
        FileManager::ensure_dir(&config.server.download_dir)
            .context("Failed to prepare the download directory")?;

        let service = TranslationService::new(provider, config.translation.separator.clone());
        let renderer = DocumentRenderer::new(
            config.server.download_dir.clone(),
            config.translation.document_footer.clone(),
        );
        let state = AppState::new(service, renderer, config.server.clone());

        Ok(Self { config, state })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Router serving all endpoints
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Bind the listener and serve until Ctrl-C
    pub async fn run(&self) -> Result<(), AppError> {
        let address = self.config.server.bind_address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            AppError::Config(format!("Failed to bind {}: {}", address, e))
        })?;

        info!(
            "Listening on http://{} (model: {}, documents in {:?})",
            address, self.config.upstream.model, self.config.server.download_dir
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, finishing open requests"),
        Err(e) => {
            warn!("Failed to listen for the shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
