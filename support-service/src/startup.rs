//! Application startup and lifecycle management.

use crate::config::SupportConfig;
use crate::handlers;
use crate::services::pipeline::ChatPipeline;
use crate::services::providers::{
    ChatProvider, MockChatProvider, OpenAiChatProvider, OpenAiProviderConfig,
};
use crate::services::regions::{RegionResolver, StaticRegionTable};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: SupportConfig,
    pub pipeline: ChatPipeline,
    pub provider: Arc<dyn ChatProvider>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration, selecting the
    /// real or mock chat provider from the enabled flag.
    pub async fn build(config: SupportConfig) -> Result<Self, AppError> {
        let provider: Arc<dyn ChatProvider> = if config.openai.enabled {
            tracing::info!(
                chat_model = %config.openai.chat_model,
                analysis_model = %config.openai.analysis_model,
                "Initialized OpenAI chat provider"
            );
            Arc::new(OpenAiChatProvider::new(OpenAiProviderConfig {
                api_key: config.openai.api_key.clone(),
                model: config.openai.chat_model.clone(),
            }))
        } else {
            tracing::info!("OpenAI provider disabled, using mock chat provider");
            Arc::new(MockChatProvider::new(true))
        };

        Self::build_with_provider(config, provider).await
    }

    /// Build with an explicit provider. Integration tests use this to
    /// inject scripted or failing providers.
    pub async fn build_with_provider(
        config: SupportConfig,
        provider: Arc<dyn ChatProvider>,
    ) -> Result<Self, AppError> {
        let regions: Arc<dyn RegionResolver> = Arc::new(StaticRegionTable);

        let pipeline = ChatPipeline::new(
            provider.clone(),
            regions,
            config.openai.chat_model.clone(),
            config.openai.analysis_model.clone(),
        );

        let state = AppState {
            config: config.clone(),
            pipeline,
            provider,
        };

        // Port 0 = random port for testing.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Support service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = Router::new()
            .route("/chat", post(handlers::chat::chat))
            .route("/health", get(handlers::health::health_check))
            .route("/ready", get(handlers::health::readiness_check))
            .route("/test-resources", get(handlers::chat::test_resources))
            .layer(TraceLayer::new_for_http())
            // The widget is served from a different origin.
            .layer(CorsLayer::permissive())
            .with_state(self.state);

        axum::serve(self.listener, router).await
    }
}
