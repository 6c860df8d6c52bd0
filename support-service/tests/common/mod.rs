use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use std::time::Duration;
use support_service::config::{OpenAiConfig, SupportConfig};
use support_service::services::providers::ChatProvider;
use support_service::startup::Application;

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    /// Spawn the app on a random port with the mock chat provider.
    pub async fn spawn() -> Self {
        let app = Application::build(test_config())
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    /// Spawn with an explicit provider (scripted or failing mocks).
    pub async fn spawn_with_provider(provider: Arc<dyn ChatProvider>) -> Self {
        let app = Application::build_with_provider(test_config(), provider)
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    async fn run(app: Application) -> Self {
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to come up by polling the health endpoint.
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp { address }
    }
}

fn test_config() -> SupportConfig {
    SupportConfig {
        common: CoreConfig {
            port: 0, // Random port
            log_level: "info".to_string(),
        },
        openai: OpenAiConfig {
            api_key: "test-key".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            analysis_model: "gpt-3.5-turbo".to_string(),
            enabled: false, // Use mock
        },
    }
}
