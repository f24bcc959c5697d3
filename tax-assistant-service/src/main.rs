use dotenvy::dotenv;
use service_core::observability::init_tracing;
use tax_assistant_service::config::AssistantConfig;
use tax_assistant_service::services::metrics::init_metrics;
use tax_assistant_service::startup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing("tax-assistant-service", "info", otlp_endpoint.as_deref());

    init_metrics();

    let config = AssistantConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let app = Application::build(config).await?;
    tracing::info!(port = app.port(), "Starting tax-assistant-service");

    app.run_until_stopped().await?;

    Ok(())
}
