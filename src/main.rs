use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, RestConfig};
use symptom_core::CoreConfig;

/// Main entry point for the symptom checker backend
///
/// Loads the condition table, configures the optional AI provider and serves the REST API
/// (with OpenAPI/Swagger UI) on the configured address.
///
/// # Environment Variables
/// - `SYMPTOM_REST_ADDR`: Full listen address; wins over `PORT`
/// - `PORT`: Listen port on 0.0.0.0 (default: 5000)
/// - `SYMPTOMS_CSV`: Condition table CSV (default: "symptoms.csv", built-in table if unreadable)
/// - `GEMINI_API_KEY`: AI provider key; chat uses fallback scripts when unset
/// - `GEMINI_MODEL`, `GEMINI_API_BASE`: AI provider model and endpoint overrides
/// - `AI_TIMEOUT_SECS`: Upper bound on each provider call (default: 20)
/// - `CORS_ALLOWED_ORIGINS`: Comma-separated allowed origins
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration is invalid, or startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("symptom_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("symptom_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env_values(
        std::env::var("SYMPTOMS_CSV").ok(),
        std::env::var("GEMINI_API_KEY").ok(),
        std::env::var("GEMINI_MODEL").ok(),
        std::env::var("GEMINI_API_BASE").ok(),
        std::env::var("AI_TIMEOUT_SECS").ok(),
    )?;
    let rest_cfg = RestConfig::from_env_values(
        std::env::var("SYMPTOM_REST_ADDR").ok(),
        std::env::var("PORT").ok(),
        std::env::var("CORS_ALLOWED_ORIGINS").ok(),
    )?;

    let state = AppState::from_config(&cfg)?;
    let app = api_rest::app(state, rest_cfg.cors_layer());

    tracing::info!("-- Starting symptom checker REST API on {}", rest_cfg.addr());

    let listener = tokio::net::TcpListener::bind(rest_cfg.addr()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
