use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use ecg_core::config::{
    predict_url_from_env_value, report_dir_from_env_value, request_timeout_from_env_value,
};
use ecg_core::CoreConfig;

/// Main entry point for the ECG diagnosis front-end
///
/// Serves the routed pages, the diagnosis and contact form posts, `/health`, and the Swagger UI.
///
/// # Environment Variables
/// - `ECG_WEB_ADDR`: listen address (default: "0.0.0.0:3000")
/// - `ECG_PREDICT_URL`: prediction endpoint (default: "http://localhost:5001/predict")
/// - `ECG_REQUEST_TIMEOUT_SECS`: whole-request timeout in seconds; unset or `0` waits indefinitely
/// - `ECG_REPORT_DIR`: directory the CLI saves reports into (default: ".")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration is invalid or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("ecg=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("ECG_WEB_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

    let cfg = CoreConfig::new(
        predict_url_from_env_value(std::env::var("ECG_PREDICT_URL").ok())?,
        request_timeout_from_env_value(std::env::var("ECG_REQUEST_TIMEOUT_SECS").ok())?,
        report_dir_from_env_value(std::env::var("ECG_REPORT_DIR").ok()),
    )?;

    tracing::info!("++ Starting ECG front-end on {}", addr);
    tracing::info!("++ Prediction endpoint {}", cfg.predict_url());

    let app = api_rest::router(AppState::new(&cfg)?);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
