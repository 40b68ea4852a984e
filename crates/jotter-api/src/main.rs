use std::sync::Arc;

use jotter_api::{app_router, AppConfig, AppState};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Only load .env in development; production uses platform-native env injection.
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();

    let directive: Directive = "jotter_api=info".parse()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!("Starting jotter-api with config: {:?}", config);

    let state = AppState::from_config(config).await?;
    let bind_addr = state.config.bind_addr.clone();
    let router = app_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("jotter-api listening on {}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
