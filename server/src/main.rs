mod config;
mod routes;
mod services;
mod state;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let settings = match config::Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        environment = %settings.environment,
        network = %settings.network,
        algod = %settings.algod_url,
        indexer = %settings.indexer_url,
        algod_token_set = !settings.algod_token.is_empty(),
        "configuration loaded"
    );

    let state = state::AppState::new(&settings);
    let port = settings.port;
    let app = routes::app(state, &settings);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %port, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%port, "hosconnect api listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
