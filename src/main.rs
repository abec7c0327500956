use actix_web::HttpServer;
use quill_api::{AppConfig, AppState, create_app};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // JSON logs; verbosity comes from RUST_LOG and defaults to info
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    let state = AppState::new(&config).map_err(std::io::Error::other)?;

    state
        .seed_admin(&config.admin_seed)
        .await
        .map_err(std::io::Error::other)?;

    let addr = config.server.bind_address();
    info!(address = %addr, version = env!("CARGO_PKG_VERSION"), "Starting Quill API");

    HttpServer::new(move || create_app(state.clone(), &config))
        .bind(addr)?
        .run()
        .await
}
