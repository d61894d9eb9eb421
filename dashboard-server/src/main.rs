use dashboard_core::Config;
use dashboard_server::{api::app_router, build_state, config::ServerConfig, init_tracing};
use tower_http::services::{ServeDir, ServeFile};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads `.env` as well, so it runs before the server settings are read.
    let config = Config::load_with_env()?;
    let server = ServerConfig::from_env()?;
    init_tracing(server.log_json);

    let state = build_state(&config, &server);

    let static_dir = std::path::PathBuf::from(&server.static_dir);
    let index_file = static_dir.join("index.html");
    let static_service = ServeDir::new(static_dir).fallback(ServeFile::new(index_file));
    let router = app_router(state, &server).fallback_service(static_service);

    tracing::info!("Server running on http://localhost:{}", server.listen_addr.port());
    let listener = tokio::net::TcpListener::bind(server.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
