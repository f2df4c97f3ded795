mod config;
mod routes;
mod state;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::MockApiConfig::from_env();
    let state = state::AppState::new(&config);
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, latency = ?config.latency, "mock api listening");
    axum::serve(listener, app).await
}
