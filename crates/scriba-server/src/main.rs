use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod handlers;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("scriba=info".parse().unwrap()),
        )
        .init();

    let config = scriba_core::ExtractorConfig::from_env();
    let host = config.server_host.clone();
    let port = config.server_port;

    let client = Arc::new(
        scriba_client::GeminiClient::new(&config)
            .expect("Gemini API key is not configured; set GEMINI_API_KEY"),
    );
    let extractor = Arc::new(scriba_extraction::PdfExtractor::new(
        client,
        config.clone(),
    ));

    let state = AppState { config, extractor };

    let app = routes::create_router()
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{host}:{port}");
    tracing::info!("scriba server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
