use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use novel_reader::DEFAULT_LANGUAGE;
use novel_reader_mt::{ModelFallbackClient, SessionHandle, TranslatorConfig};

mod handlers;

use handlers::AppState;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = TranslatorConfig::from_env()
        .map_err(|e| format!("Invalid translator configuration: {}", e))?;
    if !config.has_credentials() {
        warn!("GEMINI_API_KEY is not set; every translation will fail with missing credentials");
    }
    let client = ModelFallbackClient::from_config(&config)
        .map_err(|e| format!("Failed to initialize translator: {}", e))?;
    info!(?client, "translator ready");

    let session = SessionHandle::spawn(client.clone(), DEFAULT_LANGUAGE);
    let state = AppState::new(Arc::new(client), session);

    info!("📖 Starting novel-reader web server");

    let app = router(state);

    let addr = std::env::var("NOVEL_READER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/languages", get(handlers::list_languages))
        .route("/api/translate", post(handlers::translate_text))
        .route("/api/document", post(handlers::open_document))
        .route("/api/document/reset", post(handlers::reset_document))
        .route("/api/document/page", post(handlers::change_page))
        .route("/api/document/zoom", post(handlers::change_zoom))
        .route("/api/session", get(handlers::session_panel))
        .route("/api/session/selection", post(handlers::session_selection))
        .route("/api/session/language", post(handlers::session_language))
        .route("/api/session/close", post(handlers::session_close))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
