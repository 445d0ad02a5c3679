use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
#[cfg(not(debug_assertions))]
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin};
use tower_http::trace::TraceLayer;

use crate::{
    database::Database,
    error::CatalogResult,
    http_server::{
        http_routes::{movies, summary},
        state::AppState,
    },
    ports::text_generator::TextGenerator,
    services::{movie::MovieRepository, summary::SummaryComposer},
};

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    movies: u64,
}

async fn root(State(app_state): State<Arc<AppState>>) -> CatalogResult<Json<Health>> {
    let movies = app_state.movies.count().await?;
    Ok(Json(Health { status: "ok", movies }))
}

pub struct HttpServerConfig {
    pub port: u16,
    pub database: Arc<Database>,
    pub text_generator: Arc<dyn TextGenerator>,
}

pub fn router(app_state: Arc<AppState>) -> Router {
    #[cfg(debug_assertions)]
    let cors_layer = CorsLayer::permissive();

    #[cfg(not(debug_assertions))]
    let cors_layer = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(AllowMethods::list([
            axum::http::Method::GET,
            axum::http::Method::POST,
        ]))
        .allow_headers(AllowHeaders::list([axum::http::header::CONTENT_TYPE]));

    Router::new()
        .route("/", get(root))
        .route("/movies/", post(movies::create_movie))
        .route("/movies/random/", get(movies::random_movie))
        .route("/movies/{id}/", get(movies::get_movie))
        .route("/generate_summary/", post(summary::generate_summary))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(app_state)
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState {
        movies: MovieRepository::new(config.database),
        summaries: SummaryComposer::new(config.text_generator),
    });

    let app = router(app_state);

    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", port))?;
    log::info!("Listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Failed to start HTTP server")?;

    log::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
