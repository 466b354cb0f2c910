mod cli;
mod routes;

pub use cli::ServeOptions;

use crate::pipeline::Services;
use crate::prelude::{eprintln, *};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// Shared by every request. Each pipeline run keeps its own scratch state.
pub struct AppState {
    pub services: Arc<Services>,
    pub output_dir: PathBuf,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let media = Router::new()
        .fallback_service(ServeDir::new(&state.output_dir))
        .layer(middleware::from_fn(routes::only_artifacts));

    Router::new()
        .route("/api/generate", post(routes::generate))
        .route("/api/edit", post(routes::edit))
        .route("/api/render", post(routes::render))
        .route("/api/examples", get(routes::examples))
        .nest_service("/media", media)
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn run_serve(options: ServeOptions, global: crate::Global) -> Result<()> {
    let state = AppState {
        services: Arc::new(Services::from_settings(&global.settings)?),
        output_dir: global.settings.output_dir(),
    };

    tokio::fs::create_dir_all(&state.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", state.output_dir.display()))?;

    let addr = format!("{}:{}", options.host, options.port);

    if global.verbose {
        let renderer = state.services.renderer.config();
        eprintln!(
            "Renderer: {} {} (timeout {}s)",
            renderer.program,
            renderer.args.join(" "),
            renderer.timeout.as_secs()
        );
        eprintln!("Serving animations from {}", state.output_dir.display());
        eprintln!("Generate endpoint: http://{}/api/generate", addr);
        eprintln!("Edit endpoint: http://{}/api/edit", addr);
        eprintln!("Render endpoint: http://{}/api/render", addr);
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}
