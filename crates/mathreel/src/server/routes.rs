use super::AppState;
use crate::pipeline::{edit_and_render, render_code, spawn_generation};
use crate::prelude::*;
use crate::scene::examples::{gallery, Gallery};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    Json,
};
use futures::stream::{Stream, StreamExt};
use mathreel_core::pipeline::PipelineUpdate;
use mathreel_core::render::{is_artifact_name, Format, Quality};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub format: Format,
}

#[derive(Debug, Deserialize)]
pub struct EditBody {
    pub code: String,
    pub instruction: String,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub format: Format,
}

#[derive(Debug, Deserialize)]
pub struct RenderBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub format: Format,
}

/// A pipeline update plus where a browser can fetch the finished clip.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    #[serde(flatten)]
    pub update: PipelineUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl UpdateResponse {
    fn new(update: PipelineUpdate, output_dir: &Path) -> Self {
        let media_url = update
            .media_path
            .as_deref()
            .and_then(|path| path.strip_prefix(output_dir).ok())
            .map(|relative| format!("/media/{}", relative.display()));

        Self { update, media_url }
    }
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateBody>,
) -> std::result::Result<Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>>, Error> {
    if body.prompt.trim().is_empty() {
        return Err(Error::InvalidRequest("prompt is empty".to_string()));
    }
    info!("Generation requested: {:?}", body.prompt);

    let updates = spawn_generation(state.services.clone(), body.prompt, body.quality, body.format);
    let stream = updates.map(move |update| {
        Event::default()
            .event("update")
            .json_data(UpdateResponse::new(update, &state.output_dir))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EditBody>,
) -> std::result::Result<Json<UpdateResponse>, Error> {
    if body.instruction.trim().is_empty() {
        return Err(Error::InvalidRequest("instruction is empty".to_string()));
    }

    let update = edit_and_render(
        &state.services,
        &body.code,
        &body.instruction,
        body.quality,
        body.format,
        None,
    )
    .await;

    Ok(Json(UpdateResponse::new(update, &state.output_dir)))
}

pub async fn render(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RenderBody>,
) -> Json<UpdateResponse> {
    let update = render_code(&state.services, &body.code, body.quality, body.format).await;
    Json(UpdateResponse::new(update, &state.output_dir))
}

pub async fn examples() -> Json<Gallery> {
    Json(gallery())
}

/// Let `/media` through only for finished clips directly under the output
/// directory. Anything else in there is not ours to serve.
pub async fn only_artifacts(request: Request, next: Next) -> Response {
    let name = request.uri().path().trim_start_matches('/');
    if !is_artifact_name(name) {
        debug!("Refusing media request for {:?}", request.uri().path());
        return StatusCode::NOT_FOUND.into_response();
    }

    next.run(request).await
}
