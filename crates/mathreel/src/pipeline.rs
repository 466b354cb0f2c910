use crate::config::Settings;
use crate::llm::LlmClient;
use crate::prelude::*;
use crate::renderer::Renderer;
use async_channel::{Receiver, Sender};
use indicatif::ProgressBar;
use mathreel_core::failure::{Failure, FailureKind};
use mathreel_core::pipeline::{
    could_not_generate, joined_status, render_went_wrong, PipelineUpdate, Stage, STATUS_CODE_READY,
    STATUS_COMPLETE, STATUS_EMPTY_CODE, STATUS_RENDERING, STATUS_THINKING,
};
use mathreel_core::render::{Format, Quality};
use mathreel_core::scene::{extract_code, EditRequest, GenerationRequest};
use std::sync::Arc;

/// Updates buffered between the pipeline task and a slow consumer.
const UPDATE_BUFFER: usize = 8;

/// The two collaborators every pipeline run needs.
///
/// Nothing here changes between runs; scratch state lives inside each call.
pub struct Services {
    pub llm: LlmClient,
    pub renderer: Renderer,
}

impl Services {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            llm: LlmClient::new(&settings.llm_config())?,
            renderer: Renderer::new(settings.renderer_config()?),
        })
    }
}

/// Prompt to scene to clip, reporting each stage on `updates`.
///
/// Emits `Started`, then either a single `Failed` (generation failed, nothing is
/// rendered) or `CodeReady`, `Rendering` and a final `Finished`/`Failed`. Stops
/// early if the receiver goes away.
pub async fn generate_full(
    services: &Services,
    prompt: &str,
    quality: Quality,
    format: Format,
    updates: &Sender<PipelineUpdate>,
) {
    if !emit(updates, PipelineUpdate::progress(Stage::Started, STATUS_THINKING, "")).await {
        return;
    }

    let request = GenerationRequest {
        prompt: prompt.to_string(),
    };
    let reply = match services.llm.generate(&request, None).await {
        Ok(reply) => reply,
        Err(failure) => {
            warn!("Generation failed: {}", failure.kind);
            let status = could_not_generate(&failure.message);
            emit(updates, PipelineUpdate::failed(&failure, status, "")).await;
            return;
        }
    };

    let code = extract_code(&reply.text);
    info!("{}", reply.status);

    if !emit(updates, PipelineUpdate::progress(Stage::CodeReady, STATUS_CODE_READY, code.as_str())).await {
        return;
    }
    if !emit(updates, PipelineUpdate::progress(Stage::Rendering, STATUS_RENDERING, code.as_str())).await {
        return;
    }

    let last = match services.renderer.render(&code, quality, format).await {
        Ok(artifact) => PipelineUpdate::finished(artifact.path, STATUS_COMPLETE, code, artifact.logs),
        Err(failure) => {
            let status = render_went_wrong(&failure.message);
            PipelineUpdate::failed(&failure, status, code)
        }
    };
    emit(updates, last).await;
}

/// Run [`generate_full`] on its own task and hand back the update stream.
pub fn spawn_generation(
    services: Arc<Services>,
    prompt: String,
    quality: Quality,
    format: Format,
) -> Receiver<PipelineUpdate> {
    let (tx, rx) = async_channel::bounded(UPDATE_BUFFER);

    tokio::spawn(async move {
        generate_full(&services, &prompt, quality, format, &tx).await;
    });

    rx
}

/// Apply an instruction to existing code, then render the result.
///
/// If the edit fails the original code comes back untouched and nothing is
/// rendered.
pub async fn edit_and_render(
    services: &Services,
    existing_code: &str,
    instruction: &str,
    quality: Quality,
    format: Format,
    spinner: Option<&ProgressBar>,
) -> PipelineUpdate {
    let request = EditRequest {
        code: existing_code.to_string(),
        instruction: instruction.to_string(),
    };

    let reply = match services.llm.edit(&request, spinner).await {
        Ok(reply) => reply,
        Err(failure) => {
            warn!("Edit failed: {}", failure.kind);
            return PipelineUpdate::failed(&failure, failure.message.as_str(), existing_code);
        }
    };

    let code = extract_code(&reply.text);
    if let Some(spinner) = spinner {
        spinner.set_message(STATUS_RENDERING);
    }

    match services.renderer.render(&code, quality, format).await {
        Ok(artifact) => PipelineUpdate::finished(
            artifact.path,
            joined_status(&reply.status, &artifact.message),
            code,
            artifact.logs,
        ),
        Err(failure) => {
            let status = joined_status(&reply.status, &failure.message);
            PipelineUpdate::failed(&failure, status, code)
        }
    }
}

/// Render code the user already has, without asking the model.
pub async fn render_code(
    services: &Services,
    code: &str,
    quality: Quality,
    format: Format,
) -> PipelineUpdate {
    if code.trim().is_empty() {
        let failure = Failure::new(FailureKind::Validation, STATUS_EMPTY_CODE);
        return PipelineUpdate::failed(&failure, STATUS_EMPTY_CODE, "");
    }

    match services.renderer.render(code, quality, format).await {
        Ok(artifact) => PipelineUpdate::finished(artifact.path, artifact.message, code, artifact.logs),
        Err(failure) => PipelineUpdate::failed(&failure, failure.message.as_str(), code),
    }
}

/// Send an update. `false` once nobody is listening.
async fn emit(updates: &Sender<PipelineUpdate>, update: PipelineUpdate) -> bool {
    debug!("Pipeline stage {:?}", update.stage);
    updates.send(update).await.is_ok()
}
