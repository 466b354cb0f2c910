use super::{report, spinner, RenderFlags};
use crate::pipeline::{spawn_generation, Services};
use crate::prelude::*;
use mathreel_core::pipeline::PipelineUpdate;
use std::path::PathBuf;
use std::sync::Arc;

/// Options for generating an animation from a prompt
#[derive(Debug, clap::Args, Clone)]
pub struct GenerateOptions {
    /// What the animation should explain (e.g. "explain bubble sort algorithm")
    #[clap(value_name = "PROMPT")]
    pub prompt: String,

    /// Also write the generated scene to this file
    #[arg(long, value_name = "FILE")]
    pub save_code: Option<PathBuf>,

    #[clap(flatten)]
    pub flags: RenderFlags,
}

/// Handle the generate command
pub async fn handler(options: GenerateOptions, global: crate::Global) -> Result<()> {
    if options.prompt.trim().is_empty() {
        return Err(Error::InvalidRequest("Prompt is empty".to_string()).into());
    }

    let services = Arc::new(Services::from_settings(&global.settings)?);

    let spinner = spinner();
    let updates = spawn_generation(
        services,
        options.prompt.clone(),
        options.flags.quality.into(),
        options.flags.format.into(),
    );

    let mut last: Option<PipelineUpdate> = None;
    while let Ok(update) = updates.recv().await {
        spinner.set_message(update.status.clone());
        last = Some(update);
    }
    spinner.finish_and_clear();

    let last = last.ok_or_else(|| eyre!("Pipeline ended without an update"))?;

    if let Some(path) = &options.save_code {
        if !last.code.is_empty() {
            tokio::fs::write(path, &last.code)
                .await
                .with_context(|| format!("Failed to write scene to {}", path.display()))?;
            info!("Scene written to {}", path.display());
        }
    }

    report(&last, options.flags.json, global.verbose)
}
