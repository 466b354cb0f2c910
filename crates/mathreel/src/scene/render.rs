use super::{report, spinner, RenderFlags};
use crate::pipeline::{render_code, Services};
use crate::prelude::*;
use mathreel_core::pipeline::STATUS_RENDERING;
use std::path::PathBuf;

/// Options for rendering a scene file without the model
#[derive(Debug, clap::Args, Clone)]
pub struct RenderOptions {
    /// Scene file to render
    #[clap(value_name = "FILE")]
    pub file: PathBuf,

    #[clap(flatten)]
    pub flags: RenderFlags,
}

/// Handle the render command
pub async fn handler(options: RenderOptions, global: crate::Global) -> Result<()> {
    let code = tokio::fs::read_to_string(&options.file)
        .await
        .with_context(|| format!("Failed to read scene from {}", options.file.display()))?;
    let services = Services::from_settings(&global.settings)?;

    let spinner = spinner();
    spinner.set_message(STATUS_RENDERING);
    let update = render_code(
        &services,
        &code,
        options.flags.quality.into(),
        options.flags.format.into(),
    )
    .await;
    spinner.finish_and_clear();

    report(&update, options.flags.json, global.verbose)
}
