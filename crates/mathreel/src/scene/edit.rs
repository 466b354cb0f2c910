use super::{report, spinner, RenderFlags};
use crate::pipeline::{edit_and_render, Services};
use crate::prelude::*;
use mathreel_core::gallery::{default_scene, example_code, EXAMPLE_SCENES};
use mathreel_core::pipeline::Stage;
use std::path::PathBuf;

/// Options for editing an existing scene with an instruction
#[derive(Debug, clap::Args, Clone)]
pub struct EditOptions {
    /// How the scene should change (e.g. "move the text to the left")
    #[clap(value_name = "INSTRUCTION")]
    pub instruction: String,

    /// Scene file to edit
    #[arg(long, short = 'f', conflicts_with = "example")]
    pub file: Option<PathBuf>,

    /// Start from a gallery scene instead of a file (see `mathreel examples`)
    #[arg(long)]
    pub example: Option<String>,

    /// Write the edited scene back to --file when the render succeeds
    #[arg(long, requires = "file")]
    pub in_place: bool,

    #[clap(flatten)]
    pub flags: RenderFlags,
}

/// Resolve the scene the edit starts from.
async fn load_code(options: &EditOptions) -> Result<String> {
    if let Some(path) = &options.file {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read scene from {}", path.display()));
    }

    match &options.example {
        Some(name) => {
            let code = example_code(name);
            if code.is_empty() {
                let names: Vec<&str> = EXAMPLE_SCENES.iter().map(|s| s.name).collect();
                return Err(Error::InvalidRequest(format!(
                    "Unknown example '{}'. Available: {}",
                    name,
                    names.join(", ")
                ))
                .into());
            }
            Ok(code.to_string())
        }
        None => Ok(default_scene().code.to_string()),
    }
}

/// Handle the edit command
pub async fn handler(options: EditOptions, global: crate::Global) -> Result<()> {
    let code = load_code(&options).await?;
    let services = Services::from_settings(&global.settings)?;

    let spinner = spinner();
    let update = edit_and_render(
        &services,
        &code,
        &options.instruction,
        options.flags.quality.into(),
        options.flags.format.into(),
        Some(&spinner),
    )
    .await;
    spinner.finish_and_clear();

    if options.in_place && update.stage == Stage::Finished {
        if let Some(path) = &options.file {
            tokio::fs::write(path, &update.code)
                .await
                .with_context(|| format!("Failed to write scene to {}", path.display()))?;
            info!("Updated {}", path.display());
        }
    }

    report(&update, options.flags.json, global.verbose)
}
