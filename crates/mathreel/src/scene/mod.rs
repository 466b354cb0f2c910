pub mod doctor;
pub mod edit;
pub mod examples;
pub mod generate;
pub mod render;

use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mathreel_core::pipeline::{PipelineUpdate, Stage};

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityArg {
    /// 480p at 15 fps (default)
    #[default]
    Low,
    /// Accepted, rendered as low
    Medium,
    /// Accepted, rendered as low
    High,
}

impl From<QualityArg> for mathreel_core::render::Quality {
    fn from(q: QualityArg) -> Self {
        match q {
            QualityArg::Low => mathreel_core::render::Quality::Low,
            QualityArg::Medium => mathreel_core::render::Quality::Medium,
            QualityArg::High => mathreel_core::render::Quality::High,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatArg {
    /// MP4 video (default)
    #[default]
    Mp4,
    /// Animated GIF
    Gif,
}

impl From<FormatArg> for mathreel_core::render::Format {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Mp4 => mathreel_core::render::Format::Mp4,
            FormatArg::Gif => mathreel_core::render::Format::Gif,
        }
    }
}

/// Output flags shared by every command that renders.
#[derive(Debug, Clone, clap::Args)]
pub struct RenderFlags {
    /// Requested output quality
    #[arg(long, value_enum, default_value_t = QualityArg::Low)]
    pub quality: QualityArg,

    /// Output container
    #[arg(long, value_enum, default_value_t = FormatArg::Mp4)]
    pub format: FormatArg,

    /// Print the final update as JSON
    #[arg(long)]
    pub json: bool,
}

pub(crate) fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Print the last update of a run and turn a failed run into an error.
pub(crate) fn report(update: &PipelineUpdate, json: bool, verbose: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(update)?);
    } else {
        print_update(update, verbose);
    }

    match update.stage {
        Stage::Failed => Err(eyre!(
            "{}",
            update.failure.map(|k| k.as_str()).unwrap_or("failed")
        )),
        _ => Ok(()),
    }
}

fn print_update(update: &PipelineUpdate, verbose: bool) {
    if !update.code.is_empty() {
        println!("\n{}", "== Scene ==".bold().cyan());
        println!("{}", update.code);
    }

    if verbose && !update.logs.is_empty() {
        println!("\n{}", "== Renderer Output ==".bold().cyan());
        println!("{}", update.logs.trim_end());
    }

    println!("\n{}", "== Status ==".bold().cyan());
    match update.stage {
        Stage::Failed => eprintln!("{}", update.status.red()),
        _ => println!("{}", update.status.green()),
    }

    if let Some(path) = &update.media_path {
        println!("\n{} {}", "Animation:".bold(), path.display());
    }
}
