use crate::llm::LlmConfig;
use crate::prelude::*;
use crate::renderer::RendererConfig;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LLM_URL: &str = "https://fal.run/fal-ai/any-llm";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_RENDERER: &str = "python3 -m manim";

/// Directory under the system temp dir that holds finished animations.
const OUTPUT_SUBDIR: &str = "mathreel";

/// Settings shared by every subcommand. Flags win over environment variables.
#[derive(Debug, Clone, clap::Args)]
pub struct Settings {
    /// API key for the LLM endpoint. Not checked until the first request
    #[clap(long, env = "API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// LLM endpoint URL
    #[clap(long, env = "MATHREEL_LLM_URL", global = true, default_value = DEFAULT_LLM_URL)]
    pub llm_url: String,

    /// Model requested from the endpoint
    #[clap(long, env = "MATHREEL_MODEL", global = true, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Scheduling priority requested from the endpoint
    #[clap(long, env = "MATHREEL_PRIORITY", global = true, default_value = "latency")]
    pub priority: String,

    /// Timeout for the LLM request, in seconds
    #[clap(long, env = "MATHREEL_LLM_TIMEOUT", global = true, default_value = "60")]
    pub llm_timeout: u64,

    /// Command used to invoke Manim, split like a shell would split it
    #[clap(long, env = "MATHREEL_RENDERER", global = true, default_value = DEFAULT_RENDERER)]
    pub renderer: String,

    /// Timeout for a single render, in seconds
    #[clap(
        long,
        env = "MATHREEL_RENDER_TIMEOUT",
        global = true,
        default_value = "120",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub render_timeout: u64,

    /// Where finished animations are copied (defaults to `mathreel/` under the system temp dir)
    #[clap(long, env = "MATHREEL_OUTPUT_DIR", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Where per-render scratch directories are created (defaults to the system temp dir)
    #[clap(long, env = "MATHREEL_SCRATCH_DIR", global = true)]
    pub scratch_dir: Option<PathBuf>,
}

impl Settings {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(OUTPUT_SUBDIR))
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            url: self.llm_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            priority: self.priority.clone(),
            timeout: Duration::from_secs(self.llm_timeout),
        }
    }

    pub fn renderer_config(&self) -> Result<RendererConfig> {
        let (program, args) = split_command(&self.renderer)?;

        Ok(RendererConfig {
            program,
            args,
            timeout: Duration::from_secs(self.render_timeout),
            output_dir: self.output_dir(),
            scratch_root: self.scratch_dir.clone(),
        })
    }
}

/// Split a command line into program and leading arguments.
pub fn split_command(command: &str) -> Result<(String, Vec<String>)> {
    let mut parts = shlex::split(command)
        .ok_or_else(|| Error::Config(format!("Unbalanced quotes in renderer command: {command}")))?
        .into_iter();

    let program = parts
        .next()
        .ok_or_else(|| Error::Config("Renderer command is empty".to_string()))?;

    Ok((program, parts.collect()))
}
