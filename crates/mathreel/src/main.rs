use crate::prelude::*;
use clap::Parser;

mod config;
mod error;
mod llm;
mod pipeline;
mod prelude;
mod renderer;
mod scene;
mod server;

#[cfg(test)]
mod testing;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Turn a plain-language prompt into a rendered Manim animation"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    #[clap(flatten)]
    settings: config::Settings,

    /// Whether to display additional information.
    #[clap(long, env = "MATHREEL_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Generate an animation from a prompt
    Generate(crate::scene::generate::GenerateOptions),

    /// Change an existing scene with an instruction and render it
    Edit(crate::scene::edit::EditOptions),

    /// Render a scene file as-is
    Render(crate::scene::render::RenderOptions),

    /// List the built-in example prompts and scenes
    Examples(crate::scene::examples::ExamplesOptions),

    /// Check that the renderer and credentials are in place
    Doctor(crate::scene::doctor::DoctorOptions),

    /// Serve the HTTP interface
    Serve(crate::server::ServeOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Generate(options) => crate::scene::generate::handler(options, app.global).await,
        SubCommands::Edit(options) => crate::scene::edit::handler(options, app.global).await,
        SubCommands::Render(options) => crate::scene::render::handler(options, app.global).await,
        SubCommands::Examples(options) => crate::scene::examples::handler(options).await,
        SubCommands::Doctor(options) => crate::scene::doctor::handler(options, app.global).await,
        SubCommands::Serve(options) => crate::server::run_serve(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
