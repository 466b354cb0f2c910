use crate::prelude::{println, *};
use colored::Colorize;
use mathreel_core::gallery::{example_code, ExampleScene, EXAMPLE_PROMPTS, EXAMPLE_SCENES};

/// Options for browsing the built-in prompts and scenes
#[derive(Debug, clap::Args, Clone)]
pub struct ExamplesOptions {
    /// Print the code of one example scene
    #[arg(long)]
    pub name: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct Gallery {
    pub prompts: Vec<&'static str>,
    pub scenes: Vec<ExampleScene>,
}

pub fn gallery() -> Gallery {
    Gallery {
        prompts: EXAMPLE_PROMPTS.to_vec(),
        scenes: EXAMPLE_SCENES.to_vec(),
    }
}

/// Handle the examples command
pub async fn handler(options: ExamplesOptions) -> Result<()> {
    if let Some(name) = &options.name {
        let code = example_code(name);
        if code.is_empty() {
            return Err(eyre!("Unknown example: {}", name));
        }
        println!("{}", code);
        return Ok(());
    }

    let gallery = gallery();
    if options.json {
        println!("{}", serde_json::to_string_pretty(&gallery)?);
        return Ok(());
    }

    println!("\n{}", "== Prompts ==".bold().cyan());
    for prompt in &gallery.prompts {
        println!("  {}", prompt);
    }

    println!("\n{}", "== Scenes ==".bold().cyan());
    for scene in &gallery.scenes {
        let first_class = scene
            .code
            .lines()
            .find(|line| line.trim_start().starts_with("class "))
            .unwrap_or("")
            .trim();
        println!("  {}  {}", scene.name.green(), first_class.dimmed());
    }

    Ok(())
}
