use crate::config::split_command;
use crate::prelude::{println, *};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, serde::Serialize)]
pub struct Check {
    pub name: &'static str,
    pub ok: bool,
    pub detail: String,
}

/// Options for checking the local setup
#[derive(Debug, clap::Args, Clone)]
pub struct DoctorOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Is the renderer's program on PATH (or an existing path)?
pub fn check_renderer(command: &str) -> Check {
    let name = "renderer";
    let program = match split_command(command) {
        Ok((program, _)) => program,
        Err(e) => {
            return Check {
                name,
                ok: false,
                detail: e.to_string(),
            }
        }
    };

    match which::which(&program) {
        Ok(path) => Check {
            name,
            ok: true,
            detail: format!("{} ({})", command, path.display()),
        },
        Err(_) => Check {
            name,
            ok: false,
            detail: format!("'{}' not found on PATH", program),
        },
    }
}

pub fn check_api_key(api_key: Option<&str>) -> Check {
    let ok = api_key.is_some_and(|key| !key.trim().is_empty());
    Check {
        name: "api key",
        ok,
        detail: if ok {
            "set".to_string()
        } else {
            "API_KEY is not set; the LLM endpoint will reject requests".to_string()
        },
    }
}

/// Can finished animations be written to `dir`?
pub fn check_output_dir(dir: &Path) -> Check {
    let name = "output dir";
    let probe = dir.join(format!(".mathreel-probe-{}", std::process::id()));

    let writable = std::fs::create_dir_all(dir)
        .and_then(|_| std::fs::write(&probe, b""))
        .and_then(|_| std::fs::remove_file(&probe));

    match writable {
        Ok(()) => Check {
            name,
            ok: true,
            detail: dir.display().to_string(),
        },
        Err(e) => Check {
            name,
            ok: false,
            detail: format!("{}: {}", dir.display(), e),
        },
    }
}

/// Handle the doctor command
pub async fn handler(options: DoctorOptions, global: crate::Global) -> Result<()> {
    let settings = &global.settings;
    let output_dir: PathBuf = settings.output_dir();

    let checks = vec![
        check_renderer(&settings.renderer),
        check_api_key(settings.api_key.as_deref()),
        check_output_dir(&output_dir),
    ];

    if options.json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
    } else {
        for check in &checks {
            let mark = if check.ok { "ok".green() } else { "missing".red() };
            println!("{:>12}  {:<8} {}", check.name.bold(), mark, check.detail);
        }
        if global.verbose {
            println!();
            println!("LLM endpoint: {} (model {})", settings.llm_url, settings.model);
        }
    }

    let failed = checks.iter().filter(|c| !c.ok).count();
    if failed > 0 {
        return Err(eyre!("{} check(s) failed", failed));
    }

    Ok(())
}
