mod locate;

pub use locate::{ArtifactLocator, MediaTreeLocator};

use crate::prelude::{debug, info, warn};
use mathreel_core::failure::{Failure, FailureKind};
use mathreel_core::pipeline::{
    render_process_failed, render_timed_out, unexpected, validation_failed, MSG_NO_ARTIFACT,
    MSG_NO_SCENE_CLASS, MSG_RENDER_OK,
};
use mathreel_core::render::{
    artifact_file_name, describe_duration, render_args, Format, Quality, SOURCE_FILE_NAME,
};
use mathreel_core::scene::{entry_class_name, extract_code, validate_code};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

type RenderResult<T> = std::result::Result<T, Failure>;

/// Attempts at a unique artifact name before giving up.
const MAX_NAME_ATTEMPTS: usize = 8;

#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Program to run, e.g. `python3`.
    pub program: String,
    /// Arguments placed before the render flags, e.g. `-m manim`.
    pub args: Vec<String>,
    pub timeout: Duration,
    /// Finished artifacts are copied here and outlive the job.
    pub output_dir: PathBuf,
    /// Parent for scratch directories; the system temp dir when `None`.
    pub scratch_root: Option<PathBuf>,
}

/// A rendered clip copied out of its scratch directory.
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    pub path: PathBuf,
    pub message: String,
    /// Renderer standard output.
    pub logs: String,
}

/// Runs Manim on a scene, one isolated scratch directory per call.
///
/// The renderer holds no per-job state. Each call's scratch directory is a
/// [`TempDir`] owned by that call, so it is removed on every exit path: success,
/// any failure, timeout, or an I/O error half way through.
pub struct Renderer {
    config: RendererConfig,
    locator: Box<dyn ArtifactLocator>,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            locator: Box::new(MediaTreeLocator),
        }
    }

    #[cfg(test)]
    pub fn with_locator(mut self, locator: impl ArtifactLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Render `code` (raw model output or an already-extracted scene).
    pub async fn render(
        &self,
        code: &str,
        quality: Quality,
        format: Format,
    ) -> RenderResult<RenderedArtifact> {
        let code = extract_code(code);

        validate_code(&code)
            .map_err(|reason| Failure::new(FailureKind::Validation, validation_failed(reason)))?;

        info!("Rendering scene as {} (quality {})", format, quality);
        self.run_job(&code, format).await
    }

    async fn run_job(&self, code: &str, format: Format) -> RenderResult<RenderedArtifact> {
        let scratch = self.scratch_dir()?;
        debug!("Scratch directory: {}", scratch.path().display());

        let source = scratch.path().join(SOURCE_FILE_NAME);
        tokio::fs::write(&source, code)
            .await
            .map_err(unexpected_failure)?;

        let class_name = entry_class_name(code)
            .ok_or_else(|| Failure::new(FailureKind::MissingEntryClass, MSG_NO_SCENE_CLASS))?;

        let output = self
            .invoke(scratch.path(), &source, &class_name, format)
            .await?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Renderer exited with {:?}", output.status.code());
            return Err(
                Failure::new(FailureKind::RenderProcess, render_process_failed(&stderr))
                    .with_logs(stdout),
            );
        }

        let Some(produced) = self.locator.locate(scratch.path(), &class_name, format) else {
            warn!("Renderer succeeded but no {}*.{} was found", class_name, format);
            return Err(Failure::new(FailureKind::MissingArtifact, MSG_NO_ARTIFACT).with_logs(stdout));
        };

        let path = persist_artifact(&produced, &self.config.output_dir, &class_name, format)
            .await
            .map_err(|e| unexpected_failure(e).with_logs(stdout.clone()))?;

        info!("Animation written to {}", path.display());
        Ok(RenderedArtifact {
            path,
            message: MSG_RENDER_OK.to_string(),
            logs: stdout,
        })
    }

    fn scratch_dir(&self) -> RenderResult<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("mathreel-");

        match &self.config.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(unexpected_failure)
    }

    async fn invoke(
        &self,
        workdir: &Path,
        source: &Path,
        class_name: &str,
        format: Format,
    ) -> RenderResult<Output> {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .args(render_args(&source.to_string_lossy(), class_name, format))
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Running {:?}", cmd.as_std());
        let child = cmd.spawn().map_err(unexpected_failure)?;

        match tokio::time::timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(unexpected_failure),
            Err(_) => {
                warn!("Renderer timed out after {:?}", self.config.timeout);
                Err(Failure::new(
                    FailureKind::Timeout,
                    render_timed_out(&describe_duration(self.config.timeout.as_secs())),
                ))
            }
        }
    }
}

fn unexpected_failure(error: impl std::fmt::Display) -> Failure {
    Failure::new(FailureKind::Unexpected, unexpected(&error.to_string()))
}

/// Copy the artifact to `<output_dir>/<Class>_<epoch>.<ext>`.
///
/// The destination is created exclusively. If another render already claimed
/// the name in the same second, a random suffix is added instead of
/// overwriting it.
async fn persist_artifact(
    produced: &Path,
    output_dir: &Path,
    class_name: &str,
    format: Format,
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir).await?;
    let epoch = chrono::Utc::now().timestamp().max(0) as u64;

    let mut suffix: Option<String> = None;
    for _ in 0..MAX_NAME_ATTEMPTS {
        let destination =
            output_dir.join(artifact_file_name(class_name, epoch, suffix.as_deref(), format));

        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&destination)
            .await
        {
            Ok(mut file) => {
                let copied = async {
                    let mut source = tokio::fs::File::open(produced).await?;
                    tokio::io::copy(&mut source, &mut file).await?;
                    file.flush().await
                }
                .await;

                if let Err(e) = copied {
                    let _ = tokio::fs::remove_file(&destination).await;
                    return Err(e);
                }
                return Ok(destination);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!("{} exists, retrying with a suffix", destination.display());
                suffix = Some(random_suffix());
            }
            Err(e) => return Err(e),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        format!("Could not find a free artifact name for {class_name}"),
    ))
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::testing::{
        entries, fake_renderer, renderer_config, RENDER_CRASH, RENDER_HANG, RENDER_NOTHING,
        RENDER_OK, VALID_SCENE,
    };

    struct Dirs {
        tools: TempDir,
        output: TempDir,
        scratch: TempDir,
    }

    fn dirs() -> Dirs {
        Dirs {
            tools: tempfile::tempdir().unwrap(),
            output: tempfile::tempdir().unwrap(),
            scratch: tempfile::tempdir().unwrap(),
        }
    }

    fn renderer(dirs: &Dirs, script: &str) -> Renderer {
        let script = fake_renderer(dirs.tools.path(), script);
        Renderer::new(renderer_config(
            &script,
            dirs.output.path(),
            dirs.scratch.path(),
        ))
    }

    #[tokio::test]
    async fn test_successful_render_copies_artifact_and_cleans_scratch() {
        let dirs = dirs();
        let renderer = renderer(&dirs, RENDER_OK);

        let artifact = renderer
            .render(VALID_SCENE, Quality::Low, Format::Mp4)
            .await
            .unwrap();

        assert!(artifact.path.starts_with(dirs.output.path()));
        let name = artifact.path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("MyScene_"));
        assert!(name.ends_with(".mp4"));
        assert_eq!(std::fs::read_to_string(&artifact.path).unwrap(), "frames");
        assert_eq!(artifact.message, "✅ Animation generated successfully!");
        assert!(artifact.logs.contains("Rendered MyScene"));
        assert_eq!(entries(dirs.scratch.path()), 0);
    }

    #[tokio::test]
    async fn test_gif_format_is_requested_and_found() {
        let dirs = dirs();
        let renderer = renderer(&dirs, RENDER_OK);

        let artifact = renderer
            .render(VALID_SCENE, Quality::Low, Format::Gif)
            .await
            .unwrap();

        assert_eq!(artifact.path.extension().unwrap(), "gif");
    }

    #[tokio::test]
    async fn test_raw_model_output_is_extracted_first() {
        let dirs = dirs();
        let renderer = renderer(&dirs, RENDER_OK);
        let raw = format!("Sure! Here it is:\n```python\n{VALID_SCENE}\n```\nEnjoy.");

        let artifact = renderer.render(&raw, Quality::Low, Format::Mp4).await.unwrap();
        assert!(artifact.path.exists());
    }

    #[tokio::test]
    async fn test_validation_failure_creates_no_scratch() {
        let dirs = dirs();
        let renderer = renderer(&dirs, RENDER_OK);

        let failure = renderer
            .render("class MyScene(Scene): pass", Quality::Low, Format::Mp4)
            .await
            .unwrap_err();

        assert_eq!(failure.kind, FailureKind::Validation);
        assert!(failure.message.starts_with("❌ Validation Error: "));
        assert!(failure.logs.is_empty());
        assert_eq!(entries(dirs.scratch.path()), 0);
        assert_eq!(entries(dirs.output.path()), 0);
    }

    #[tokio::test]
    async fn test_missing_entry_class_cleans_scratch() {
        let dirs = dirs();
        let renderer = renderer(&dirs, RENDER_OK);
        // Passes the shallow checks, but no line is a `class ...Scene` declaration.
        let code = "from manim import *\nclass Helper:\n    pass\nx = Scene()";

        let failure = renderer.render(code, Quality::Low, Format::Mp4).await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::MissingEntryClass);
        assert_eq!(
            failure.message,
            "❌ Error: Could not find a valid Scene class in the code"
        );
        assert_eq!(entries(dirs.scratch.path()), 0);
    }

    #[tokio::test]
    async fn test_crashing_scene_reports_stderr_and_keeps_stdout() {
        let dirs = dirs();
        let renderer = renderer(&dirs, RENDER_CRASH);
        let code = "from manim import *\nclass MyScene(Scene):\n    def construct(self):\n        1 / 0";

        let failure = renderer.render(code, Quality::Low, Format::Mp4).await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::RenderProcess);
        assert!(failure.message.starts_with("❌ Manim execution failed:\n"));
        assert!(failure.message.contains("ZeroDivisionError"));
        assert!(failure.logs.contains("Manim Community v0.19.0"));
        assert_eq!(entries(dirs.scratch.path()), 0);
        assert_eq!(entries(dirs.output.path()), 0);
    }

    #[tokio::test]
    async fn test_missing_artifact_is_reported() {
        let dirs = dirs();
        let renderer = renderer(&dirs, RENDER_NOTHING);

        let failure = renderer
            .render(VALID_SCENE, Quality::Low, Format::Mp4)
            .await
            .unwrap_err();

        assert_eq!(failure.kind, FailureKind::MissingArtifact);
        assert_eq!(failure.message, "❌ Error: Could not find generated animation file");
        assert!(failure.logs.contains("File ready at nowhere"));
        assert_eq!(entries(dirs.scratch.path()), 0);
    }

    #[tokio::test]
    async fn test_timeout_kills_renderer_and_cleans_scratch() {
        let dirs = dirs();
        let script = fake_renderer(dirs.tools.path(), RENDER_HANG);
        let mut config = renderer_config(&script, dirs.output.path(), dirs.scratch.path());
        config.timeout = Duration::from_secs(1);
        let renderer = Renderer::new(config);

        let failure = renderer
            .render(VALID_SCENE, Quality::Low, Format::Mp4)
            .await
            .unwrap_err();

        assert_eq!(failure.kind, FailureKind::Timeout);
        assert_eq!(
            failure.message,
            "❌ Error: Animation generation timed out (1 second)"
        );
        assert_eq!(entries(dirs.scratch.path()), 0);
    }

    #[tokio::test]
    async fn test_missing_program_is_unexpected_and_cleans_scratch() {
        let dirs = dirs();
        let mut config = renderer_config(
            Path::new("unused"),
            dirs.output.path(),
            dirs.scratch.path(),
        );
        config.program = "/definitely/not/a/real/manim".to_string();
        let renderer = Renderer::new(config);

        let failure = renderer
            .render(VALID_SCENE, Quality::Low, Format::Mp4)
            .await
            .unwrap_err();

        assert_eq!(failure.kind, FailureKind::Unexpected);
        assert!(failure.message.starts_with("❌ An unexpected error occurred: "));
        assert_eq!(entries(dirs.scratch.path()), 0);
    }

    #[tokio::test]
    async fn test_back_to_back_renders_get_distinct_paths() {
        let dirs = dirs();
        let renderer = renderer(&dirs, RENDER_OK);

        let first = renderer
            .render(VALID_SCENE, Quality::Low, Format::Mp4)
            .await
            .unwrap();
        let second = renderer
            .render(VALID_SCENE, Quality::Low, Format::Mp4)
            .await
            .unwrap();

        assert_ne!(first.path, second.path);
        assert!(first.path.exists());
        assert!(second.path.exists());
    }

    struct NeverFinds;

    impl ArtifactLocator for NeverFinds {
        fn locate(&self, _root: &Path, _class_name: &str, _format: Format) -> Option<PathBuf> {
            None
        }
    }

    #[tokio::test]
    async fn test_locator_is_swappable() {
        let dirs = dirs();
        let renderer = renderer(&dirs, RENDER_OK).with_locator(NeverFinds);

        let failure = renderer
            .render(VALID_SCENE, Quality::Low, Format::Mp4)
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::MissingArtifact);
        assert_eq!(entries(dirs.output.path()), 0);
    }

    #[tokio::test]
    async fn test_persist_artifact_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let produced = dir.path().join("MyScene.mp4");
        std::fs::write(&produced, "one").unwrap();
        let out = dir.path().join("out");

        let a = persist_artifact(&produced, &out, "MyScene", Format::Mp4)
            .await
            .unwrap();
        std::fs::write(&produced, "two").unwrap();
        let b = persist_artifact(&produced, &out, "MyScene", Format::Mp4)
            .await
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(std::fs::read_to_string(&a).unwrap(), "one");
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "two");
    }
}
