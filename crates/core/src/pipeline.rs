use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::failure::{Failure, FailureKind};

/// Point in the pipeline an update was emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Started,
    CodeReady,
    Rendering,
    Finished,
    Failed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Finished | Stage::Failed)
    }
}

/// Best-known state of one pipeline run, as shown to the user.
///
/// `media_path` is only ever set on a [`Stage::Finished`] update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineUpdate {
    pub stage: Stage,
    pub media_path: Option<PathBuf>,
    pub status: String,
    pub code: String,
    pub logs: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl PipelineUpdate {
    pub fn progress(stage: Stage, status: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            stage,
            media_path: None,
            status: status.into(),
            code: code.into(),
            logs: String::new(),
            failure: None,
        }
    }

    pub fn finished(
        media_path: PathBuf,
        status: impl Into<String>,
        code: impl Into<String>,
        logs: impl Into<String>,
    ) -> Self {
        Self {
            stage: Stage::Finished,
            media_path: Some(media_path),
            status: status.into(),
            code: code.into(),
            logs: logs.into(),
            failure: None,
        }
    }

    pub fn failed(failure: &Failure, status: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            stage: Stage::Failed,
            media_path: None,
            status: status.into(),
            code: code.into(),
            logs: failure.logs.clone(),
            failure: Some(failure.kind),
        }
    }
}

// ============================================================================
// Status messages
// ============================================================================

pub const STATUS_THINKING: &str = "🤖 Thinking... generating Manim code based on your prompt.";
pub const STATUS_CODE_READY: &str = "🧠 Manim code ready — preparing render environment.";
pub const STATUS_RENDERING: &str = "🎬 Rendering animation... this may take a moment.";
pub const STATUS_COMPLETE: &str = "✅ Rendering complete! Previewing your animation...";
pub const STATUS_EMPTY_CODE: &str = "❌ Please enter or generate some Manim code.";

pub const MSG_GENERATE_EMPTY: &str = "❌ No code generated from AI.";
pub const MSG_EDIT_EMPTY: &str = "❌ No edited code returned by AI.";
pub const MSG_EDIT_OK: &str = "✅ Code updated based on your instruction.";
pub const MSG_RENDER_OK: &str = "✅ Animation generated successfully!";
pub const MSG_NO_SCENE_CLASS: &str = "❌ Error: Could not find a valid Scene class in the code";
pub const MSG_NO_ARTIFACT: &str = "❌ Error: Could not find generated animation file";

pub fn generate_ok(prompt: &str) -> String {
    format!("✅ AI code generated successfully for: '{prompt}'")
}

pub fn generate_failed(error: &str) -> String {
    format!("❌ Failed to generate code: {error}")
}

pub fn edit_failed(error: &str) -> String {
    format!("❌ Failed to edit code: {error}")
}

pub fn validation_failed(reason: &str) -> String {
    format!("❌ Validation Error: {reason}")
}

pub fn render_process_failed(stderr: &str) -> String {
    format!("❌ Manim execution failed:\n{stderr}")
}

pub fn render_timed_out(duration: &str) -> String {
    format!("❌ Error: Animation generation timed out ({duration})")
}

pub fn unexpected(error: &str) -> String {
    format!("❌ An unexpected error occurred: {error}")
}

/// Final status when generation itself failed.
pub fn could_not_generate(message: &str) -> String {
    format!("⚠️ Couldn't generate code. {message}")
}

/// Final status when generation worked but the render did not.
pub fn render_went_wrong(message: &str) -> String {
    format!("❌ Something went wrong while rendering. Details: {message}")
}

/// Edit-and-render reports both stages' outcomes, one per line.
pub fn joined_status(edit_status: &str, render_status: &str) -> String {
    format!("{edit_status}\n{render_status}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_update_carries_kind_and_logs() {
        let failure = Failure::new(FailureKind::RenderProcess, render_process_failed("boom"))
            .with_logs("partial output");
        let update = PipelineUpdate::failed(&failure, render_went_wrong(&failure.message), "code");

        assert_eq!(update.stage, Stage::Failed);
        assert!(update.media_path.is_none());
        assert_eq!(update.failure, Some(FailureKind::RenderProcess));
        assert_eq!(update.logs, "partial output");
        assert!(update.status.ends_with("Details: ❌ Manim execution failed:\nboom"));
    }

    #[test]
    fn test_finished_update_sets_media_path() {
        let update = PipelineUpdate::finished(
            PathBuf::from("/tmp/MyScene_1.mp4"),
            STATUS_COMPLETE,
            "code",
            "logs",
        );
        assert_eq!(update.stage, Stage::Finished);
        assert!(update.stage.is_terminal());
        assert_eq!(update.media_path, Some(PathBuf::from("/tmp/MyScene_1.mp4")));
        assert!(update.status.contains("complete"));
    }

    #[test]
    fn test_progress_update_is_not_terminal() {
        let update = PipelineUpdate::progress(Stage::CodeReady, STATUS_CODE_READY, "x");
        assert!(!update.stage.is_terminal());
        assert!(update.media_path.is_none());
        assert!(update.failure.is_none());
    }

    #[test]
    fn test_update_json_shape() {
        let update = PipelineUpdate::progress(Stage::Started, STATUS_THINKING, "");
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["stage"], "started");
        assert!(value["media_path"].is_null());
        assert!(value.get("failure").is_none());
    }

    #[test]
    fn test_message_helpers() {
        assert_eq!(
            generate_ok("explain dfs"),
            "✅ AI code generated successfully for: 'explain dfs'"
        );
        assert_eq!(
            render_timed_out("2 minutes"),
            "❌ Error: Animation generation timed out (2 minutes)"
        );
        assert_eq!(joined_status("a", "b"), "a\nb");
    }
}
