use serde::{Deserialize, Serialize};

/// Machine-readable category of a pipeline failure.
///
/// The human-readable message is the contract shown to users; the kind exists so
/// callers and tests can branch without matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Transport failure or non-success status from the LLM endpoint.
    Upstream,
    /// The LLM call succeeded but the output field was missing or empty.
    EmptyGeneration,
    /// Extracted code failed one of the structural checks.
    Validation,
    /// No `class ...(Scene)` declaration could be found.
    MissingEntryClass,
    /// The renderer exited with a non-zero status.
    RenderProcess,
    /// The network call or the renderer exceeded its time bound.
    Timeout,
    /// The renderer succeeded but left no matching artifact behind.
    MissingArtifact,
    /// Anything else.
    Unexpected,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Upstream => "upstream",
            FailureKind::EmptyGeneration => "empty_generation",
            FailureKind::Validation => "validation",
            FailureKind::MissingEntryClass => "missing_entry_class",
            FailureKind::RenderProcess => "render_process",
            FailureKind::Timeout => "timeout",
            FailureKind::MissingArtifact => "missing_artifact",
            FailureKind::Unexpected => "unexpected",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage failure: the `(no result, message, logs)` triple plus its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    /// Whatever engine output was captured before the failure. Often empty.
    pub logs: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            logs: String::new(),
        }
    }

    pub fn with_logs(mut self, logs: impl Into<String>) -> Self {
        self.logs = logs.into();
        self
    }
}
