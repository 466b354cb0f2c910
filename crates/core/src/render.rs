use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Name of the scene file written into each scratch directory.
pub const SOURCE_FILE_NAME: &str = "animation.py";

/// Flags passed on every render.
///
/// 480p at 15 fps keeps renders cheap, and caching is both disabled and
/// flushed because a stale cache lock can hang the renderer indefinitely.
pub const BASE_RENDER_FLAGS: [&str; 5] = ["-ql", "--fps", "15", "--disable_caching", "--flush_cache"];

/// Requested output quality.
///
/// Accepted and reported, but the flag set stays [`BASE_RENDER_FLAGS`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Low,
    Medium,
    High,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output container the renderer should produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Mp4,
    Gif,
}

impl Format {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Mp4 => "mp4",
            Format::Gif => "gif",
        }
    }

    /// Extra renderer flag. Video is the renderer's default and needs none.
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            Format::Mp4 => None,
            Format::Gif => Some("--format=gif"),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Arguments appended to the renderer command for one job.
///
/// `source_file` and `class_name` are positional; the gif flag goes last.
pub fn render_args(source_file: &str, class_name: &str, format: Format) -> Vec<String> {
    let mut args: Vec<String> = BASE_RENDER_FLAGS.iter().map(|flag| flag.to_string()).collect();

    args.push(source_file.to_string());
    args.push(class_name.to_string());

    if let Some(flag) = format.flag() {
        args.push(flag.to_string());
    }

    args
}

/// Whether a file the renderer left behind is the artifact for this job.
pub fn is_artifact(file_name: &str, class_name: &str, format: Format) -> bool {
    file_name.starts_with(class_name) && file_name.ends_with(&format!(".{}", format.extension()))
}

/// Stable artifact file name: `<Class>_<epochSeconds>[_<suffix>].<ext>`.
pub fn artifact_file_name(
    class_name: &str,
    epoch_seconds: u64,
    suffix: Option<&str>,
    format: Format,
) -> String {
    match suffix {
        Some(suffix) => format!(
            "{}_{}_{}.{}",
            class_name,
            epoch_seconds,
            suffix,
            format.extension()
        ),
        None => format!("{}_{}.{}", class_name, epoch_seconds, format.extension()),
    }
}

static ARTIFACT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*_[0-9]+(_[a-z0-9]{6})?\.(mp4|gif)$")
        .expect("artifact name pattern is valid")
});

/// Whether `name` is a single path segment shaped like [`artifact_file_name`] output.
pub fn is_artifact_name(name: &str) -> bool {
    ARTIFACT_NAME.is_match(name)
}

/// Human wording for a timeout, e.g. "2 minutes" or "45 seconds".
pub fn describe_duration(seconds: u64) -> String {
    match seconds {
        0 => "less than a second".to_string(),
        60 => "1 minute".to_string(),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{} seconds", s),
    }
}
