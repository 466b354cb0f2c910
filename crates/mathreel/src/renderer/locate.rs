use ignore::WalkBuilder;
use mathreel_core::render::{is_artifact, Format};
use std::path::{Path, PathBuf};

/// Finds the file the renderer produced for a job.
///
/// Manim has no explicit output contract; it writes somewhere under
/// `media/` following its own layout. Keeping the lookup behind this trait means
/// a layout change only touches one implementation.
pub trait ArtifactLocator: Send + Sync {
    fn locate(&self, root: &Path, class_name: &str, format: Format) -> Option<PathBuf>;
}

/// Walks the whole scratch tree for `<Class>*.<ext>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaTreeLocator;

impl ArtifactLocator for MediaTreeLocator {
    fn locate(&self, root: &Path, class_name: &str, format: Format) -> Option<PathBuf> {
        WalkBuilder::new(root)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_some_and(|kind| kind.is_file()))
            .find(|entry| is_artifact(&entry.file_name().to_string_lossy(), class_name, format))
            .map(|entry| entry.into_path())
    }
}
