/// Scene class name the generation prompt asks the model to use.
pub const ENTRY_CLASS_NAME: &str = "MyScene";

/// Substrings accepted as "imports the rendering library".
const REQUIRED_IMPORTS: [&str; 2] = ["from manim import *", "import manim"];

const CLASS_TOKEN: &str = "class";
const SCENE_TOKEN: &str = "Scene";

/// Cheap structural pre-check run before spending a subprocess on the code.
///
/// This is substring matching, not parsing. It accepts some programs the
/// renderer will reject and rejects some unusual but valid ones; the renderer's
/// own exit status stays the authoritative check.
///
/// Returns the success message on `Ok`, the reason on `Err`.
pub fn validate_code(code: &str) -> Result<&'static str, &'static str> {
    if !REQUIRED_IMPORTS.iter().any(|import| code.contains(import)) {
        return Err("Code must include 'from manim import *' or 'import manim'");
    }

    if !code.contains(CLASS_TOKEN) {
        return Err("Code must contain at least one class definition");
    }

    if !code.contains(SCENE_TOKEN) {
        return Err("Class must inherit from Scene or a Scene subclass");
    }

    Ok("Code validation passed")
}

/// Find the scene the renderer should execute.
///
/// The first line that starts with `class ` and mentions `Scene` wins; its
/// identifier is everything after `class ` up to the base-class list.
pub fn entry_class_name(code: &str) -> Option<String> {
    code.lines()
        .map(str::trim)
        .find(|line| line.starts_with("class ") && line.contains(SCENE_TOKEN))
        .and_then(|line| {
            let rest = &line["class ".len()..];
            let end = rest.find(['(', ':']).unwrap_or(rest.len());
            let name = rest[..end].trim();
            (!name.is_empty()).then(|| name.to_string())
        })
}
