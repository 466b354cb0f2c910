use regex::Regex;
use std::sync::LazyLock;

static PYTHON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```python\s*(.*?)```").expect("fence pattern is valid"));

/// Line prefixes that mark the start of Python source when no fence is present.
const CODE_STARTERS: [&str; 3] = ["from ", "import ", "class "];

/// Extract a Manim scene from a model response.
///
/// Tries, in order:
/// 1. the first ```` ```python ```` fenced block,
/// 2. everything from the first line starting with `from `, `import ` or `class `,
/// 3. the whole response.
///
/// The result is always trimmed. Extraction never fails; garbage in means garbage
/// out, and validation is what rejects it.
pub fn extract_code(response: &str) -> String {
    if let Some(block) = PYTHON_FENCE.captures(response).and_then(|caps| caps.get(1)) {
        return block.as_str().trim().to_string();
    }

    let lines: Vec<&str> = response.lines().collect();
    if let Some(start) = lines.iter().position(|line| {
        let line = line.trim();
        CODE_STARTERS.iter().any(|starter| line.starts_with(starter))
    }) {
        return lines[start..].join("\n").trim().to_string();
    }

    response.trim().to_string()
}
