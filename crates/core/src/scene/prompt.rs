use super::types::{EditRequest, GenerationRequest, LlmRequestBody, LlmSettings};

/// System instructions for edits. Fixed; the code and instruction go in the prompt.
pub const EDIT_SYSTEM_PROMPT: &str = "
You are a Manim expert. You will receive existing Manim code and an instruction on how to modify it.
Follow these rules:
- Only modify what's necessary.
- Maintain compatibility with Manim Community v0.19.
- Always return full corrected Python code in a ```python``` block.
- The class name must remain unchanged.
- Always end with self.wait().
";

/// System instructions for a fresh scene.
///
/// Pins the dialect (ManimCE 0.19), the entry class name, the closing
/// `self.wait()` and the layout rules. The user's description is repeated
/// inside so the model sees it next to the constraints.
pub fn generation_system_prompt(prompt: &str) -> String {
    format!(
        "
Write a Manim script that's in Python to visualize: {prompt}. FOCUS on producing working code. Always use Manim Community version 0.19 syntax. When creating an Axes object, do not use axis_color directly as a keyword argument. Instead, use axis_config= 'color': ... The class should be {class} and end with self.wait(). Class name should be {class}. End with self.wait() Only give me the python code so that I can directly put this into the manim project input.
Avoid using deprecated or unavailable ManimCE methods like get_tangent_line. Construct tangent lines manually using slope and Line(...).
You are a senior math educator and Manim Community v0.19 expert.
Always ensure visuals are well spaced, readable, never overlapping.
make sure video scene doesn't overlap and shown inside the canvas.
Text should be placed carefully using `.animate.to_edge()`, `.next_to()`, or `.shift()`.
Only include coordinate axes, graphs, tangent lines, or shapes if necessary.
Always conclude with `self.wait()`.
Use ManimCE v0.19 syntax.
The scene class should always be named `{class}`.
",
        class = super::ENTRY_CLASS_NAME,
    )
}

/// Build the user-facing part of an edit prompt: the instruction, then the
/// original code in a python fence.
pub fn edit_prompt(request: &EditRequest) -> String {
    format!(
        "Instruction: {}\n\nOriginal Code:\n```python\n{}\n```",
        request.instruction, request.code
    )
}

/// Build the request body for a new scene.
pub fn build_generation_body(request: &GenerationRequest, settings: &LlmSettings) -> LlmRequestBody {
    LlmRequestBody {
        prompt: request.prompt.clone(),
        priority: settings.priority.clone(),
        model: settings.model.clone(),
        system_prompt: generation_system_prompt(&request.prompt),
    }
}

/// Build the request body for an edit of an existing scene.
pub fn build_edit_body(request: &EditRequest, settings: &LlmSettings) -> LlmRequestBody {
    LlmRequestBody {
        prompt: edit_prompt(request),
        priority: settings.priority.clone(),
        model: settings.model.clone(),
        system_prompt: EDIT_SYSTEM_PROMPT.to_string(),
    }
}
