use serde::{Deserialize, Serialize};

/// A request to write a new scene from a natural-language description.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// What the user wants animated, e.g. "explain bubble sort algorithm".
    pub prompt: String,
}

/// A request to change an existing scene.
#[derive(Debug, Clone)]
pub struct EditRequest {
    /// The current scene source, embedded verbatim in the prompt.
    pub code: String,
    /// What to change, e.g. "move the text to the left".
    pub instruction: String,
}

/// Fields of the request body that come from configuration rather than the user.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub model: String,
    pub priority: String,
}

/// JSON body posted to the LLM endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmRequestBody {
    pub prompt: String,
    pub priority: String,
    pub model: String,
    pub system_prompt: String,
}
