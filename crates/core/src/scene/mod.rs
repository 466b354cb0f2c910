pub mod extract;
pub mod prompt;
pub mod types;
pub mod validate;

pub use extract::extract_code;
pub use prompt::{build_edit_body, build_generation_body, EDIT_SYSTEM_PROMPT};
pub use types::{EditRequest, GenerationRequest, LlmRequestBody, LlmSettings};
pub use validate::{entry_class_name, validate_code, ENTRY_CLASS_NAME};
