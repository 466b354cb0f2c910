//! Core library for mathreel
//!
//! This crate implements the **Functional Core** of the mathreel application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The mathreel project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`mathreel_core`** (this crate): Pure transformation functions with zero I/O
//! - **`mathreel`**: HTTP calls, subprocesses, scratch directories and orchestration
//!   (the Imperative Shell)
//!
//! Everything that can be decided by looking at text alone lives here: pulling a
//! scene out of model output, the structural pre-checks run before spending a
//! subprocess on it, the prompts sent to the model, the renderer's argument list,
//! artifact naming and the status messages the pipeline reports.
//!
//! # Module Organization
//!
//! - [`scene`]: Extraction, validation and prompt construction for Manim scenes
//! - [`render`]: Renderer flags, output formats and artifact naming
//! - [`pipeline`]: Pipeline stages and the updates reported to callers
//! - [`failure`]: Machine-readable failure kinds carried next to every message
//! - [`gallery`]: Example prompts and scenes offered by the presentation layer
//!
//! # Example Usage
//!
//! ```rust
//! use mathreel_core::scene::{entry_class_name, extract_code, validate_code};
//!
//! let reply = "Here you go:\n```python\nfrom manim import *\nclass MyScene(Scene):\n    def construct(self):\n        self.wait()\n```";
//!
//! let code = extract_code(reply);
//! assert!(validate_code(&code).is_ok());
//! assert_eq!(entry_class_name(&code).as_deref(), Some("MyScene"));
//! ```

pub mod failure;
pub mod gallery;
pub mod pipeline;
pub mod render;
pub mod scene;
