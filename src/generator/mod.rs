//! Prompt templates and pattern codegen.
//!
//! This module provides:
//! - Prompt construction for the filter/refine/extract stages
//! - The pattern template registry that turns extracted flags into
//!   `no-restricted-syntax` entries

pub mod prompts;
pub mod templates;

pub use prompts::{build_extract_prompt, build_filter_prompt, build_refine_prompt};
pub use templates::render;
