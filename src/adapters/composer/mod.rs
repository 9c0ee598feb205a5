//! Reply Composer adapters.
//!
//! - **TemplateReplyComposer** - Deterministic templates (default, testing)
//! - **LlmReplyComposer** - OpenAI-compatible model rephrasing template drafts

mod llm_composer;
mod template_composer;

pub use llm_composer::{LlmComposerConfig, LlmReplyComposer};
pub use template_composer::TemplateReplyComposer;
