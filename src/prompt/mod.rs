pub mod builder;
pub mod rewrite;

pub use builder::{
    build_prompt, optimize_for_provider, DEFAULT_MAX_PROMPT_LENGTH, MAX_PROMPT_SEGMENTS,
};
pub use rewrite::{PromptRewriter, RewriteRule};
