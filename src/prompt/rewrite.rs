use crate::error::{InkError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// One pattern-to-replacement step applied to a prompt rejected by the
/// provider's content policy.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            InkError::Configuration(vec![format!("invalid rewrite pattern {:?}: {}", pattern, e)])
        })?;
        Ok(Self {
            pattern,
            replacement: replacement.into(),
        })
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned()
    }
}

const SOFTENED_HEADER: &str = "Artistic requirements (family-friendly):";
const ABSTRACT_HEADER: &str =
    "Artistic requirements (family-friendly, non-graphic, abstract shapes only):";

// The header rungs are listed in reverse so that one pass climbs a single
// rung. A built prompt therefore changes on each of its first two rewrites.
static DEFAULT_RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    [
        (r"(?m)^Artistic requirements \(family-friendly\):$", ABSTRACT_HEADER),
        (r"(?m)^Artistic requirements:$", SOFTENED_HEADER),
        (r"(?m)^Area: [^\n]*\n", ""),
        (r"(?i)\btattoos\b", "art designs"),
        (r"(?i)\btattoo(ed|ing)?\b", "art design"),
        (r"(?i)\bbody\b", "decorative"),
        (r"(?i)\bskin\b", "surface"),
        (r"(?i)\bblood(y)?\b", "crimson"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        RewriteRule::new(pattern, replacement).expect("built-in rewrite pattern must compile")
    })
    .collect()
});

/// Ordered list of rewrite rules. Rules run in insertion order, each on the
/// output of the previous one.
#[derive(Debug, Clone)]
pub struct PromptRewriter {
    rules: Vec<RewriteRule>,
}

impl Default for PromptRewriter {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
        }
    }
}

impl PromptRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: RewriteRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn rewrite(&self, prompt: &str) -> String {
        self.rules
            .iter()
            .fold(prompt.to_string(), |text, rule| rule.apply(&text))
    }
}
