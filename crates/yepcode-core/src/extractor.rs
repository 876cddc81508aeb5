//! Code block extraction from agent messages.

use regex::Regex;

use crate::core_types::CodeBlock;

/// Language recorded for fenced blocks without a tag.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

const CODE_BLOCK_PATTERN: &str = r"(?s)```[ \t]*(\w+)?[ \t]*\r?\n(.*?)\r?\n[ \t]*```";

pub trait CodeExtractor: Send + Sync {
    fn extract_code_blocks(&self, message: &str) -> Vec<CodeBlock>;
}

/// Extracts fenced markdown code blocks in the order they appear.
pub struct MarkdownCodeExtractor {
    pattern: Regex,
}

impl MarkdownCodeExtractor {
    pub fn new() -> Self {
        Self {
            // The pattern is a constant; failing to compile it is a programming error.
            pattern: Regex::new(CODE_BLOCK_PATTERN).expect("code block pattern is valid"),
        }
    }
}

impl Default for MarkdownCodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeExtractor for MarkdownCodeExtractor {
    fn extract_code_blocks(&self, message: &str) -> Vec<CodeBlock> {
        self.pattern
            .captures_iter(message)
            .map(|caps| {
                let language = caps
                    .get(1)
                    .map(|m| m.as_str())
                    .unwrap_or(UNKNOWN_LANGUAGE);
                let code = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                CodeBlock::new(language, code)
            })
            .collect()
    }
}
