//! Core type definitions shared between the executor, the remote client and
//! the host framework.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fenced snippet of source code extracted from agent dialogue.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

impl CodeBlock {
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            code: code.into(),
        }
    }
}

/// Aggregated result of executing a batch of code blocks.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub exit_code: i32,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
}

impl ExecutionOutcome {
    pub fn success(output: String, execution_id: Option<String>) -> Self {
        Self {
            exit_code: 0,
            output,
            execution_id,
        }
    }

    pub fn failure(output: String, execution_id: Option<String>) -> Self {
        Self {
            exit_code: 1,
            output,
            execution_id,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// One log line emitted by a remote execution.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ExecutionLog {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

impl fmt::Display for ExecutionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}: {}", self.timestamp, self.level, self.message)
    }
}

/// Languages the remote runtime accepts.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
}

impl Language {
    pub const SUPPORTED: [Language; 2] = [Language::Python, Language::JavaScript];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
        }
    }

    /// Looks up an already normalized language name.
    pub fn from_normalized(name: &str) -> Option<Self> {
        Self::SUPPORTED.into_iter().find(|lang| lang.as_str() == name)
    }

    /// Comma separated list used in user-facing messages.
    pub fn supported_list() -> String {
        Self::SUPPORTED
            .iter()
            .map(|lang| lang.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps common aliases onto the names the remote runtime expects.
///
/// Matching is case-insensitive. Anything unrecognised is returned exactly as
/// given so callers can report it back verbatim.
pub fn normalize_language(language: &str) -> String {
    match language.to_lowercase().as_str() {
        "py" | "python" => Language::Python.as_str().to_string(),
        "js" | "javascript" => Language::JavaScript.as_str().to_string(),
        _ => language.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_python_aliases() {
        for input in ["py", "python", "Python", "PYTHON", "Py"] {
            assert_eq!(normalize_language(input), "python", "input: {}", input);
        }
    }

    #[test]
    fn test_normalize_javascript_aliases() {
        for input in ["js", "JS", "javascript", "JavaScript"] {
            assert_eq!(normalize_language(input), "javascript", "input: {}", input);
        }
    }

    #[test]
    fn test_normalize_passes_unknown_through() {
        assert_eq!(normalize_language("java"), "java");
        assert_eq!(normalize_language("Rust"), "Rust");
        assert_eq!(normalize_language(""), "");
    }

    #[test]
    fn test_supported_languages() {
        assert_eq!(Language::supported_list(), "python, javascript");
        assert_eq!(Language::from_normalized("python"), Some(Language::Python));
        assert_eq!(
            Language::from_normalized("javascript"),
            Some(Language::JavaScript)
        );
        assert_eq!(Language::from_normalized("Python"), None);
        assert_eq!(Language::from_normalized("java"), None);
    }

    #[test]
    fn test_execution_log_display() {
        let log = ExecutionLog {
            timestamp: "2023-01-01T00:00:00Z".to_string(),
            level: "INFO".to_string(),
            message: "Starting execution".to_string(),
        };
        assert_eq!(
            log.to_string(),
            "2023-01-01T00:00:00Z - INFO: Starting execution"
        );
    }

    #[test]
    fn test_outcome_serialization_skips_missing_id() {
        let outcome = ExecutionOutcome::success(String::new(), None);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, serde_json::json!({"exit_code": 0, "output": ""}));
        assert!(outcome.is_success());
        assert!(!ExecutionOutcome::failure("boom".into(), None).is_success());
    }
}
