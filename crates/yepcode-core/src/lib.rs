//! Remote code execution backend for agent frameworks.
//!
//! Instead of running model-generated code on the local machine, this crate
//! ships every code block to YepCode Run, a hosted sandbox service, and folds
//! the service's answer back into a single outcome an agent can read.
//!
//! # Architecture Overview
//!
//! - **Executors**: the `CodeExecutor` plugin contract and the
//!   `RemoteCodeExecutor` that drives a batch of code blocks serially
//! - **Remote client**: the narrow `RemoteRunner` / `RemoteExecution` interface
//!   plus an HTTP implementation talking to the YepCode REST API
//! - **Extraction**: markdown fenced-block extraction for agent messages
//! - **Configuration**: serde-backed settings resolved from explicit values,
//!   YAML files and the process environment

pub mod client;
pub mod config;
pub mod core_types;
pub mod errors;
pub mod executors;
pub mod extractor;

pub use client::{RemoteExecution, RemoteRunner, RunOptions};
pub use config::{ConfigLoader, ExecutorConfig, ResolvedConfig};
pub use core_types::{CodeBlock, ExecutionLog, ExecutionOutcome, Language};
pub use errors::{ExecutorError, RemoteError};
pub use executors::remote::RemoteCodeExecutor;
pub use executors::CodeExecutor;
pub use extractor::{CodeExtractor, MarkdownCodeExtractor};

#[cfg(test)]
pub mod test_utils;
