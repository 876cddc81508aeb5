//! Code execution backends.
//!
//! `CodeExecutor` is the contract an agent framework drives: hand it the code
//! blocks found in a message and get back one outcome. Failures that happen
//! while running code are reported inside the outcome, never as errors, so
//! the agent can read them like any other output.

use async_trait::async_trait;

use crate::core_types::{CodeBlock, ExecutionOutcome};
use crate::extractor::CodeExtractor;

#[async_trait]
pub trait CodeExecutor: Send + Sync {
    /// Strategy the host should use to pull code blocks out of messages.
    fn code_extractor(&self) -> &dyn CodeExtractor;

    async fn execute(&self, code_blocks: &[CodeBlock]) -> ExecutionOutcome;

    /// Lifecycle hook invoked by the host between conversations.
    fn reset(&self);
}

pub mod remote;
