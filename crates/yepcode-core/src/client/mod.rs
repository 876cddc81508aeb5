//! Remote execution client interface.
//!
//! The executor only needs a narrow view of the service: submit code, get a
//! handle back, optionally wait on it and read its terminal state. Anything
//! implementing these two traits can stand in for the real service.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::core_types::{ExecutionLog, Language};
use crate::errors::RemoteError;

pub mod http;

pub use http::HttpRunner;

/// Options sent alongside the code for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    pub language: Language,
    pub remove_on_done: bool,
    /// Milliseconds.
    pub timeout: u64,
}

/// Handle to one submitted execution.
///
/// `error`, `return_value` and `logs` only reflect the terminal state after
/// `wait_for_done` has returned successfully.
#[async_trait]
pub trait RemoteExecution: Send {
    fn id(&self) -> &str;

    async fn wait_for_done(&mut self) -> Result<(), RemoteError>;

    fn error(&self) -> Option<&str>;

    fn return_value(&self) -> Option<&Value>;

    fn logs(&self) -> &[ExecutionLog];
}

#[async_trait]
pub trait RemoteRunner: Send + Sync {
    async fn run(
        &self,
        code: &str,
        options: &RunOptions,
    ) -> Result<Box<dyn RemoteExecution>, RemoteError>;
}
