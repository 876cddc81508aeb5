// src/executors/remote.rs
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::CodeExecutor;
use crate::client::{HttpRunner, RemoteExecution, RemoteRunner, RunOptions};
use crate::config::{ExecutorConfig, ResolvedConfig};
use crate::core_types::{normalize_language, CodeBlock, ExecutionLog, ExecutionOutcome, Language};
use crate::errors::{ExecutorError, RemoteError};
use crate::extractor::{CodeExtractor, MarkdownCodeExtractor};

const OUTPUT_SEPARATOR: &str = "\n===\n";

/// Runs code blocks on YepCode Run, one at a time and in order.
///
/// Each block gets its own remote execution. The first block that cannot be
/// run (unsupported language, request failure, or code that errors out)
/// ends the batch and only that failure is reported.
pub struct RemoteCodeExecutor {
    config: ResolvedConfig,
    runner: Arc<dyn RemoteRunner>,
    extractor: MarkdownCodeExtractor,
}

enum BlockFailure {
    Remote(RemoteError),
    Execution(String),
}

impl From<RemoteError> for BlockFailure {
    fn from(err: RemoteError) -> Self {
        BlockFailure::Remote(err)
    }
}

impl RemoteCodeExecutor {
    pub fn new(config: ExecutorConfig) -> Result<Self, ExecutorError> {
        Self::with_runner_factory(config, |resolved| {
            let runner: Arc<dyn RemoteRunner> = Arc::new(HttpRunner::new(resolved)?);
            Ok(runner)
        })
    }

    /// Build the executor around any `RemoteRunner`.
    ///
    /// The configuration is validated before the factory is called.
    pub fn with_runner_factory<F>(config: ExecutorConfig, factory: F) -> Result<Self, ExecutorError>
    where
        F: FnOnce(&ResolvedConfig) -> Result<Arc<dyn RemoteRunner>, RemoteError>,
    {
        let config = config.resolve()?;
        let runner = factory(&config)?;

        log::info!(
            "Remote code executor ready (host: {}, timeout: {}s, sync: {}, remove_on_done: {})",
            config.api_host().unwrap_or("<none>"),
            config.timeout_seconds(),
            config.sync_execution(),
            config.remove_on_done()
        );

        Ok(Self {
            config,
            runner,
            extractor: MarkdownCodeExtractor::new(),
        })
    }

    /// Timeout for code execution, in seconds.
    pub fn timeout(&self) -> u64 {
        self.config.timeout_seconds()
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    async fn run_block(
        &self,
        language: Language,
        code: &str,
        last_execution_id: &mut Option<String>,
    ) -> Result<String, BlockFailure> {
        let options = RunOptions {
            language,
            remove_on_done: self.config.remove_on_done(),
            timeout: self.config.timeout_millis(),
        };

        let mut execution = self.runner.run(code, &options).await?;
        *last_execution_id = Some(execution.id().to_string());
        log::info!("Started {} execution {}", language, execution.id());

        if !self.config.sync_execution() {
            return Ok(format!("Execution started with ID: {}", execution.id()));
        }

        execution.wait_for_done().await?;
        log::debug!("Execution {} finished", execution.id());

        let logs_output = format_logs(execution.logs());

        if let Some(error) = execution.error().filter(|e| !e.is_empty()) {
            log::warn!("Execution {} failed: {}", execution.id(), error);
            return Err(BlockFailure::Execution(format!(
                "Execution failed with error:\n{}{}",
                error, logs_output
            )));
        }

        Ok(render_block_output(&*execution, &logs_output))
    }
}

fn render_block_output(execution: &dyn RemoteExecution, logs_output: &str) -> String {
    let mut output = execution
        .return_value()
        .and_then(format_return_value)
        .map(|value| format!("Execution result:\n{}", value))
        .unwrap_or_default();
    output.push_str(logs_output);
    output
}

fn format_return_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(fields) if fields.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn format_logs(logs: &[ExecutionLog]) -> String {
    if logs.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = logs.iter().map(ToString::to_string).collect();
    format!("\n\nExecution logs:\n{}", lines.join("\n"))
}

#[async_trait]
impl CodeExecutor for RemoteCodeExecutor {
    fn code_extractor(&self) -> &dyn CodeExtractor {
        &self.extractor
    }

    async fn execute(&self, code_blocks: &[CodeBlock]) -> ExecutionOutcome {
        if code_blocks.is_empty() {
            return ExecutionOutcome::success(String::new(), None);
        }

        let mut outputs: Vec<String> = Vec::with_capacity(code_blocks.len());
        let mut last_execution_id: Option<String> = None;

        for code_block in code_blocks {
            let normalized = normalize_language(&code_block.language);
            let Some(language) = Language::from_normalized(&normalized) else {
                log::warn!("Rejecting code block in unsupported language '{}'", code_block.language);
                return ExecutionOutcome::failure(
                    format!(
                        "Unsupported language: {}. Supported languages: {}",
                        code_block.language,
                        Language::supported_list()
                    ),
                    None,
                );
            };

            match self
                .run_block(language, &code_block.code, &mut last_execution_id)
                .await
            {
                Ok(output) => outputs.push(output),
                Err(BlockFailure::Execution(output)) => {
                    return ExecutionOutcome::failure(output, last_execution_id);
                }
                Err(BlockFailure::Remote(e)) => {
                    log::error!("Error executing code: {}", e);
                    return ExecutionOutcome::failure(
                        format!("Error executing code: {}", e),
                        last_execution_id,
                    );
                }
            }
        }

        ExecutionOutcome::success(outputs.join(OUTPUT_SEPARATOR), last_execution_id)
    }

    fn reset(&self) {
        // Nothing is held between batches; in-flight executions keep running remotely.
        log::debug!("Reset requested for remote code executor");
    }
}
