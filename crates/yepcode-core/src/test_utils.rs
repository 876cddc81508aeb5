//! Scripted remote runner for unit tests

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::client::{RemoteExecution, RemoteRunner, RunOptions};
use crate::core_types::ExecutionLog;
use crate::errors::RemoteError;

/// Canned terminal state for one execution.
#[derive(Debug, Clone, Default)]
pub struct MockExecution {
    id: String,
    error: Option<String>,
    return_value: Option<Value>,
    logs: Vec<ExecutionLog>,
    wait_error: Option<String>,
    waits: Option<Arc<AtomicUsize>>,
}

impl MockExecution {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn with_return_value(mut self, value: Value) -> Self {
        self.return_value = Some(value);
        self
    }

    pub fn with_logs(mut self, logs: Vec<ExecutionLog>) -> Self {
        self.logs = logs;
        self
    }

    pub fn with_wait_error(mut self, message: &str) -> Self {
        self.wait_error = Some(message.to_string());
        self
    }
}

#[async_trait]
impl RemoteExecution for MockExecution {
    fn id(&self) -> &str {
        &self.id
    }

    async fn wait_for_done(&mut self) -> Result<(), RemoteError> {
        if let Some(waits) = &self.waits {
            waits.fetch_add(1, Ordering::SeqCst);
        }
        match &self.wait_error {
            Some(message) => Err(RemoteError::InvalidResponse(message.clone())),
            None => Ok(()),
        }
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn return_value(&self) -> Option<&Value> {
        self.return_value.as_ref()
    }

    fn logs(&self) -> &[ExecutionLog] {
        &self.logs
    }
}

/// Hands out the scripted executions in order, cycling when exhausted.
pub struct MockRunner {
    executions: Vec<MockExecution>,
    run_error: Option<String>,
    calls: Mutex<Vec<(String, RunOptions)>>,
    waits: Arc<AtomicUsize>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::with_executions(vec![MockExecution::new("mock_execution")])
    }

    pub fn with_executions(executions: Vec<MockExecution>) -> Self {
        Self {
            executions,
            run_error: None,
            calls: Mutex::new(Vec::new()),
            waits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_run_error(message: &str) -> Self {
        Self {
            run_error: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, RunOptions)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn wait_count(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteRunner for MockRunner {
    async fn run(
        &self,
        code: &str,
        options: &RunOptions,
    ) -> Result<Box<dyn RemoteExecution>, RemoteError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((code.to_string(), options.clone()));
            calls.len() - 1
        };

        if let Some(message) = &self.run_error {
            return Err(RemoteError::Api {
                status: 503,
                message: message.clone(),
            });
        }

        let mut execution = self.executions[index % self.executions.len()].clone();
        execution.waits = Some(Arc::clone(&self.waits));
        Ok(Box::new(execution))
    }
}
