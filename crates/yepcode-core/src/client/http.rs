//! HTTP client for the YepCode Run REST API

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::{RemoteExecution, RemoteRunner, RunOptions};
use crate::config::{ResolvedConfig, API_HOST_ENV};
use crate::core_types::ExecutionLog;
use crate::errors::RemoteError;

const API_TOKEN_HEADER: &str = "x-api-token";
const EXECUTIONS_PATH: &str = "/api/run/executions";
const USER_AGENT: &str = concat!("yepcode-core/", env!("CARGO_PKG_VERSION"));

const STATUS_FINISHED: &str = "FINISHED";
const TERMINAL_STATUSES: [&str; 4] = [STATUS_FINISHED, "KILLED", "REJECTED", "ERROR"];

#[derive(Debug)]
struct ApiClient {
    client: Client,
    api_host: String,
    poll_interval: Duration,
}

impl ApiClient {
    fn executions_url(&self) -> String {
        format!("{}{}", self.api_host, EXECUTIONS_PATH)
    }

    fn execution_url(&self, id: &str) -> String {
        format!("{}/{}", self.executions_url(), id)
    }

    async fn check(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            body
        };
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    code: &'a str,
    #[serde(flatten)]
    options: &'a RunOptions,
}

#[derive(Debug, Deserialize)]
struct SubmittedExecution {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecutionState {
    status: String,
    #[serde(default)]
    return_value: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl ExecutionState {
    fn is_terminal(&self) -> bool {
        TERMINAL_STATUSES.contains(&self.status.as_str())
    }
}

/// `RemoteRunner` speaking the execution REST contract (submit, poll, logs).
///
/// There is no built-in endpoint: point `api_host` at a service or proxy that
/// serves `/api/run/executions` and accepts the `x-api-token` header.
#[derive(Debug, Clone)]
pub struct HttpRunner {
    api: Arc<ApiClient>,
}

impl HttpRunner {
    pub fn new(config: &ResolvedConfig) -> Result<Self, RemoteError> {
        let api_host = config.api_host().ok_or_else(|| {
            RemoteError::InvalidConfig(format!(
                "API host is required. Provide it via api_host or the {} environment variable.",
                API_HOST_ENV
            ))
        })?;
        Url::parse(api_host).map_err(|e| {
            RemoteError::InvalidConfig(format!("invalid API host '{}': {}", api_host, e))
        })?;

        let mut token = HeaderValue::from_str(config.api_token()).map_err(|_| {
            RemoteError::InvalidConfig("API token contains characters not allowed in a header".to_string())
        })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_TOKEN_HEADER, token);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            api: Arc::new(ApiClient {
                client,
                api_host: api_host.to_string(),
                poll_interval: config.poll_interval(),
            }),
        })
    }
}

#[async_trait]
impl RemoteRunner for HttpRunner {
    async fn run(
        &self,
        code: &str,
        options: &RunOptions,
    ) -> Result<Box<dyn RemoteExecution>, RemoteError> {
        let response = self
            .api
            .client
            .post(self.api.executions_url())
            .json(&RunRequest { code, options })
            .send()
            .await?;

        let submitted: SubmittedExecution = ApiClient::check(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(format!("failed to parse run response: {}", e)))?;

        log::debug!("Submitted execution {}", submitted.id);

        Ok(Box::new(HttpExecution {
            api: Arc::clone(&self.api),
            id: submitted.id,
            error: None,
            return_value: None,
            logs: Vec::new(),
        }))
    }
}

pub struct HttpExecution {
    api: Arc<ApiClient>,
    id: String,
    error: Option<String>,
    return_value: Option<Value>,
    logs: Vec<ExecutionLog>,
}

impl HttpExecution {
    async fn fetch_state(&self) -> Result<ExecutionState, RemoteError> {
        let response = self
            .api
            .client
            .get(self.api.execution_url(&self.id))
            .send()
            .await?;
        ApiClient::check(response).await?.json().await.map_err(|e| {
            RemoteError::InvalidResponse(format!("failed to parse execution {}: {}", self.id, e))
        })
    }

    async fn fetch_logs(&self) -> Result<Vec<ExecutionLog>, RemoteError> {
        let response = self
            .api
            .client
            .get(format!("{}/logs", self.api.execution_url(&self.id)))
            .send()
            .await?;
        ApiClient::check(response).await?.json().await.map_err(|e| {
            RemoteError::InvalidResponse(format!("failed to parse logs of execution {}: {}", self.id, e))
        })
    }
}

#[async_trait]
impl RemoteExecution for HttpExecution {
    fn id(&self) -> &str {
        &self.id
    }

    async fn wait_for_done(&mut self) -> Result<(), RemoteError> {
        let state = loop {
            let state = self.fetch_state().await?;
            if state.is_terminal() {
                break state;
            }
            log::debug!("Execution {} is {}, polling again", self.id, state.status);
            tokio::time::sleep(self.api.poll_interval).await;
        };

        let status_error = (state.status != STATUS_FINISHED)
            .then(|| format!("Execution ended with status {}", state.status));
        self.error = state
            .error
            .filter(|e| !e.is_empty())
            .or(status_error);
        self.return_value = state.return_value.filter(|v| !v.is_null());
        self.logs = self.fetch_logs().await?;
        Ok(())
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
