//! REST implementations of the service boundary.
//!
//! [`DiscoveryEngineClient`] speaks Discovery Engine `v1alpha` and
//! [`DialogflowClient`] speaks Dialogflow CX `v3`. Both share one
//! [`RestClient`] holding the HTTP client, the token source and the
//! operation-polling settings.
//!
//! # Status handling
//!
//! - HTTP 404 on a fetch → [`Lookup::NotFound`]
//! - any other non-2xx → [`ApiError::Status`]
//! - connection/timeout failures → [`ApiError::Transport`]
//!
//! No call is retried here; a failed request aborts the run.
//!
//! # Long-running operations
//!
//! Datastore, target-site and engine creation return an operation. The
//! client polls `GET {operation}` every `operations.poll_interval_secs` until
//! it is done (or `operations.timeout_secs` elapses) and decodes the
//! operation's `response` as the created resource.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::auth::TokenSource;
use crate::config::Config;
use crate::error::{truncate_body, ApiError};
use crate::models::{
    Agent, AgentPage, DataStore, Engine, Flow, GenerativeSettings, Operation, TargetSite,
};
use crate::traits::{AgentBackend, Lookup, SearchBackend};

const DISCOVERY_API_VERSION: &str = "v1alpha";
const DIALOGFLOW_API_VERSION: &str = "v3";

/// Authorized JSON transport shared by both service clients.
pub struct RestClient {
    http: reqwest::Client,
    auth: TokenSource,
    quota_project: String,
    poll_interval: Duration,
    operation_timeout: Duration,
}

impl RestClient {
    /// `quota_project` is sent as `x-goog-user-project` on every request.
    pub fn new(config: &Config, auth: TokenSource, quota_project: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            auth,
            quota_project: quota_project.to_string(),
            poll_interval: Duration::from_secs(config.operations.poll_interval_secs),
            operation_timeout: Duration::from_secs(config.operations.timeout_secs),
        })
    }

    /// Override operation polling (tests poll in milliseconds).
    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.operation_timeout = timeout;
        self
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<Value>,
        allow_not_found: bool,
    ) -> Result<Option<Value>, ApiError> {
        let headers = self.auth.headers().await?;
        let mut request = self
            .http
            .request(method.clone(), url)
            .headers(headers)
            .header("x-goog-user-project", &self.quota_project);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        debug!(%method, url, "sending request");
        let transport = |source: reqwest::Error| ApiError::Transport {
            method: method.to_string(),
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        if allow_not_found && status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                method: method.to_string(),
                url: url.to_string(),
                body: truncate_body(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Some(Value::Object(Map::new())));
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let value = self
            .send(Method::GET, url, query, None, false)
            .await?
            .unwrap_or_default();
        decode(url, value)
    }

    async fn get_optional<T: DeserializeOwned>(&self, url: &str) -> Result<Lookup<T>, ApiError> {
        match self.send(Method::GET, url, &[], None, true).await? {
            Some(value) => decode(url, value).map(Lookup::Found),
            None => Ok(Lookup::NotFound),
        }
    }

    async fn write<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })?;
        let value = self
            .send(method, url, query, Some(body), false)
            .await?
            .unwrap_or_default();
        decode(url, value)
    }

    /// Poll `operation` under `base` until it reports `done`.
    async fn wait_operation(
        &self,
        base: &str,
        operation: &Operation,
    ) -> Result<Operation, ApiError> {
        let started = Instant::now();
        let mut current = operation.clone();

        while !current.done {
            if started.elapsed() >= self.operation_timeout {
                return Err(ApiError::OperationTimeout {
                    name: current.name.clone(),
                    secs: self.operation_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
            debug!(operation = %current.name, "polling operation");
            current = self.get(&format!("{}/{}", base, current.name), &[]).await?;
        }

        if let Some(error) = &current.error {
            return Err(ApiError::Operation {
                name: current.name.clone(),
                code: error.code,
                message: error.message.clone(),
            });
        }
        Ok(current)
    }
}

fn decode<T: DeserializeOwned>(url: &str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Decode the resource carried in a finished operation, if any.
fn operation_response<T: DeserializeOwned>(
    base: &str,
    operation: &Operation,
) -> Result<Option<T>, ApiError> {
    match &operation.response {
        Some(value) => decode(&format!("{}/{}", base, operation.name), value.clone()).map(Some),
        None => Ok(None),
    }
}

fn api_base(endpoint: &str, version: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), version)
}

// ═══════════════════════════════════════════════════════════════════════
// Discovery Engine
// ═══════════════════════════════════════════════════════════════════════

pub struct DiscoveryEngineClient {
    rest: Arc<RestClient>,
    base: String,
}

impl DiscoveryEngineClient {
    pub fn new(rest: Arc<RestClient>, endpoint: &str) -> Self {
        Self {
            rest,
            base: api_base(endpoint, DISCOVERY_API_VERSION),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    /// Wait for a create operation and return the resource it produced,
    /// falling back to fetching `name` when the operation carries no body.
    async fn finish_create<T: DeserializeOwned>(
        &self,
        operation: Operation,
        name: &str,
    ) -> Result<T> {
        let done = self.rest.wait_operation(&self.base, &operation).await?;
        if let Some(resource) = operation_response(&self.base, &done)? {
            return Ok(resource);
        }
        match self.rest.get_optional(&self.url(name)).await? {
            Lookup::Found(resource) => Ok(resource),
            Lookup::NotFound => anyhow::bail!(
                "operation {} finished but {} does not exist",
                done.name,
                name
            ),
        }
    }
}

#[async_trait]
impl SearchBackend for DiscoveryEngineClient {
    async fn get_data_store(&self, name: &str) -> Result<Lookup<DataStore>> {
        Ok(self.rest.get_optional(&self.url(name)).await?)
    }

    async fn create_data_store(
        &self,
        parent: &str,
        data_store_id: &str,
        data_store: &DataStore,
        create_advanced_site_search: bool,
    ) -> Result<DataStore> {
        let query = [
            ("dataStoreId", data_store_id.to_string()),
            (
                "createAdvancedSiteSearch",
                create_advanced_site_search.to_string(),
            ),
        ];
        let url = self.url(&format!("{}/dataStores", parent));
        let operation: Operation = self
            .rest
            .write(Method::POST, &url, &query, data_store)
            .await
            .with_context(|| format!("Failed to create datastore {}", data_store_id))?;

        let name = format!("{}/dataStores/{}", parent, data_store_id);
        self.finish_create(operation, &name).await
    }

    async fn create_target_site(
        &self,
        parent: &str,
        target_site: &TargetSite,
    ) -> Result<TargetSite> {
        let url = self.url(&format!("{}/targetSites", parent));
        let operation: Operation = self
            .rest
            .write(Method::POST, &url, &[], target_site)
            .await
            .with_context(|| {
                format!(
                    "Failed to create target site {}",
                    target_site.provided_uri_pattern
                )
            })?;

        let done = self.rest.wait_operation(&self.base, &operation).await?;
        Ok(operation_response(&self.base, &done)?.unwrap_or_else(|| target_site.clone()))
    }

    async fn get_engine(&self, name: &str) -> Result<Lookup<Engine>> {
        Ok(self.rest.get_optional(&self.url(name)).await?)
    }

    async fn create_engine(
        &self,
        parent: &str,
        engine_id: &str,
        engine: &Engine,
    ) -> Result<Engine> {
        let query = [("engineId", engine_id.to_string())];
        let url = self.url(&format!("{}/engines", parent));
        let operation: Operation = self
            .rest
            .write(Method::POST, &url, &query, engine)
            .await
            .with_context(|| format!("Failed to create engine {}", engine_id))?;

        let name = format!("{}/engines/{}", parent, engine_id);
        self.finish_create(operation, &name).await
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Dialogflow CX
// ═══════════════════════════════════════════════════════════════════════

pub struct DialogflowClient {
    rest: Arc<RestClient>,
    base: String,
    page_size: u32,
}

impl DialogflowClient {
    pub fn new(rest: Arc<RestClient>, endpoint: &str, page_size: u32) -> Self {
        Self {
            rest,
            base: api_base(endpoint, DIALOGFLOW_API_VERSION),
            page_size,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }
}

#[async_trait]
impl AgentBackend for DialogflowClient {
    async fn list_agents(&self, parent: &str, page_token: Option<&str>) -> Result<AgentPage> {
        let mut query = vec![("pageSize", self.page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        let page = self
            .rest
            .get(&self.url(&format!("{}/agents", parent)), &query)
            .await
            .with_context(|| format!("Failed to list agents under {}", parent))?;
        Ok(page)
    }

    async fn create_agent(&self, parent: &str, agent: &Agent) -> Result<Agent> {
        let created = self
            .rest
            .write(
                Method::POST,
                &self.url(&format!("{}/agents", parent)),
                &[],
                agent,
            )
            .await
            .with_context(|| format!("Failed to create agent '{}'", agent.display_name))?;
        Ok(created)
    }

    async fn update_generative_settings(
        &self,
        settings: &GenerativeSettings,
    ) -> Result<GenerativeSettings> {
        let updated = self
            .rest
            .write(Method::PATCH, &self.url(&settings.name), &[], settings)
            .await
            .with_context(|| format!("Failed to update {}", settings.name))?;
        Ok(updated)
    }

    async fn get_flow(&self, name: &str) -> Result<Flow> {
        let flow = self
            .rest
            .get(&self.url(name), &[])
            .await
            .with_context(|| format!("Failed to fetch flow {}", name))?;
        Ok(flow)
    }

    async fn update_flow(&self, flow: &Flow) -> Result<Flow> {
        let updated = self
            .rest
            .write(Method::PATCH, &self.url(&flow.name), &[], flow)
            .await
            .with_context(|| format!("Failed to update flow {}", flow.name))?;
        Ok(updated)
    }

    async fn train_flow(&self, name: &str) -> Result<Operation> {
        let operation = self
            .rest
            .write(
                Method::POST,
                &self.url(&format!("{}:train", name)),
                &[],
                &Value::Object(Map::new()),
            )
            .await
            .with_context(|| format!("Failed to start training for {}", name))?;
        Ok(operation)
    }

    async fn wait_operation(&self, operation: &Operation) -> Result<Operation> {
        Ok(self.rest.wait_operation(&self.base, operation).await?)
    }
}
