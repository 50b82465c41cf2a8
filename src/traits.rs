//! The remote service boundary.
//!
//! Provisioning steps talk to the two managed services only through
//! [`SearchBackend`] (content datastores and engines) and [`AgentBackend`]
//! (conversational agents and their flows). The REST implementations live in
//! [`crate::rest`]; tests substitute in-memory fakes.
//!
//! ```text
//! ┌──────────────┐      ┌──────────────────┐
//! │  provision   │─────▶│  SearchBackend   │── Discovery Engine v1alpha
//! │  (steps 2-6) │      └──────────────────┘
//! │              │      ┌──────────────────┐
//! │              │─────▶│  AgentBackend    │── Dialogflow CX v3
//! └──────────────┘      └──────────────────┘
//! ```
//!
//! Create calls return the created resource with its service-assigned name;
//! implementations are responsible for waiting on any long-running
//! operation behind them.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{
    Agent, AgentPage, DataStore, Engine, Flow, GenerativeSettings, Operation, TargetSite,
};

/// Outcome of fetching a resource by name.
///
/// Only a definite "no such resource" answer maps to [`Lookup::NotFound`].
/// Every other failure (permissions, network, server errors) is an `Err`
/// from the fetch itself and must not be read as absence.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Lookup::Found(value),
            None => Lookup::NotFound,
        }
    }
}

/// Content datastores, target sites and engines.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn get_data_store(&self, name: &str) -> Result<Lookup<DataStore>>;

    /// Create `data_store` as `{parent}/dataStores/{data_store_id}`.
    async fn create_data_store(
        &self,
        parent: &str,
        data_store_id: &str,
        data_store: &DataStore,
        create_advanced_site_search: bool,
    ) -> Result<DataStore>;

    /// Register a URI pattern under `{datastore}/siteSearchEngine`.
    async fn create_target_site(
        &self,
        parent: &str,
        target_site: &TargetSite,
    ) -> Result<TargetSite>;

    async fn get_engine(&self, name: &str) -> Result<Lookup<Engine>>;

    /// Create `engine` as `{parent}/engines/{engine_id}`.
    async fn create_engine(
        &self,
        parent: &str,
        engine_id: &str,
        engine: &Engine,
    ) -> Result<Engine>;
}

/// Conversational agents, their generative settings and flows.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// One page of the agents under `parent`; `None` asks for the first.
    async fn list_agents(&self, parent: &str, page_token: Option<&str>) -> Result<AgentPage>;

    async fn create_agent(&self, parent: &str, agent: &Agent) -> Result<Agent>;

    /// Overwrite the settings named by `settings.name`.
    async fn update_generative_settings(
        &self,
        settings: &GenerativeSettings,
    ) -> Result<GenerativeSettings>;

    async fn get_flow(&self, name: &str) -> Result<Flow>;

    /// Overwrite the flow named by `flow.name`.
    async fn update_flow(&self, flow: &Flow) -> Result<Flow>;

    /// Start training; returns without waiting for it to finish.
    async fn train_flow(&self, name: &str) -> Result<Operation>;

    /// Block until the named operation is done.
    async fn wait_operation(&self, operation: &Operation) -> Result<Operation>;
}
