//! Default-flow configuration and retraining.
//!
//! The agent's start flow gets a public-web datastore connection and exactly
//! two event handlers, `sys.no-match-default` and `sys.no-input-default`,
//! both answering with generative fallback. Any previous handlers are
//! replaced. The flow is then retrained.

use anyhow::{bail, Result};
use tracing::info;

use crate::models::{
    Agent, DataStoreConnection, EventHandler, Flow, KnowledgeConnectorSettings, Operation,
    DATA_STORE_TYPE_PUBLIC_WEB, EVENT_NO_INPUT_DEFAULT, EVENT_NO_MATCH_DEFAULT,
};
use crate::traits::AgentBackend;

/// Apply the knowledge connector and fallback handlers to `flow` in place.
pub fn apply_generative_fallback(flow: &mut Flow, datastore_name: &str) {
    flow.knowledge_connector_settings = Some(KnowledgeConnectorSettings {
        enabled: true,
        data_store_connections: vec![DataStoreConnection {
            data_store_type: DATA_STORE_TYPE_PUBLIC_WEB.to_string(),
            data_store: datastore_name.to_string(),
        }],
    });
    flow.event_handlers = vec![
        EventHandler::generative_fallback(EVENT_NO_MATCH_DEFAULT),
        EventHandler::generative_fallback(EVENT_NO_INPUT_DEFAULT),
    ];
}

fn start_flow(agent: &Agent) -> Result<&str> {
    if agent.start_flow.is_empty() {
        bail!("agent {} has no start flow", agent.name);
    }
    Ok(&agent.start_flow)
}

/// Fetch, modify and push the agent's start flow.
pub async fn configure_default_flow(
    agents: &dyn AgentBackend,
    agent: &Agent,
    datastore_name: &str,
) -> Result<Flow> {
    let name = start_flow(agent)?;
    let mut flow = agents.get_flow(name).await?;
    apply_generative_fallback(&mut flow, datastore_name);

    info!(flow = %flow.name, datastore = %datastore_name, "updating default flow");
    agents.update_flow(&flow).await
}

/// Start retraining the start flow; with `wait`, block until it finishes.
pub async fn train_default_flow(
    agents: &dyn AgentBackend,
    agent: &Agent,
    wait: bool,
) -> Result<Operation> {
    let name = start_flow(agent)?;
    info!(flow = %name, "starting flow training");
    let operation = agents.train_flow(name).await?;

    if !wait {
        return Ok(operation);
    }

    info!(operation = %operation.name, "waiting for training to finish");
    agents.wait_operation(&operation).await
}
