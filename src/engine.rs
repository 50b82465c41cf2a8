//! Chat-engine provisioning: links the datastore to the agent.

use anyhow::Result;
use tracing::info;

use crate::config::ProvisionSettings;
use crate::models::{Agent, ChatEngineConfig, CommonConfig, Engine, SOLUTION_TYPE_CHAT};
use crate::names::ResourceNames;
use crate::traits::{Lookup, SearchBackend};

#[derive(Debug, Clone)]
pub struct EngineOutcome {
    pub engine: Engine,
    pub name: String,
    pub created: bool,
}

/// Request body for a new chat engine.
pub fn engine_request(
    names: &ResourceNames,
    datastore_id: &str,
    agent: &Agent,
    company_name: &str,
) -> Engine {
    Engine {
        display_name: names.engine_id.clone(),
        chat_engine_config: Some(ChatEngineConfig {
            dialogflow_agent_to_link: agent.name.clone(),
        }),
        solution_type: SOLUTION_TYPE_CHAT.to_string(),
        data_store_ids: vec![datastore_id.to_string()],
        common_config: Some(CommonConfig {
            company_name: company_name.to_string(),
        }),
        ..Default::default()
    }
}

/// Reuse `{app}_chat_engine` or create it pointing at `agent` and the datastore.
pub async fn ensure_engine(
    search: &dyn SearchBackend,
    settings: &ProvisionSettings,
    names: &ResourceNames,
    datastore_id: &str,
    agent: &Agent,
) -> Result<EngineOutcome> {
    if let Lookup::Found(engine) = search.get_engine(&names.engine).await? {
        info!(engine = %names.engine, "engine already exists");
        return Ok(EngineOutcome {
            engine,
            name: names.engine.clone(),
            created: false,
        });
    }

    info!(engine = %names.engine, agent = %agent.name, "creating chat engine");
    let request = engine_request(names, datastore_id, agent, &settings.company_name);
    let engine = search
        .create_engine(&names.collection, &names.engine_id, &request)
        .await?;

    Ok(EngineOutcome {
        engine,
        name: names.engine.clone(),
        created: true,
    })
}
