//! The provisioning workflow.
//!
//! Steps run strictly in order because each consumes identifiers produced
//! by the one before:
//!
//! ```text
//! datastore ─▶ agent ─▶ engine ─▶ generative settings ─▶ default flow ─▶ training
//! ```
//!
//! Datastore, agent and engine are fetched first and created only when
//! absent. Generative settings and the default flow are overwritten on every
//! run, and training is restarted every run. Nothing created by an earlier
//! step is rolled back when a later step fails.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::agent::ensure_agent;
use crate::config::ProvisionSettings;
use crate::datastore::ensure_datastore;
use crate::engine::ensure_engine;
use crate::flow::{configure_default_flow, train_default_flow};
use crate::generative::update_generative_settings;
use crate::models::{Agent, Operation};
use crate::names::ResourceNames;
use crate::traits::{AgentBackend, SearchBackend};

/// Identifiers produced by a run, consumed by [`crate::publish`].
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    pub datastore_name: String,
    pub datastore_id: String,
    pub datastore_created: bool,
    pub target_sites_created: usize,
    pub engine_name: String,
    pub engine_created: bool,
    pub agent: Agent,
    pub agent_created: bool,
    pub training: Operation,
}

pub async fn run_provision(
    settings: &ProvisionSettings,
    search: &dyn SearchBackend,
    agents: &dyn AgentBackend,
) -> Result<ProvisionOutcome> {
    settings.validate()?;
    let names = ResourceNames::from_settings(settings);
    debug!(
        storage_folder = %settings.datastore_storage_folder,
        "datastore storage folder is not used for public-website datastores"
    );

    let datastore = ensure_datastore(search, settings, &names)
        .await
        .context("Datastore provisioning failed")?;

    let agent = ensure_agent(agents, settings, &names)
        .await
        .context("Agent provisioning failed")?;

    let engine = ensure_engine(search, settings, &names, &datastore.id, &agent.agent)
        .await
        .context("Engine provisioning failed")?;

    update_generative_settings(agents, &agent.agent, settings)
        .await
        .context("Generative settings update failed")?;

    configure_default_flow(agents, &agent.agent, &datastore.name)
        .await
        .context("Default flow update failed")?;

    let training = train_default_flow(agents, &agent.agent, settings.wait_for_training)
        .await
        .context("Flow training failed")?;

    info!(
        datastore_created = datastore.created,
        agent_created = agent.created,
        engine_created = engine.created,
        "provisioning complete"
    );

    Ok(ProvisionOutcome {
        datastore_name: datastore.name,
        datastore_id: datastore.id,
        datastore_created: datastore.created,
        target_sites_created: datastore.target_sites.len(),
        engine_name: engine.name,
        engine_created: engine.created,
        agent: agent.agent,
        agent_created: agent.created,
        training,
    })
}
