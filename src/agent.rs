//! Agent provisioning.
//!
//! The agent for a company is the first one whose display name equals the
//! company name exactly (case and whitespace included). Pages are requested
//! one at a time and the scan stops at the first match.

use anyhow::Result;
use tracing::{debug, info};

use crate::config::ProvisionSettings;
use crate::models::Agent;
use crate::names::ResourceNames;
use crate::traits::AgentBackend;

/// Result of [`ensure_agent`].
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub agent: Agent,
    pub created: bool,
}

/// Walk the paginated agent collection under `parent` looking for
/// `display_name`.
pub async fn find_agent_by_display_name(
    agents: &dyn AgentBackend,
    parent: &str,
    display_name: &str,
) -> Result<Option<Agent>> {
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = agents.list_agents(parent, page_token.as_deref()).await?;
        pages += 1;

        if let Some(agent) = page.agents.iter().find(|a| a.display_name == display_name) {
            debug!(pages, "matched agent by display name");
            return Ok(Some(agent.clone()));
        }

        match page.next_token() {
            Some(token) => page_token = Some(token.to_string()),
            None => {
                debug!(pages, "agent collection exhausted");
                return Ok(None);
            }
        }
    }
}

/// Request body for a new agent.
pub fn agent_request(settings: &ProvisionSettings) -> Agent {
    Agent {
        display_name: settings.company_name.clone(),
        default_language_code: settings.language_code.clone(),
        time_zone: settings.time_zone.clone(),
        ..Default::default()
    }
}

/// Reuse the company's agent or create one.
pub async fn ensure_agent(
    agents: &dyn AgentBackend,
    settings: &ProvisionSettings,
    names: &ResourceNames,
) -> Result<AgentOutcome> {
    let parent = &names.location_parent;

    if let Some(agent) = find_agent_by_display_name(agents, parent, &settings.company_name).await? {
        info!(agent = %agent.name, "agent already exists");
        return Ok(AgentOutcome {
            agent,
            created: false,
        });
    }

    info!(display_name = %settings.company_name, "creating agent");
    let agent = agents.create_agent(parent, &agent_request(settings)).await?;
    Ok(AgentOutcome {
        agent,
        created: true,
    })
}
