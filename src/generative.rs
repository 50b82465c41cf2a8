//! Generative settings: the persona the agent answers as.
//!
//! Always an update; whatever the agent had before is overwritten.

use anyhow::Result;
use tracing::info;

use crate::config::ProvisionSettings;
use crate::models::{Agent, GenerativeSettings, PersonaSettings};
use crate::names::generative_settings_name;
use crate::traits::AgentBackend;

pub fn generative_settings(agent: &Agent, settings: &ProvisionSettings) -> GenerativeSettings {
    let persona = &settings.persona;
    GenerativeSettings {
        name: generative_settings_name(&agent.name),
        knowledge_connector_settings: PersonaSettings {
            business: settings.company_name.clone(),
            agent: persona.name.clone(),
            agent_identity: persona.identity.clone(),
            business_description: persona.description.clone(),
            agent_scope: persona.scope.clone(),
        },
        language_code: settings.language_code.clone(),
    }
}

pub async fn update_generative_settings(
    agents: &dyn AgentBackend,
    agent: &Agent,
    settings: &ProvisionSettings,
) -> Result<GenerativeSettings> {
    let request = generative_settings(agent, settings);
    info!(
        settings = %request.name,
        persona = %settings.persona.name,
        "updating generative settings"
    );
    agents.update_generative_settings(&request).await
}
