//! Wire types for the two managed services.
//!
//! Field names follow the REST JSON representation (`camelCase`). Only the
//! fields this tool reads or writes are modelled; [`Flow`] additionally keeps
//! every unknown field so a fetch → modify → update round trip does not drop
//! anything the service returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const INDUSTRY_VERTICAL_GENERIC: &str = "GENERIC";
pub const SOLUTION_TYPE_CHAT: &str = "SOLUTION_TYPE_CHAT";
pub const CONTENT_CONFIG_PUBLIC_WEBSITE: &str = "PUBLIC_WEBSITE";
pub const DATA_STORE_TYPE_PUBLIC_WEB: &str = "PUBLIC_WEB";
pub const EVENT_NO_MATCH_DEFAULT: &str = "sys.no-match-default";
pub const EVENT_NO_INPUT_DEFAULT: &str = "sys.no-input-default";

// ============ Discovery Engine ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStore {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub industry_vertical: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solution_types: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_config: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSite {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub provided_uri_pattern: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub generated_uri_pattern: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEngineConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dialogflow_agent_to_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company_name: String,
}

/// Filled in by the service once an engine exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEngineMetadata {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dialogflow_agent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engine {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_engine_config: Option<ChatEngineConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_engine_metadata: Option<ChatEngineMetadata>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub solution_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_store_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_config: Option<CommonConfig>,
}

// ============ Dialogflow CX ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub default_language_code: String,
    #[serde(default)]
    pub time_zone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub start_flow: String,
}

/// One page of `agents.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPage {
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl AgentPage {
    /// Token for the following page, if the collection continues.
    pub fn next_token(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaSettings {
    pub business: String,
    pub agent: String,
    pub agent_identity: String,
    pub business_description: String,
    pub agent_scope: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerativeSettings {
    pub name: String,
    pub knowledge_connector_settings: PersonaSettings,
    pub language_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStoreConnection {
    pub data_store_type: String,
    pub data_store: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeConnectorSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_store_connections: Vec<DataStoreConnection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fulfillment {
    #[serde(default)]
    pub enable_generative_fallback: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHandler {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_fulfillment: Option<Fulfillment>,
}

impl EventHandler {
    /// Handler that answers `event` with a generated response.
    pub fn generative_fallback(event: &str) -> Self {
        Self {
            name: event.to_string(),
            event: event.to_string(),
            trigger_fulfillment: Some(Fulfillment {
                enable_generative_fallback: true,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default)]
    pub event_handlers: Vec<EventHandler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_connector_settings: Option<KnowledgeConnectorSettings>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============ Long-running operations ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// A `google.longrunning.Operation` as returned by both services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}
