//! Resource-name templating.
//!
//! Every remote resource this tool owns is addressed by a hierarchical path
//! derived only from the project, location, app name and company name, so a
//! re-run with the same inputs resolves to the same resources.

use crate::config::ProvisionSettings;

const DEFAULT_COLLECTION: &str = "default_collection";

/// Deterministic resource paths for one app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    /// `projects/{p}/locations/{l}`
    pub location_parent: String,
    /// `projects/{p}/locations/{l}/collections/default_collection`
    pub collection: String,
    /// `{app}_datastore`
    pub datastore_id: String,
    /// `{collection}/dataStores/{app}_datastore`
    pub datastore: String,
    /// `{app}_chat_engine`
    pub engine_id: String,
    /// `{collection}/engines/{app}_chat_engine`
    pub engine: String,
}

impl ResourceNames {
    pub fn new(project: &str, location: &str, app_name: &str) -> Self {
        let location_parent = format!("projects/{}/locations/{}", project, location);
        let collection = format!("{}/collections/{}", location_parent, DEFAULT_COLLECTION);
        let datastore_id = format!("{}_datastore", app_name);
        let datastore = format!("{}/dataStores/{}", collection, datastore_id);
        let engine_id = format!("{}_chat_engine", app_name);
        let engine = format!("{}/engines/{}", collection, engine_id);

        Self {
            location_parent,
            collection,
            datastore_id,
            datastore,
            engine_id,
            engine,
        }
    }

    pub fn from_settings(settings: &ProvisionSettings) -> Self {
        Self::new(&settings.project, &settings.location, &settings.app_name)
    }

    /// Parent under which target sites are registered.
    pub fn site_search_engine(&self) -> String {
        format!("{}/siteSearchEngine", self.datastore)
    }
}

/// `{agent}/generativeSettings`
pub fn generative_settings_name(agent_name: &str) -> String {
    format!("{}/generativeSettings", agent_name)
}
