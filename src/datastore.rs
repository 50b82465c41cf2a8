//! Datastore provisioning.
//!
//! Ensures `{app}_datastore` exists as a public-website chat datastore with
//! advanced site search, indexing the configured URI patterns when (and only
//! when) the datastore is created by this run.

use anyhow::Result;
use tracing::info;

use crate::config::ProvisionSettings;
use crate::models::{
    DataStore, TargetSite, CONTENT_CONFIG_PUBLIC_WEBSITE, INDUSTRY_VERTICAL_GENERIC,
    SOLUTION_TYPE_CHAT,
};
use crate::names::ResourceNames;
use crate::traits::{Lookup, SearchBackend};

/// Result of [`ensure_datastore`].
#[derive(Debug, Clone)]
pub struct DatastoreOutcome {
    pub data_store: DataStore,
    /// Full resource path, usable as a chat-engine source.
    pub name: String,
    /// Short id (`{app}_datastore`).
    pub id: String,
    pub created: bool,
    pub target_sites: Vec<TargetSite>,
}

/// Request body for a new datastore.
pub fn datastore_request(names: &ResourceNames) -> DataStore {
    DataStore {
        display_name: names.datastore_id.clone(),
        industry_vertical: INDUSTRY_VERTICAL_GENERIC.to_string(),
        solution_types: vec![SOLUTION_TYPE_CHAT.to_string()],
        content_config: CONTENT_CONFIG_PUBLIC_WEBSITE.to_string(),
        ..Default::default()
    }
}

/// Fetch the app's datastore, creating and indexing it if absent.
///
/// An existing datastore is returned untouched: URIs passed on this run are
/// not re-registered.
pub async fn ensure_datastore(
    search: &dyn SearchBackend,
    settings: &ProvisionSettings,
    names: &ResourceNames,
) -> Result<DatastoreOutcome> {
    if let Lookup::Found(data_store) = search.get_data_store(&names.datastore).await? {
        info!(datastore = %names.datastore, "datastore already exists");
        return Ok(DatastoreOutcome {
            data_store,
            name: names.datastore.clone(),
            id: names.datastore_id.clone(),
            created: false,
            target_sites: Vec::new(),
        });
    }

    info!(datastore = %names.datastore, "creating datastore");
    let data_store = search
        .create_data_store(
            &names.collection,
            &names.datastore_id,
            &datastore_request(names),
            true,
        )
        .await?;

    let parent = names.site_search_engine();
    let mut target_sites = Vec::with_capacity(settings.uris.len());
    for uri in &settings.uris {
        info!(uri = %uri, "creating target site");
        let site = TargetSite {
            provided_uri_pattern: uri.clone(),
            ..Default::default()
        };
        target_sites.push(search.create_target_site(&parent, &site).await?);
    }

    Ok(DatastoreOutcome {
        data_store,
        name: names.datastore.clone(),
        id: names.datastore_id.clone(),
        created: true,
        target_sites,
    })
}
