//! Publishing a run's results.
//!
//! Three outputs:
//!
//! 1. The env file (default `marketingEnvValue.json`) is read, gains
//!    `AGENT_ENGINE_NAME` and `AGENT_LANGUAGE_CODE`, and is rewritten. Other
//!    keys keep their order. The file must already exist and hold a JSON
//!    object.
//! 2. A summary is printed to stdout.
//! 3. `SEARCH_DATASTORE`, `SEARCH_DATASTORE_ID`, `SEARCH_ENGINE` and
//!    `AGENT_ENGINE` are set in this process's environment by
//!    [`export_environment`]. Child processes spawned afterwards inherit
//!    them; the invoking shell does not.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{info, warn};

use crate::config::{ApiConfig, ProvisionSettings};
use crate::names::ResourceNames;
use crate::provision::ProvisionOutcome;

pub const ENV_SEARCH_DATASTORE: &str = "SEARCH_DATASTORE";
pub const ENV_SEARCH_DATASTORE_ID: &str = "SEARCH_DATASTORE_ID";
pub const ENV_SEARCH_ENGINE: &str = "SEARCH_ENGINE";
pub const ENV_AGENT_ENGINE: &str = "AGENT_ENGINE";

pub const KEY_AGENT_ENGINE_NAME: &str = "AGENT_ENGINE_NAME";
pub const KEY_AGENT_LANGUAGE_CODE: &str = "AGENT_LANGUAGE_CODE";

/// The four variables exported by [`export_environment`].
pub fn environment_values(outcome: &ProvisionOutcome) -> [(&'static str, String); 4] {
    [
        (ENV_SEARCH_DATASTORE, outcome.datastore_name.clone()),
        (ENV_SEARCH_DATASTORE_ID, outcome.datastore_id.clone()),
        (ENV_SEARCH_ENGINE, outcome.engine_name.clone()),
        (ENV_AGENT_ENGINE, outcome.agent.name.clone()),
    ]
}

/// Must only run once every remote call has finished: `set_var` is not
/// synchronised with other threads reading the environment.
pub fn export_environment(outcome: &ProvisionOutcome) {
    for (key, value) in environment_values(outcome) {
        std::env::set_var(key, value);
    }
    warn!(
        "environment variables are set for this process only; \
         read the env file from other processes"
    );
}

/// Merge the agent identifiers into the JSON object stored at `path`.
pub fn merge_env_file(
    path: &Path,
    agent_name: &str,
    language_code: &str,
) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read env file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse env file: {}", path.display()))?;

    let mut data = match value {
        Value::Object(map) => map,
        other => bail!(
            "env file {} must contain a JSON object, found {}",
            path.display(),
            json_kind(&other)
        ),
    };

    data.insert(KEY_AGENT_ENGINE_NAME.to_string(), Value::String(agent_name.to_string()));
    data.insert(
        KEY_AGENT_LANGUAGE_CODE.to_string(),
        Value::String(language_code.to_string()),
    );

    let rendered = serde_json::to_string_pretty(&data)?;
    std::fs::write(path, rendered + "\n")
        .with_context(|| format!("Failed to write env file: {}", path.display()))?;

    info!(path = %path.display(), "updated env file");
    Ok(data)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn print_summary(outcome: &ProvisionOutcome) {
    let status = |created: bool| if created { "created" } else { "existing" };

    println!("Chat engine app results:");
    println!(
        "  Datastore:           {} ({})",
        outcome.datastore_name,
        status(outcome.datastore_created)
    );
    if outcome.target_sites_created > 0 {
        println!("  Target sites:        {}", outcome.target_sites_created);
    }
    println!(
        "  App:                 {} ({})",
        outcome.engine_name,
        status(outcome.engine_created)
    );
    println!(
        "  Dialogflow CX Agent: {} ({})",
        outcome.agent.name,
        status(outcome.agent_created)
    );
    println!(
        "  Training:            {} ({})",
        outcome.training.name,
        if outcome.training.done { "done" } else { "running" }
    );
}

/// Env file, then summary. The environment is exported separately.
pub fn publish(outcome: &ProvisionOutcome, env_file: &Path) -> Result<()> {
    merge_env_file(
        env_file,
        &outcome.agent.name,
        &outcome.agent.default_language_code,
    )?;
    print_summary(outcome);
    Ok(())
}

/// `--dry-run` output: the names a run would use, without touching anything.
pub fn print_plan(settings: &ProvisionSettings, api: &ApiConfig, env_file: &Path) {
    let names = ResourceNames::from_settings(settings);

    println!("Planned resources (dry run, nothing was changed):");
    println!("  Search API:   {}", api.discovery_endpoint_for(&settings.location));
    println!("  Agent API:    {}", api.dialogflow_endpoint_for(&settings.location));
    println!("  Datastore:    {}", names.datastore);
    for uri in &settings.uris {
        println!("    target site {}", uri);
    }
    println!(
        "  Agent:        display name '{}' under {}",
        settings.company_name, names.location_parent
    );
    println!("  App:          {}", names.engine);
    println!("  Persona:      {} ({})", settings.persona.name, settings.persona.identity);
    println!("  Env file:     {}", env_file.display());
}
