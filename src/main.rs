//! # Chat Engine Setup CLI (`chat-engine-setup`)
//!
//! Creates (or reuses) the datastore, Dialogflow CX agent and chat engine for
//! an app, then enables generative fallback on the agent's default flow.
//!
//! ## Example
//!
//! ```bash
//! chat-engine-setup --project=my-project --app-name=my_app \
//!     --company-name=my_company --uris="support.example.com/*,docs.example.com/*"
//!
//! # Show the resource names without calling any API
//! chat-engine-setup --project=my-project --app-name=my_app \
//!     --company-name=my_company --uris="support.example.com/*" --dry-run
//! ```
//!
//! Requests are authorized with Application Default Credentials unless
//! `--access-token` (or `GOOGLE_OAUTH_ACCESS_TOKEN`) is given. Log verbosity
//! follows `RUST_LOG` (default `info`).

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use chat_engine_setup::auth::TokenSource;
use chat_engine_setup::config::{self, AgentPersona, Config, ProvisionSettings};
use chat_engine_setup::provision::run_provision;
use chat_engine_setup::publish;
use chat_engine_setup::rest::{DialogflowClient, DiscoveryEngineClient, RestClient};

/// Provision a conversational-search app: datastore, agent, chat engine and
/// generative fallback.
#[derive(Parser, Debug)]
#[command(name = "chat-engine-setup", version, about)]
struct Cli {
    /// Id of the Google Cloud project to use.
    #[arg(long)]
    project: String,

    /// Location to deploy to.
    #[arg(long, default_value = "global")]
    location: String,

    /// Application name; datastore and engine ids derive from it.
    #[arg(long)]
    app_name: String,

    /// Company name; also the agent's display name.
    #[arg(long)]
    company_name: String,

    /// Comma-separated URI patterns to index (e.g. `example.com/*`).
    #[arg(long, value_delimiter = ',', required = true)]
    uris: Vec<String>,

    /// Cloud Storage folder for document datastores (currently unused).
    #[arg(long, default_value = "cloud-samples-data/dialogflow-cx/arc-lifebloo")]
    datastore_storage_folder: String,

    /// Agent name used in the generative persona.
    #[arg(long, default_value = "Donate")]
    agent_name: String,

    /// Agent identity used in the generative persona.
    #[arg(long, default_value = "chatbot")]
    agent_identity: String,

    /// Business description used in the generative persona.
    #[arg(long, default_value = "Save a life, a fictitious organization")]
    agent_description: String,

    /// Agent scope used in the generative persona.
    #[arg(long, default_value = "humans with eligibility information")]
    agent_scope: String,

    /// Optional TOML configuration file (endpoints, polling, agent defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file that receives the agent name and language code.
    /// Overrides `[output].env_file`.
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Wait for flow training to finish before exiting.
    #[arg(long)]
    wait_for_training: bool,

    /// OAuth access token to use instead of Application Default Credentials.
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Print the resource names that would be used and exit.
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn settings(&self, config: &Config) -> ProvisionSettings {
        ProvisionSettings {
            project: self.project.clone(),
            location: self.location.clone(),
            app_name: self.app_name.clone(),
            company_name: self.company_name.clone(),
            uris: self.uris.iter().map(|u| u.trim().to_string()).collect(),
            datastore_storage_folder: self.datastore_storage_folder.clone(),
            persona: AgentPersona {
                name: self.agent_name.clone(),
                identity: self.agent_identity.clone(),
                description: self.agent_description.clone(),
                scope: self.agent_scope.clone(),
            },
            language_code: config.agent.default_language_code.clone(),
            time_zone: config.agent.time_zone.clone(),
            wait_for_training: self.wait_for_training,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// Provisioning is strictly sequential, so a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let cfg = config::load_config(cli.config.as_deref())?;
    let settings = cli.settings(&cfg);
    settings.validate()?;

    let env_file = cli
        .env_file
        .clone()
        .unwrap_or_else(|| cfg.output.env_file.clone());

    if cli.dry_run {
        publish::print_plan(&settings, &cfg.api, &env_file);
        return Ok(());
    }

    let auth = match &cli.access_token {
        Some(token) => TokenSource::static_token(token.clone()),
        None => TokenSource::application_default()?,
    };
    let rest = Arc::new(RestClient::new(&cfg, auth, &settings.project)?);
    let search = DiscoveryEngineClient::new(
        rest.clone(),
        &cfg.api.discovery_endpoint_for(&settings.location),
    );
    let agents = DialogflowClient::new(
        rest,
        &cfg.api.dialogflow_endpoint_for(&settings.location),
        cfg.api.page_size,
    );

    let outcome = run_provision(&settings, &search, &agents).await?;
    publish::publish(&outcome, &env_file)?;
    // Every request has completed by now; nothing else touches the environment.
    publish::export_environment(&outcome);

    Ok(())
}
