//! # Chat Engine Setup
//!
//! Provisions a conversational-search app on Google Cloud: a public-website
//! datastore (Discovery Engine), a Dialogflow CX agent, a chat engine that
//! links the two, and generative fallback on the agent's default flow.
//!
//! ## Workflow
//!
//! ```text
//! ┌──────────┐  ┌───────────┐  ┌───────┐  ┌────────┐  ┌────────────┐  ┌──────┐  ┌─────────┐
//! │ CLI args │─▶│ datastore │─▶│ agent │─▶│ engine │─▶│ generative │─▶│ flow │─▶│ publish │
//! └──────────┘  └───────────┘  └───────┘  └────────┘  └────────────┘  └──────┘  └─────────┘
//! ```
//!
//! Datastore, agent and engine are reused when they already exist, so a
//! re-run with the same app and company names resolves to the same
//! resources. Generative settings and the default flow are overwritten on
//! every run.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML runtime configuration and the per-run settings record |
//! | [`names`] | Resource-path templating |
//! | [`models`] | REST wire types |
//! | [`traits`] | Service boundary traits and [`traits::Lookup`] |
//! | [`auth`] | ADC / static-token request authorization |
//! | [`rest`] | reqwest implementations of the service boundary |
//! | [`error`] | Typed remote-call errors |
//! | [`datastore`], [`agent`], [`engine`], [`generative`], [`flow`] | Provisioning steps |
//! | [`provision`] | The ordered workflow |
//! | [`publish`] | Environment, env file and summary output |

pub mod agent;
pub mod auth;
pub mod config;
pub mod datastore;
pub mod engine;
pub mod error;
pub mod flow;
pub mod generative;
pub mod models;
pub mod names;
pub mod provision;
pub mod publish;
pub mod rest;
pub mod traits;
