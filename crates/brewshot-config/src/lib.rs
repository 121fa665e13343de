#![allow(clippy::must_use_candidate)]

pub mod client_identification;
pub mod cors;
mod duration;
mod env;
pub mod health;
mod loader;
pub mod provider;
pub mod server;
pub mod studio;
pub mod telemetry;

use serde::Deserialize;

pub use client_identification::*;
pub use cors::*;
pub use health::*;
pub use provider::*;
pub use server::*;
pub use studio::*;
pub use telemetry::TelemetryConfig;

/// Top-level Brewshot configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Generative-media provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Studio (generation, analysis, editing, video) configuration
    #[serde(default)]
    pub studio: StudioConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
