use std::net::SocketAddr;

use serde::Deserialize;

use crate::{client_identification::ClientIdentificationConfig, cors::CorsConfig, health::HealthConfig};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub client_identification: Option<ClientIdentificationConfig>,
}
