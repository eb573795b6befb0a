use std::net::SocketAddr;

use serde::Deserialize;

use crate::{health::HealthConfig, probes::ProbesConfig};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub probes: ProbesConfig,
}
