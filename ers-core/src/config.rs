use crate::error::{ErsError, Result};
use crate::platform::{EnvSource, PORT_VAR};
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_addr")]
    pub addr: SocketAddr,
}

/// Attendee store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON file the attendee store is snapshotted to. `None` keeps
    /// attendees in memory only.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

// ── Defaults ──────────────────────────────────────────────────

fn default_http_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

// ── Impls ─────────────────────────────────────────────────────

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: default_http_addr(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from YAML file + `ERS_` env overrides.
    ///
    /// Nested keys are separated by a double underscore, e.g.
    /// `ERS_STORE__STATE_FILE=/var/ers/state.json`.
    pub fn load(path: &Path) -> Result<Self> {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("ERS_").split("__"))
            .extract()
            .map_err(|e| ErsError::Config(e.to_string()))
    }

    /// Listen address, with the port replaced by the platform-assigned
    /// `PORT` when one is present.
    pub fn effective_addr(&self, env: &dyn EnvSource) -> SocketAddr {
        let mut addr = self.http.addr;
        if let Some(raw) = env.get(PORT_VAR) {
            match raw.trim().parse::<u16>() {
                Ok(port) => addr.set_port(port),
                Err(e) => warn!(value = %raw, error = %e, "Ignoring non-numeric PORT"),
            }
        }
        addr
    }
}
