//! Cloud Foundry deployment metadata.
//!
//! The platform describes the running app through two JSON environment
//! variables: `VCAP_APPLICATION` (identity and placement) and `VCAP_SERVICES`
//! (bound services, grouped by category). Both are decoded fresh on every
//! call; nothing here caches or mutates shared state.
//!
//! An unset variable is not an error: the caller gets an empty descriptor and
//! the documented placeholder strings. A variable that is set but does not
//! hold the expected JSON is reported as [`ErsError::EnvDecode`].

pub use crate::env::{EnvSource, ProcessEnv, StaticEnv};

use crate::error::{ErsError, Result};
use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::{debug, warn};

pub const VCAP_APPLICATION_VAR: &str = "VCAP_APPLICATION";
pub const VCAP_SERVICES_VAR: &str = "VCAP_SERVICES";
/// Set by the platform to the port the app must listen on. Its presence
/// marks "running on the platform".
pub const PORT_VAR: &str = "PORT";
/// Externally reachable `host:port` of this instance.
pub const CF_INSTANCE_ADDR_VAR: &str = "CF_INSTANCE_ADDR";

pub const NO_APPLICATION_NAME: &str = "no name environment variable";
pub const NO_INSTANCE_INDEX: &str = "no index environment variable";
pub const RUNNING_LOCALLY: &str = "running locally";
pub const LOCALHOST: &str = "localhost";

/// `rustc` release this binary was compiled with, as reported by
/// `rustc --version` (pre-release suffix included).
pub const RUSTC_VERSION: &str = env!("ERS_RUSTC_VERSION");

// ── Descriptors ───────────────────────────────────────────────

/// Decoded `VCAP_APPLICATION`. Unknown keys are ignored.
///
/// Both fields are read leniently: strings are kept, numbers and booleans
/// become their JSON text, anything else counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentDescriptor {
    #[serde(default, deserialize_with = "scalar_text")]
    pub application_name: Option<String>,

    /// The platform sends a number; strings are accepted too.
    #[serde(default, deserialize_with = "scalar_text")]
    pub instance_index: Option<String>,
}

impl DeploymentDescriptor {
    pub fn application_name_or_default(&self) -> &str {
        self.application_name.as_deref().unwrap_or(NO_APPLICATION_NAME)
    }

    pub fn instance_index_or(&self, fallback: &'static str) -> &str {
        self.instance_index.as_deref().unwrap_or(fallback)
    }
}

/// One entry of a `VCAP_SERVICES` category. Credentials and the rest of
/// the record are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceBinding {
    /// Instance name chosen at bind time. Missing, null, or not a scalar →
    /// empty; numbers and booleans keep their JSON text.
    #[serde(default, deserialize_with = "scalar_text_or_empty")]
    pub name: String,
}

/// Decoded `VCAP_SERVICES`: category label → bindings, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceBindings(pub IndexMap<String, Vec<ServiceBinding>>);

impl ServiceBindings {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<ServiceBinding>)> {
        self.0.iter()
    }
}

/// A bound service reduced to what the UI displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundService {
    pub category: String,
    pub name: String,
}

/// Deployment context shown on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSnapshot {
    pub container_addr: String,
    pub instance_index: String,
    pub instance_addr: String,
    pub application_name: String,
    pub application_services: Vec<BoundService>,
    pub runtime_version: String,
}

// ── Resolution ────────────────────────────────────────────────

pub fn resolve_deployment(env: &dyn EnvSource) -> Result<DeploymentDescriptor> {
    let Some(raw) = lookup(env, VCAP_APPLICATION_VAR) else {
        return Ok(DeploymentDescriptor::default());
    };
    // Decode through a map first: a derived struct would also accept a JSON
    // array positionally.
    let object: serde_json::Map<String, serde_json::Value> =
        decode(VCAP_APPLICATION_VAR, &raw)?;
    serde_json::from_value(serde_json::Value::Object(object)).map_err(|source| {
        ErsError::EnvDecode {
            var: VCAP_APPLICATION_VAR,
            source,
        }
    })
}

pub fn resolve_service_bindings(env: &dyn EnvSource) -> Result<ServiceBindings> {
    match lookup(env, VCAP_SERVICES_VAR) {
        Some(raw) => decode(VCAP_SERVICES_VAR, &raw),
        None => Ok(ServiceBindings::default()),
    }
}

/// One entry per binding, category order first, then binding order.
pub fn flatten_service_bindings(bindings: &ServiceBindings) -> Vec<BoundService> {
    bindings
        .iter()
        .flat_map(|(category, list)| {
            list.iter().map(move |binding| BoundService {
                category: category.clone(),
                name: binding.name.clone(),
            })
        })
        .collect()
}

/// `(application_name, instance_index)` for the blue-green check.
pub fn list_bluegreen_identity(env: &dyn EnvSource) -> Result<(String, String)> {
    let deployment = resolve_deployment(env)?;
    Ok((
        deployment.application_name_or_default().to_string(),
        deployment.instance_index_or(RUNNING_LOCALLY).to_string(),
    ))
}

/// Compose the full deployment snapshot for one request.
///
/// `local_addr` is the server-side address of the connection that carried
/// the request; it is only reported when the platform `PORT` is set.
pub fn build_runtime_snapshot(
    env: &dyn EnvSource,
    local_addr: Option<SocketAddr>,
    raw_runtime_version: &str,
) -> Result<RuntimeSnapshot> {
    let container_addr = match (env.get(PORT_VAR), local_addr) {
        (Some(_), Some(addr)) => format!("{}:{}", addr.ip(), addr.port()),
        _ => LOCALHOST.to_string(),
    };

    let deployment = resolve_deployment(env)?;
    let services = resolve_service_bindings(env)?;

    let instance_addr = env
        .get(CF_INSTANCE_ADDR_VAR)
        .unwrap_or_else(|| LOCALHOST.to_string());

    Ok(RuntimeSnapshot {
        container_addr,
        instance_index: deployment.instance_index_or(NO_INSTANCE_INDEX).to_string(),
        instance_addr,
        application_name: deployment.application_name_or_default().to_string(),
        application_services: flatten_service_bindings(&services),
        runtime_version: runtime_version(raw_runtime_version),
    })
}

/// Strip pre-release and build qualifiers from a version string.
pub fn truncate_version(version: &str) -> &str {
    match version.find('-') {
        Some(pos) => &version[..pos],
        None => version,
    }
}

fn runtime_version(raw: &str) -> String {
    debug!(version = raw, "Runtime version (unfiltered)");
    let filtered = truncate_version(raw);
    debug!(version = filtered, "Runtime version (filtered)");
    filtered.to_string()
}

// ── Helpers ───────────────────────────────────────────────────

fn lookup(env: &dyn EnvSource, var: &'static str) -> Option<String> {
    let value = env.get(var);
    if value.is_none() {
        warn!(var, "Environment variable not defined, using empty descriptor");
    }
    value
}

fn decode<T: DeserializeOwned>(var: &'static str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|source| ErsError::EnvDecode { var, source })
}

fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn scalar_text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(deserializer)?.unwrap_or_default())
}
