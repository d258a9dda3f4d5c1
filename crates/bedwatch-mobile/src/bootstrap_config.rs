//! Backend configuration embedded at build time.
#![cfg_attr(not(target_os = "android"), allow(dead_code))]

use bedwatch_core::config::BackendConfig;

const EMBEDDED_CONFIG: &str = include_str!(concat!(env!("OUT_DIR"), "/mobile-bootstrap.json"));

/// Parse the JSON written by `build.rs`.
pub fn embedded_config() -> Result<BackendConfig, serde_json::Error> {
    serde_json::from_str(EMBEDDED_CONFIG)
}

/// Embedded values, with gaps filled from the process environment.
pub fn load_backend_config() -> BackendConfig {
    let embedded = embedded_config().unwrap_or_else(|error| {
        tracing::warn!("Ignoring malformed embedded backend config: {}", error);
        BackendConfig::default()
    });
    embedded.or(BackendConfig::from_env())
}
