use serde::Deserialize;

use crate::server::API_PREFIX;

/// Liveness probe served outside the bootcamp API
///
/// ```toml
/// [server.health]
/// enabled = true
/// path = "/health"
/// ```
///
/// The path must be absolute and may not live under `/api/v1`, where the
/// resource routes are mounted.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_path")]
    pub path: String,
}

impl HealthConfig {
    /// Path to mount the probe on, or `None` when disabled
    pub fn route(&self) -> Option<&str> {
        self.enabled.then_some(self.path.as_str())
    }

    /// Whether the path shadows or overlaps the resource routes
    pub fn overlaps_api(&self) -> bool {
        let path = self.path.trim_end_matches('/');
        path == API_PREFIX || path.starts_with(&format!("{API_PREFIX}/"))
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_path(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "/health".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(path: &str) -> HealthConfig {
        HealthConfig {
            enabled: true,
            path: path.to_owned(),
        }
    }

    #[test]
    fn disabled_probe_has_no_route() {
        let health = HealthConfig {
            enabled: false,
            ..HealthConfig::default()
        };
        assert_eq!(health.route(), None);
        assert_eq!(HealthConfig::default().route(), Some("/health"));
    }

    #[test]
    fn api_paths_overlap() {
        assert!(at("/api/v1").overlaps_api());
        assert!(at("/api/v1/").overlaps_api());
        assert!(at("/api/v1/bootcamps").overlaps_api());
        assert!(at("/api/v1/bootcamps/health").overlaps_api());

        assert!(!at("/health").overlaps_api());
        assert!(!at("/api/v10").overlaps_api());
        assert!(!at("/status/api/v1").overlaps_api());
    }
}
