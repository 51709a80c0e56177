//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use devcamper_config::{Config, CorsConfig, ServerConfig};
use devcamper_pipeline::Rule;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Serve the health check on another path
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Append a classification rule after the built-in ones
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.config.errors.rules.push(rule);
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
