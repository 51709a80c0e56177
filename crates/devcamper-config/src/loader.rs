use std::collections::HashSet;
use std::path::Path;

use devcamper_pipeline::rule::default_rules;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Load `path` if it exists, otherwise fall back to built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Expand, deserialize, and validate configuration text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate rule names, a health path that is
    /// relative or inside the API, or a CORS policy browsers would reject
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_rules()?;
        self.validate_server()?;
        Ok(())
    }

    fn validate_rules(&self) -> anyhow::Result<()> {
        let mut seen: HashSet<String> = default_rules().iter().map(|r| r.name().to_owned()).collect();

        for rule in &self.errors.rules {
            if !seen.insert(rule.name().to_owned()) {
                anyhow::bail!("duplicate classification rule name '{}'", rule.name());
            }
        }

        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        let health = &self.server.health;
        if health.enabled && !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/', got '{}'", health.path);
        }
        if health.enabled && health.overlaps_api() {
            anyhow::bail!(
                "server.health.path '{}' collides with the routes under {}",
                health.path,
                crate::server::API_PREFIX
            );
        }

        if let Some(ref cors) = self.server.cors
            && cors.credentials
            && (cors.origins.is_any() || cors.headers.is_any() || cors.methods.is_any())
        {
            anyhow::bail!("server.cors.credentials cannot be combined with wildcard origins, methods, or headers");
        }

        Ok(())
    }
}
