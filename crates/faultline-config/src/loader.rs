use std::path::Path;

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

    /// Parse and validate configuration text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a section is invalid or routes collide
    pub fn validate(&self) -> anyhow::Result<()> {
        self.responder.validate()?;
        self.notifier.validate()?;
        self.validate_routes()?;
        Ok(())
    }

    /// Ensure host routes are absolute and do not overlap
    fn validate_routes(&self) -> anyhow::Result<()> {
        let health = &self.server.health;
        let probes = &self.server.probes;

        if health.enabled && !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/', got '{}'", health.path);
        }

        if probes.enabled {
            if !probes.path.starts_with('/') || probes.path.len() < 2 {
                anyhow::bail!("server.probes.path must be a non-root path starting with '/', got '{}'", probes.path);
            }

            if health.enabled && health.path.starts_with(&probes.path) {
                anyhow::bail!("server.health.path must not live under server.probes.path");
            }
        }

        Ok(())
    }
}
