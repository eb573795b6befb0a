use serde::Deserialize;

/// Diagnostic routes that raise each error class through the boundary
///
/// Lets operators confirm end to end that alerts are delivered.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbesConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Prefix the probe routes are mounted under
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for ProbesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_path(),
        }
    }
}

fn default_path() -> String {
    "/_faultline/probe".to_string()
}
