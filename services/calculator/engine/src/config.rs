use figment::{providers::Env, Figment};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Text shown in place of the buffer when evaluation fails
    pub error_marker: String,

    /// Maximum number of buffer snapshots kept for undo
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            error_marker: "Error".to_string(),
            history_limit: 100,
        }
    }
}

/// Configuration sourced from `APP_` prefixed environment variables, the
/// first underscore after the prefix separating the section from the key
/// (`APP_ENGINE_HISTORY_LIMIT` is `engine.history_limit`).
pub fn figment() -> Figment {
    Figment::new()
        .merge(Env::prefixed("APP_").map(|s| s.as_str().replacen('_', ".", 1).into()))
}
