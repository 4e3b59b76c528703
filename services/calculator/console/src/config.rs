use serde::Deserialize;

use calculator_engine::Config as EngineConfig;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Output {
    Plain,
    Json,
}

impl Default for Output {
    fn default() -> Self {
        Output::Plain
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub output: Output,
    pub engine: EngineConfig,
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let config: Config = calculator_engine::figment().extract()?;
            assert_eq!(config.output, Output::Plain);
            assert_eq!(config.engine.error_marker, "Error");
            assert_eq!(config.engine.history_limit, 100);
            Ok(())
        });
    }

    #[test]
    fn test_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("APP_OUTPUT", "json");
            jail.set_env("APP_ENGINE_ERROR_MARKER", "Err");
            jail.set_env("APP_ENGINE_HISTORY_LIMIT", "12");

            let config: Config = calculator_engine::figment().extract()?;
            assert_eq!(config.output, Output::Json);
            assert_eq!(config.engine.error_marker, "Err");
            assert_eq!(config.engine.history_limit, 12);
            Ok(())
        });
    }
}
