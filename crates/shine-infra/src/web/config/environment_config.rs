use config::{ConfigError, Map, Source, Value, ValueKind};
use std::env;

const DEFAULT_PREFIX: &str = "shine--";
const SEPARATOR: &str = "--";

/// Configuration source reading the environment variables.
///
/// Variables are selected by a (case insensitive) prefix and nested keys are split by `--`.
/// Each key segment is converted from SNAKE_CASE into camelCase, thus
/// `SHINE--SAML--SELECT--REDIRECT_ON_SINGLE_PROVIDER` sets `saml.select.redirectOnSingleProvider`.
/// Values are always strings, conversion is left for the deserialization.
#[derive(Debug, Clone)]
pub struct Environment {
    prefix: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
        }
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix<S: AsRef<str>>(prefix: S) -> Self {
        Self {
            prefix: format!("{}{SEPARATOR}", prefix.as_ref().to_lowercase()),
        }
    }

    fn convert_key_case(segment: &str) -> String {
        segment
            .split('_')
            .enumerate()
            .map(|(i, s)| {
                let s = s.to_lowercase();
                if i == 0 {
                    s
                } else {
                    let mut chars = s.chars();
                    chars
                        .next()
                        .map(|c| c.to_uppercase().collect::<String>() + chars.as_str())
                        .unwrap_or_default()
                }
            })
            .collect()
    }

    /// Map an environment variable name to the config key, None if the variable is not selected by the prefix.
    pub fn config_key(&self, env_key: &str) -> Option<String> {
        let key = env_key.to_lowercase();
        let key = key.strip_prefix(&self.prefix)?;
        if key.is_empty() {
            return None;
        }

        Some(
            key.split(SEPARATOR)
                .map(Self::convert_key_case)
                .collect::<Vec<_>>()
                .join("."),
        )
    }
}

impl Source for Environment {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        let uri: String = "environment".into();

        let mut m = Map::new();
        for (env_key, value) in env::vars() {
            if let Some(key) = self.config_key(&env_key) {
                log::debug!("Reading env {env_key} as {key}...");
                m.insert(key, Value::new(Some(&uri), ValueKind::String(value)));
            }
        }

        Ok(m)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use shine_test::test;

    #[test]
    fn env_key_conversion() {
        let env = Environment::new();
        assert_eq!(
            env.config_key("SHINE--SAML--SELECT--REDIRECT_ON_SINGLE_PROVIDER").as_deref(),
            Some("saml.select.redirectOnSingleProvider")
        );
        assert_eq!(env.config_key("SHINE--SERVICE--PORT").as_deref(), Some("service.port"));
        assert_eq!(env.config_key("PATH"), None);
        assert_eq!(env.config_key("SHINE--"), None);

        let env = Environment::with_prefix("SP");
        assert_eq!(env.config_key("sp--service--port").as_deref(), Some("service.port"));
        assert_eq!(env.config_key("SHINE--SERVICE--PORT"), None);
    }
}
