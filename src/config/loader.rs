// Copyright 2026 The OmniCare Project
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

use super::error::ConfigError;
use super::types::{Config, EngineConfig};
use super::ConfigSource;

/// Load and validate a relay config from the given source.
///
/// Steps:
/// 1. Read raw YAML from source
/// 2. Parse YAML into raw deserialization types
/// 3. Validate the version marker and required fields
/// 4. Resolve `${VAR}` interpolation in the engine base URL
/// 5. Build the typed Config struct
pub fn load_config(source: &dyn ConfigSource) -> Result<Config, ConfigError> {
    let text = source.load()?;
    let raw: RawConfig = serde_yaml::from_str(&text)?;

    if raw.omnicare != "v1" {
        return Err(ConfigError::Validation(format!(
            "unsupported config version \"{}\" (expected \"v1\")",
            raw.omnicare
        )));
    }

    let base_url = resolve_variables(&raw.engine.base_url)?;
    let base_url = base_url.trim().trim_end_matches('/').to_string();

    if base_url.is_empty() {
        return Err(ConfigError::Validation(
            "engine.base_url must not be empty".to_string(),
        ));
    }
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "engine.base_url must use an http or https scheme, got \"{base_url}\""
        )));
    }

    Ok(Config {
        engine: EngineConfig {
            base_url,
            timeout_ms: raw.engine.timeout_ms,
        },
        environment: raw
            .environment
            .unwrap_or_else(|| "development".to_string()),
    })
}

// ---------------------------------------------------------------------------
// Raw deserialization types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawConfig {
    /// Version marker. Always "v1".
    omnicare: String,
    engine: RawEngine,
    environment: Option<String>,
}

#[derive(Deserialize)]
struct RawEngine {
    base_url: String,
    timeout_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// Variable interpolation
// ---------------------------------------------------------------------------

/// Resolves `${VAR_NAME}` references in a string from environment variables.
/// Returns `ConfigError::UndefinedVariable` if a referenced variable is not
/// set. Malformed references (no closing brace, empty name) are kept
/// literally.
fn resolve_variables(input: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find('}') {
            Some(end) if end > 0 => {
                let name = &after_open[..end];
                let value =
                    std::env::var(name).map_err(|_| ConfigError::UndefinedVariable {
                        name: name.to_string(),
                    })?;
                result.push_str(&value);
                rest = &after_open[end + 1..];
            }
            _ => {
                result.push_str("${");
                rest = after_open;
            }
        }
    }

    result.push_str(rest);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::super::StringSource;
    use super::*;

    fn source(content: &str) -> StringSource {
        StringSource {
            content: content.to_string(),
        }
    }

    #[test]
    fn minimal_config_loads() {
        let config = load_config(&source(
            "omnicare: v1\nengine:\n  base_url: \"http://localhost:8000\"\n",
        ))
        .unwrap();

        assert_eq!(config.engine.base_url, "http://localhost:8000");
        assert_eq!(config.engine.timeout_ms, None);
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = load_config(&source(
            "omnicare: v1\nengine:\n  base_url: \"http://localhost:8000/\"\n",
        ))
        .unwrap();
        assert_eq!(config.engine.base_url, "http://localhost:8000");
    }

    #[test]
    fn timeout_and_environment_are_read() {
        let config = load_config(&source(
            "omnicare: v1\nengine:\n  base_url: \"http://engine:8000\"\n  timeout_ms: 2000\nenvironment: \"production\"\n",
        ))
        .unwrap();
        assert_eq!(config.engine.timeout_ms, Some(2000));
        assert_eq!(config.environment, "production");
    }

    #[test]
    fn wrong_version_marker_is_rejected() {
        let err = load_config(&source(
            "omnicare: v2\nengine:\n  base_url: \"http://localhost:8000\"\n",
        ))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err = load_config(&source(
            "omnicare: v1\nengine:\n  base_url: \"ftp://engine\"\n",
        ))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn base_url_interpolates_from_environment() {
        std::env::set_var("OMNICARE_TEST_ENGINE_HOST", "engine.internal");
        let config = load_config(&source(
            "omnicare: v1\nengine:\n  base_url: \"http://${OMNICARE_TEST_ENGINE_HOST}:8000\"\n",
        ))
        .unwrap();
        assert_eq!(config.engine.base_url, "http://engine.internal:8000");
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let err = load_config(&source(
            "omnicare: v1\nengine:\n  base_url: \"http://${OMNICARE_TEST_UNSET_VAR}\"\n",
        ))
        .unwrap_err();
        assert!(matches!(err, ConfigError::UndefinedVariable { .. }));
    }
}
