use crate::config::{DEFAULT_REGION, DEFAULT_ROUTING_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::core::ConfigProvider;
use crate::domain::model::Coordinates;
use crate::utils::error::{NavError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session settings loaded from a TOML file. `${VAR}` placeholders anywhere
/// in the file are substituted from the environment before parsing, which is
/// how the directions API key stays out of checked-in files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub session: SessionInfo,
    pub directory: DirectoryConfig,
    pub routing: RoutingConfig,
    pub location: Option<LocationConfig>,
    pub map: Option<MapConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

/// Simulated device position. Leaving the whole section out stands for a
/// user who declines the permission prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub default_latitude: f64,
    pub default_longitude: f64,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let expanded = Self::substitute_env_vars(content);
        toml::from_str(&expanded).map_err(|e| NavError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value. Unset variables
    /// keep the placeholder so validation can point at them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("session.name", &self.session.name)?;
        validation::validate_url("directory.endpoint", &self.directory.endpoint)?;

        if let Some(endpoint) = &self.routing.endpoint {
            validation::validate_url("routing.endpoint", endpoint)?;
        }

        if let Some(timeout) = self.directory.timeout_seconds {
            validation::validate_timeout("directory.timeout_seconds", timeout)?;
        }

        if let Some(location) = &self.location {
            validation::validate_coordinates("location", location.latitude, location.longitude)?;
        }

        if let Some(map) = &self.map {
            validation::validate_coordinates("map", map.default_latitude, map.default_longitude)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn facility_base_url(&self) -> &str {
        &self.directory.endpoint
    }

    fn routing_base_url(&self) -> &str {
        self.routing
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ROUTING_BASE_URL)
    }

    fn routing_api_key(&self) -> &str {
        self.routing.api_key.as_deref().unwrap_or("")
    }

    fn device_position(&self) -> Option<Coordinates> {
        self.location
            .as_ref()
            .map(|l| Coordinates::new(l.latitude, l.longitude))
    }

    fn default_region(&self) -> Coordinates {
        self.map
            .as_ref()
            .map(|m| Coordinates::new(m.default_latitude, m.default_longitude))
            .unwrap_or(DEFAULT_REGION)
    }

    fn request_timeout_secs(&self) -> u64 {
        self.directory
            .timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[session]
name = "uyo-clinic-run"
description = "Nearest facility from the town center"

[directory]
endpoint = "https://hospitalgisapi.onrender.com/api"
timeout_seconds = 10

[routing]
endpoint = "https://api.openrouteservice.org"
api_key = "abc123"

[location]
latitude = 5.041
longitude = 7.831

[map]
default_latitude = 5.0382
default_longitude = 7.834
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.session.name, "uyo-clinic-run");
        assert_eq!(
            config.facility_base_url(),
            "https://hospitalgisapi.onrender.com/api"
        );
        assert_eq!(config.routing_api_key(), "abc123");
        assert_eq!(config.request_timeout_secs(), 10);
        assert_eq!(
            config.device_position(),
            Some(Coordinates::new(5.041, 7.831))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let toml_content = r#"
[session]
name = "denied-permission-run"

[directory]
endpoint = "https://hospitalgisapi.onrender.com/api"

[routing]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.device_position().is_none());
        assert_eq!(config.routing_base_url(), DEFAULT_ROUTING_BASE_URL);
        assert_eq!(config.routing_api_key(), "");
        assert_eq!(config.request_timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.default_region(), DEFAULT_REGION);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HOSPINAV_TEST_KEY", "key-from-env");

        let toml_content = r#"
[session]
name = "env-test"

[directory]
endpoint = "https://hospitalgisapi.onrender.com/api"

[routing]
api_key = "${HOSPINAV_TEST_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.routing_api_key(), "key-from-env");

        std::env::remove_var("HOSPINAV_TEST_KEY");
    }

    #[test]
    fn test_unset_env_var_keeps_placeholder() {
        let toml_content = r#"
[session]
name = "env-test"

[directory]
endpoint = "https://hospitalgisapi.onrender.com/api"

[routing]
api_key = "${HOSPINAV_UNSET_VARIABLE_42}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.routing_api_key(), "${HOSPINAV_UNSET_VARIABLE_42}");
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let toml_content = r#"
[session]
name = "bad-values"

[directory]
endpoint = "not-a-url"

[routing]
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[session]
name = "bad-location"

[directory]
endpoint = "https://hospitalgisapi.onrender.com/api"

[routing]

[location]
latitude = 95.0
longitude = 7.831
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[session]
name = "file-test"

[directory]
endpoint = "https://hospitalgisapi.onrender.com/api"

[routing]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.session.name, "file-test");
    }
}
