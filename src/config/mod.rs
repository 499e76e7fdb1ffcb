pub mod toml_config;

use crate::domain::model::Coordinates;

/// Default public instance of the hospital directory API.
pub const DEFAULT_FACILITY_BASE_URL: &str = "https://hospitalgisapi.onrender.com/api";
/// Default directions provider.
pub const DEFAULT_ROUTING_BASE_URL: &str = "https://api.openrouteservice.org";
/// Map center used when no device position is available.
pub const DEFAULT_REGION: Coordinates = Coordinates {
    latitude: 5.0382,
    longitude: 7.834,
};
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::{
        DEFAULT_FACILITY_BASE_URL, DEFAULT_REGION, DEFAULT_ROUTING_BASE_URL, DEFAULT_TIMEOUT_SECS,
    };
    use crate::core::ConfigProvider;
    use crate::domain::model::Coordinates;
    use crate::utils::error::{NavError, Result};
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "hospinav")]
    #[command(about = "Nearest-facility resolution and routing against the hospital directory")]
    pub struct CliConfig {
        /// Base URL of the facility directory API
        #[arg(long, default_value = DEFAULT_FACILITY_BASE_URL)]
        pub facility_endpoint: String,

        /// Base URL of the ORS-compatible directions provider
        #[arg(long, default_value = DEFAULT_ROUTING_BASE_URL)]
        pub routing_endpoint: String,

        /// Directions API credential; falls back to the ORS_API_KEY environment variable
        #[arg(long, default_value = "")]
        pub routing_api_key: String,

        /// Simulated device latitude; omit both coordinates to act as a user
        /// who declines the permission prompt
        #[arg(long, allow_negative_numbers = true)]
        pub latitude: Option<f64>,

        /// Simulated device longitude
        #[arg(long, allow_negative_numbers = true)]
        pub longitude: Option<f64>,

        /// Live search filter applied to the facility list
        #[arg(long, default_value = "")]
        pub query: String,

        /// Inspect a single facility by id instead of running a session
        #[arg(long)]
        pub facility_id: Option<String>,

        /// Load the session settings from a TOML file instead of the flags above
        #[arg(long)]
        pub config_file: Option<String>,

        /// HTTP timeout in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        pub timeout_secs: u64,

        /// Print the final session state as pretty JSON
        #[arg(long)]
        pub snapshot_json: bool,

        /// Emit logs as JSON for log collectors
        #[arg(long)]
        pub log_json: bool,

        /// Enable verbose output
        #[arg(long)]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn facility_base_url(&self) -> &str {
            &self.facility_endpoint
        }

        fn routing_base_url(&self) -> &str {
            &self.routing_endpoint
        }

        fn routing_api_key(&self) -> &str {
            &self.routing_api_key
        }

        fn device_position(&self) -> Option<Coordinates> {
            match (self.latitude, self.longitude) {
                (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
                _ => None,
            }
        }

        fn default_region(&self) -> Coordinates {
            DEFAULT_REGION
        }

        fn request_timeout_secs(&self) -> u64 {
            self.timeout_secs
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_url("facility_endpoint", &self.facility_endpoint)?;
            validation::validate_url("routing_endpoint", &self.routing_endpoint)?;
            validation::validate_timeout("timeout_secs", self.timeout_secs)?;
            match (self.latitude, self.longitude) {
                (Some(latitude), Some(longitude)) => {
                    validation::validate_coordinates("device", latitude, longitude)
                }
                (None, None) => Ok(()),
                _ => Err(NavError::ConfigError {
                    message: "latitude and longitude must be provided together".to_string(),
                }),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> CliConfig {
            CliConfig::try_parse_from(std::iter::once("hospinav").chain(args.iter().copied()))
                .expect("parse")
        }

        #[test]
        fn test_defaults_point_at_the_public_instances() {
            let config = parse(&[]);
            assert_eq!(config.facility_endpoint, DEFAULT_FACILITY_BASE_URL);
            assert_eq!(config.routing_endpoint, DEFAULT_ROUTING_BASE_URL);
            assert!(config.device_position().is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_device_position_requires_both_coordinates() {
            let config = parse(&["--latitude", "5.041"]);
            assert!(config.device_position().is_none());
            assert!(config.validate().is_err());

            let config = parse(&["--latitude", "5.041", "--longitude", "7.831"]);
            assert_eq!(
                config.device_position(),
                Some(Coordinates::new(5.041, 7.831))
            );
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_negative_coordinates_parse() {
            let config = parse(&["--latitude", "-33.9", "--longitude", "-70.6"]);
            assert_eq!(
                config.device_position(),
                Some(Coordinates::new(-33.9, -70.6))
            );
        }

        #[test]
        fn test_out_of_range_device_position_fails_validation() {
            let config = parse(&["--latitude", "95.0", "--longitude", "7.831"]);
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_invalid_endpoint_fails_validation() {
            let config = parse(&["--facility-endpoint", "not-a-url"]);
            assert!(config.validate().is_err());
        }
    }
}
