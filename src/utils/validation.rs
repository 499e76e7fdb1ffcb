use crate::utils::error::{NavError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: &str, reason: impl Into<String>) -> NavError {
    NavError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Endpoints must be absolute http(s) URLs; everything else is a config typo.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Err(invalid(field_name, url_str, "endpoint URL is empty"));
    }
    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("not a valid URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            url_str,
            format!("unsupported scheme: {}", url.scheme()),
        ));
    }
    Ok(())
}

pub fn validate_timeout(field_name: &str, secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(invalid(field_name, "0", "timeout must be at least 1 second"));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "value is empty"));
    }
    Ok(())
}

/// WGS84 range check for a latitude/longitude pair coming from configuration.
/// NaN fails both `abs` comparisons, so non-finite values are rejected first.
pub fn validate_coordinates(field_name: &str, latitude: f64, longitude: f64) -> Result<()> {
    let pair = format!("({}, {})", latitude, longitude);
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(invalid(field_name, &pair, "coordinates must be finite"));
    }
    if latitude.abs() > 90.0 {
        return Err(invalid(field_name, &pair, "latitude is outside [-90, 90]"));
    }
    if longitude.abs() > 180.0 {
        return Err(invalid(field_name, &pair, "longitude is outside [-180, 180]"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("facility_endpoint", "https://example.com").is_ok());
        assert!(validate_url("facility_endpoint", "http://example.com").is_ok());
        assert!(validate_url("facility_endpoint", "").is_err());
        assert!(validate_url("facility_endpoint", "invalid-url").is_err());
        assert!(validate_url("facility_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_timeout() {
        assert!(validate_timeout("timeout_secs", 15).is_ok());
        assert!(validate_timeout("timeout_secs", 0).is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates("location", 5.0382, 7.834).is_ok());
        assert!(validate_coordinates("location", -90.0, 180.0).is_ok());
        assert!(validate_coordinates("location", 91.0, 0.0).is_err());
        assert!(validate_coordinates("location", 0.0, -180.5).is_err());
        assert!(validate_coordinates("location", f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("session.name", "clinic run").is_ok());
        assert!(validate_non_empty_string("session.name", "   ").is_err());
    }

    #[test]
    fn rejects_error_carries_field_name() {
        let err = validate_url("routing_endpoint", "ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("routing_endpoint"));
    }
}
