use crate::domain::model::{Coordinates, PermissionState};
use crate::domain::ports::LocationProvider;
use crate::utils::error::{NavError, Result};
use async_trait::async_trait;

/// Stand-in for the mobile platform's location services when running
/// headless: the configured position plays the role of the GPS fix, and a
/// missing position plays the role of a user declining the prompt.
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    position: Option<Coordinates>,
}

impl FixedLocationProvider {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }

    pub fn granted(position: Coordinates) -> Self {
        Self {
            position: Some(position),
        }
    }

    pub fn denied() -> Self {
        Self { position: None }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn request_access(&self) -> PermissionState {
        match self.position {
            Some(_) => PermissionState::Granted,
            None => PermissionState::Denied,
        }
    }

    async fn current_position(&self) -> Result<Coordinates> {
        self.position.ok_or_else(|| NavError::LocationUnavailable {
            reason: "no position configured".to_string(),
        })
    }
}
