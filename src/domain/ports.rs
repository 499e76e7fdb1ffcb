use crate::domain::model::{Coordinates, Facility, PermissionState, RouteResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Platform location services: permission prompt plus position fix.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Asks the platform for foreground location access. Implementations may
    /// prompt the user, so this is called at most once per session.
    async fn request_access(&self) -> PermissionState;

    /// Current device position. Only meaningful after access was granted.
    async fn current_position(&self) -> Result<Coordinates>;
}

/// Read access to the remote facility directory.
#[async_trait]
pub trait FacilityDirectory: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Facility>>;
    async fn fetch_by_id(&self, id: &str) -> Result<Facility>;
}

/// Turn-by-turn directions between two points.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn route(&self, origin: Coordinates, destination: Coordinates) -> Result<RouteResult>;
}

pub trait ConfigProvider: Send + Sync {
    fn facility_base_url(&self) -> &str;
    fn routing_base_url(&self) -> &str;
    fn routing_api_key(&self) -> &str;
    /// Simulated device position; `None` stands for a user who declines the
    /// permission prompt.
    fn device_position(&self) -> Option<Coordinates>;
    /// Map center to fall back to when no position is available.
    fn default_region(&self) -> Coordinates;
    fn request_timeout_secs(&self) -> u64;
}
