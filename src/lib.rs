pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FixedLocationProvider, HttpFacilityDirectory, OrsRoutingProvider};
pub use crate::core::session::{SessionCoordinator, SessionHandle};
pub use domain::model::{
    Coordinates, ErrorKind, Facility, PermissionState, ProximityResult, RouteResult, SessionState,
};
pub use domain::ports::{ConfigProvider, FacilityDirectory, LocationProvider, RoutingProvider};
pub use utils::error::{NavError, Result};
