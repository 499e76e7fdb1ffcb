pub mod geo;
pub mod proximity;
pub mod search;
pub mod session;

pub use crate::domain::model::{
    Coordinates, ErrorKind, Facility, PermissionState, ProximityResult, RouteResult, SessionState,
};
pub use crate::domain::ports::{
    ConfigProvider, FacilityDirectory, LocationProvider, RoutingProvider,
};
pub use crate::utils::error::Result;
