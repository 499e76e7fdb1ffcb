// Adapters layer: concrete implementations of the domain ports against
// external systems (directory API, directions provider, platform location).

pub mod directory;
pub mod location;
pub mod routing;

pub use directory::HttpFacilityDirectory;
pub use location::FixedLocationProvider;
pub use routing::OrsRoutingProvider;
