use crate::core::geo;
use crate::core::{Coordinates, Facility, ProximityResult};

/// Resolves the facility closest to `origin` by great-circle distance.
///
/// Returns `None` when the list is empty or no facility carries a usable
/// location. Facilities with missing or out-of-range coordinates are skipped
/// rather than treated as an error. Ties keep the earliest facility in input
/// order, so repeated scans over the same list stay stable.
pub fn nearest(origin: Coordinates, facilities: &[Facility]) -> Option<ProximityResult> {
    if !origin.is_valid() {
        return None;
    }

    let mut best: Option<ProximityResult> = None;
    for facility in facilities {
        let Some(location) = facility.coordinates() else {
            tracing::debug!("Skipping facility {} without location data", facility.id);
            continue;
        };
        if !location.is_valid() {
            tracing::debug!(
                "Skipping facility {} with out-of-range location ({}, {})",
                facility.id,
                location.latitude,
                location.longitude
            );
            continue;
        }

        let distance_meters = geo::distance_meters(origin, location);
        let closer = match &best {
            Some(current) => distance_meters < current.distance_meters,
            None => true,
        };
        if closer {
            best = Some(ProximityResult {
                facility: facility.clone(),
                distance_meters,
            });
        }
    }

    best
}
