use crate::core::Coordinates;

/// Mean Earth radius in meters.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two WGS84 points, in meters, using the
/// haversine formulation. Distances in raw degree space misorder nearby
/// candidates because a degree of longitude shrinks with latitude.
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_for_identical_points() {
        let point = Coordinates::new(5.0382, 7.834);
        assert_eq!(distance_meters(point, point), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinates::new(5.0382, 7.834);
        let b = Coordinates::new(5.05, 7.84);
        let forward = distance_meters(a, b);
        let backward = distance_meters(b, a);
        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_longitude_at_the_equator() {
        let d = distance_meters(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        // 2 * pi * R / 360 with R = 6371 km
        assert!((d - 111_195.0).abs() < 100.0);
    }

    #[test]
    fn test_berlin_to_paris() {
        let berlin = Coordinates::new(52.52, 13.405);
        let paris = Coordinates::new(48.8566, 2.3522);
        let km = distance_meters(berlin, paris) / 1000.0;
        assert!((km - 878.0).abs() < 10.0, "got {} km", km);
    }

    #[test]
    fn test_city_block_scale() {
        // A ~0.001 degree diagonal near the default region is about 157 m.
        let d = distance_meters(
            Coordinates::new(5.04, 7.83),
            Coordinates::new(5.041, 7.831),
        );
        assert!((d - 157.0).abs() < 2.0, "got {} m", d);
    }
}
