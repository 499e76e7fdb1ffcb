use chrono::Weekday;
use serde::ser::Serializer;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Destination order expected by GeoJSON consumers.
    pub fn as_lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// True when both components are inside the valid WGS84 ranges.
    /// NaN fails the comparison, so corrupt values are rejected as well.
    pub fn is_valid(&self) -> bool {
        self.latitude.abs() <= 90.0 && self.longitude.abs() <= 180.0
    }
}

/// GeoJSON-style point as served by the directory API. The server stores
/// `coordinates` as `[latitude, longitude]`, not the GeoJSON `[lon, lat]`
/// order, so all reads go through `Facility::coordinates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub address: Address,
}

/// Opening and closing time for a single weekday, as opaque "HH:MM" strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
}

/// Weekly schedule keyed by weekday. The wire format uses lowercase day
/// names ("monday".."sunday"); keys that do not parse as a weekday are
/// dropped at decode time instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatingHours(HashMap<Weekday, DayHours>);

impl OperatingHours {
    pub fn get(&self, day: Weekday) -> Option<&DayHours> {
        self.0.get(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the known days in Monday..Sunday order for stable display.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DayHours)> {
        WEEK.iter()
            .filter_map(move |day| self.0.get(day).map(|hours| (*day, hours)))
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

impl Serialize for OperatingHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(day, hours)| (weekday_label(day), hours)))
    }
}

impl<'de> Deserialize<'de> for OperatingHours {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = HashMap::<String, DayHours>::deserialize(deserializer)?;
        let mut by_day = HashMap::new();
        for (key, hours) in raw {
            if let Ok(day) = key.parse::<Weekday>() {
                by_day.insert(day, hours);
            }
        }
        Ok(OperatingHours(by_day))
    }
}

/// A medical facility document from the directory API.
///
/// Only `_id` and `name` are required to decode; everything else falls back
/// to an empty default so that one sparse document cannot take down the
/// whole list fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub contact: Contact,
    #[serde(rename = "operatingHours", default)]
    pub operating_hours: OperatingHours,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl Facility {
    /// Position of the facility, if the document carried a usable pair.
    /// Extra vector entries (altitude etc.) are ignored.
    pub fn coordinates(&self) -> Option<Coordinates> {
        let point = self.location.as_ref()?;
        match point.coordinates.as_slice() {
            [latitude, longitude, ..] => Some(Coordinates::new(*latitude, *longitude)),
            _ => None,
        }
    }

    pub fn address(&self) -> &Address {
        &self.contact.address
    }
}

/// A facility paired with its great-circle distance from the device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityResult {
    pub facility: Facility,
    pub distance_meters: f64,
}

/// A resolved route to the nearest facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    /// Estimated travel time, rounded up to whole minutes.
    pub duration_minutes: u32,
    /// Route geometry as latitude/longitude waypoints, origin first.
    pub path: Vec<Coordinates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Unrequested,
    Granted,
    Denied,
}

/// Session-level error classification surfaced to the presentation layer.
/// Underlying failures are logged where they happen; the session state only
/// carries the category a user-facing message would be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    PermissionDenied,
    FetchFailed,
    LocationUnavailable,
    RouteUnavailable,
    InvalidCoordinate,
}

/// Everything the map screen needs to render, published as one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub permission_state: PermissionState,
    /// True until both startup operations (permission/position and facility
    /// fetch) have settled, successfully or not.
    pub loading: bool,
    pub facilities: Vec<Facility>,
    pub current_location: Option<Coordinates>,
    pub nearest: Option<ProximityResult>,
    pub route: Option<RouteResult>,
    pub search_query: String,
    pub selected: Option<Facility>,
    pub last_error: Option<ErrorKind>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            permission_state: PermissionState::Unrequested,
            loading: true,
            facilities: Vec::new(),
            current_location: None,
            nearest: None,
            route: None,
            search_query: String::new(),
            selected: None,
            last_error: None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates::new(5.0382, 7.834).is_valid());
        assert!(Coordinates::new(-90.0, 180.0).is_valid());
        assert!(!Coordinates::new(90.5, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.1).is_valid());
        assert!(!Coordinates::new(f64::NAN, 7.834).is_valid());
        assert!(!Coordinates::new(5.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_facility_decodes_directory_document() {
        let payload = serde_json::json!({
            "_id": "64f1a2b3c4d5e6f708091a0b",
            "name": "St. Athanasius Hospital",
            "description": "General hospital with a 24h emergency unit",
            "services": ["Cardiology", "ER", "Pediatrics"],
            "contact": {
                "phone": "+234 803 555 0101",
                "email": "info@stathanasius.org",
                "address": {
                    "street": "12 Aka Road",
                    "city": "Uyo",
                    "state": "Akwa Ibom",
                    "postalCode": "520101"
                }
            },
            "operatingHours": {
                "monday": { "open": "08:00", "close": "17:00" },
                "saturday": { "open": "09:00", "close": "13:00" },
                "not-a-day": { "open": "00:00", "close": "00:00" }
            },
            "location": { "type": "Point", "coordinates": [5.0382, 7.834] }
        });

        let facility: Facility = serde_json::from_value(payload).expect("decode");
        assert_eq!(facility.id, "64f1a2b3c4d5e6f708091a0b");
        assert_eq!(facility.name, "St. Athanasius Hospital");
        assert_eq!(facility.services.len(), 3);
        assert_eq!(facility.address().city, "Uyo");
        assert_eq!(
            facility.coordinates(),
            Some(Coordinates::new(5.0382, 7.834))
        );

        // Malformed weekday keys are dropped, valid ones survive.
        let monday = facility.operating_hours.get(Weekday::Mon).expect("monday");
        assert_eq!(monday.open, "08:00");
        assert!(facility.operating_hours.get(Weekday::Tue).is_none());
        assert_eq!(facility.operating_hours.iter().count(), 2);
    }

    #[test]
    fn test_facility_tolerates_sparse_document() {
        let payload = serde_json::json!({
            "_id": "sparse-1",
            "name": "Rural Clinic"
        });

        let facility: Facility = serde_json::from_value(payload).expect("decode");
        assert!(facility.coordinates().is_none());
        assert!(facility.services.is_empty());
        assert!(facility.operating_hours.is_empty());
        assert_eq!(facility.address().street, "");
    }

    #[test]
    fn test_facility_rejects_short_coordinate_array() {
        let payload = serde_json::json!({
            "_id": "short-1",
            "name": "Broken Point",
            "location": { "type": "Point", "coordinates": [5.0382] }
        });

        let facility: Facility = serde_json::from_value(payload).expect("decode");
        assert!(facility.coordinates().is_none());
    }

    #[test]
    fn test_operating_hours_serializes_in_week_order() {
        let payload = serde_json::json!({
            "sunday": { "open": "10:00", "close": "14:00" },
            "monday": { "open": "08:00", "close": "17:00" }
        });
        let hours: OperatingHours = serde_json::from_value(payload).expect("decode");

        let days: Vec<Weekday> = hours.iter().map(|(day, _)| day).collect();
        assert_eq!(days, vec![Weekday::Mon, Weekday::Sun]);

        let encoded = serde_json::to_string(&hours).expect("encode");
        let monday_at = encoded.find("monday").expect("monday key");
        let sunday_at = encoded.find("sunday").expect("sunday key");
        assert!(monday_at < sunday_at);
    }

    #[test]
    fn test_session_state_starts_loading() {
        let state = SessionState::new();
        assert!(state.loading);
        assert_eq!(state.permission_state, PermissionState::Unrequested);
        assert!(state.facilities.is_empty());
        assert!(state.nearest.is_none());
        assert!(state.last_error.is_none());
    }
}
