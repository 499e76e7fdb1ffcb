use crate::core::Facility;

/// Case-insensitive substring match over a facility's name and service list.
/// An empty or whitespace-only query matches everything.
pub fn matches(facility: &Facility, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    if facility.name.to_lowercase().contains(&needle) {
        return true;
    }
    facility
        .services
        .iter()
        .any(|service| service.to_lowercase().contains(&needle))
}

/// The subset of `facilities` visible under `query`, preserving input order.
/// Filtering is a pure view over the session's facility list; it never
/// touches the list itself or the resolved nearest facility.
pub fn filter<'a>(facilities: &'a [Facility], query: &str) -> Vec<&'a Facility> {
    facilities
        .iter()
        .filter(|facility| matches(facility, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(name: &str, services: &[&str]) -> Facility {
        Facility {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            description: String::new(),
            services: services.iter().map(|s| s.to_string()).collect(),
            contact: Default::default(),
            operating_hours: Default::default(),
            location: None,
        }
    }

    #[test]
    fn test_query_matches_service_entries_case_insensitively() {
        let f = facility("General Hospital", &["Cardiology", "ER"]);
        assert!(matches(&f, "cardio"));
        assert!(matches(&f, "CARDIO"));
        assert!(matches(&f, "er"));
    }

    #[test]
    fn test_query_matches_name_substring() {
        let f = facility("St. Mary Clinic", &[]);
        assert!(matches(&f, "mary"));
        assert!(!matches(&f, "xyz"));
    }

    #[test]
    fn test_blank_queries_match_everything() {
        let f = facility("General Hospital", &["ER"]);
        assert!(matches(&f, ""));
        assert!(matches(&f, "   "));
    }

    #[test]
    fn test_filter_preserves_order_and_identity_on_blank_query() {
        let facilities = vec![
            facility("Alpha Clinic", &["Dentistry"]),
            facility("Beta Hospital", &["Cardiology"]),
            facility("Gamma Health Centre", &["cardiology", "ER"]),
        ];

        let all = filter(&facilities, " ");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Alpha Clinic");

        let cardio = filter(&facilities, "cardio");
        let names: Vec<&str> = cardio.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Beta Hospital", "Gamma Health Centre"]);

        assert!(filter(&facilities, "xyz").is_empty());
    }
}
