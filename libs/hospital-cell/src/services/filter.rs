use location_cell::LocationMatch;

use crate::models::Hospital;

/// Narrows the hospital list to a chosen location.
pub struct HospitalFilter;

impl HospitalFilter {
    /// With no location every hospital is returned. Otherwise a hospital is kept when
    /// any of its city, district or province contains the corresponding field of the
    /// location (case-insensitive), or when it has no location recorded at all.
    pub fn filter<'a>(hospitals: &'a [Hospital], location: Option<&LocationMatch>) -> Vec<&'a Hospital> {
        let Some(location) = location else {
            return hospitals.iter().collect();
        };

        hospitals
            .iter()
            .filter(|hospital| Self::matches(hospital, location))
            .collect()
    }

    pub fn matches(hospital: &Hospital, location: &LocationMatch) -> bool {
        if !hospital.has_location() {
            return true;
        }

        field_contains(hospital.city(), &location.city)
            || field_contains(hospital.district(), &location.district)
            || field_contains(hospital.province(), &location.province)
    }
}

fn field_contains(recorded: Option<&str>, wanted: &str) -> bool {
    match recorded {
        Some(recorded) => recorded.to_lowercase().contains(&wanted.trim().to_lowercase()),
        None => false,
    }
}
