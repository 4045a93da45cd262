use tracing::debug;

use crate::gazetteer::Gazetteer;
use crate::models::LocationMatch;

/// Shorter (trimmed) queries produce no suggestions.
pub const MIN_QUERY_CHARS: usize = 2;
/// Hard truncation of the suggestion list.
pub const MAX_SUGGESTIONS: usize = 10;

/// Free-text location autocomplete over a [`Gazetteer`].
///
/// Matching is a case-insensitive substring test applied top down: a matching
/// province contributes every city it contains; otherwise each district is tested
/// and a matching district contributes all its cities; otherwise individual cities
/// are tested. Results keep gazetteer order and stop at [`MAX_SUGGESTIONS`].
pub struct LocationResolver<'a> {
    gazetteer: &'a Gazetteer,
}

impl LocationResolver<'static> {
    pub fn nepal() -> Self {
        Self::new(Gazetteer::nepal())
    }
}

impl<'a> LocationResolver<'a> {
    pub fn new(gazetteer: &'a Gazetteer) -> Self {
        Self { gazetteer }
    }

    pub fn resolve(&self, query: &str) -> Vec<LocationMatch> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        let contains = |name: &str| name.to_lowercase().contains(&needle);
        let mut matches = Vec::new();

        'scan: for province in self.gazetteer.iter() {
            let province_hit = contains(&province.name);

            for district in &province.districts {
                let district_hit = province_hit || contains(&district.name);

                for city in &district.cities {
                    if district_hit || contains(city) {
                        matches.push(LocationMatch::new(city, &district.name, &province.name));
                        if matches.len() == MAX_SUGGESTIONS {
                            break 'scan;
                        }
                    }
                }
            }
        }

        debug!("Location query '{}' produced {} suggestions", query, matches.len());
        matches
    }
}
