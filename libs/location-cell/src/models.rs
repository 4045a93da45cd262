use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationNode {
    pub province: String,
    pub district: String,
    pub city: String,
}

/// A gazetteer entry offered as an autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationMatch {
    pub display: String,
    pub province: String,
    pub district: String,
    pub city: String,
}

impl LocationMatch {
    pub fn new(city: &str, district: &str, province: &str) -> Self {
        Self {
            display: format!("{}, {}, {}", city, district, province),
            province: province.to_string(),
            district: district.to_string(),
            city: city.to_string(),
        }
    }

    pub fn node(&self) -> LocationNode {
        LocationNode {
            province: self.province.clone(),
            district: self.district.clone(),
            city: self.city.clone(),
        }
    }
}

impl From<LocationNode> for LocationMatch {
    fn from(node: LocationNode) -> Self {
        LocationMatch::new(&node.city, &node.district, &node.province)
    }
}
