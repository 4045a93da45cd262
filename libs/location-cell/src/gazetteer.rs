use std::sync::OnceLock;

use crate::gazetteer_data::NEPAL;
use crate::models::LocationNode;

/// `(district, cities)` pairs of one province.
pub type DistrictTable = &'static [(&'static str, &'static [&'static str])];

#[derive(Debug, Clone)]
pub struct District {
    pub name: String,
    pub cities: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Province {
    pub name: String,
    pub districts: Vec<District>,
}

/// Read-only province → district → city hierarchy. Iteration order is the order
/// the table was built from and is relied on by the resolver.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    provinces: Vec<Province>,
}

impl Gazetteer {
    /// The built-in table of Nepal's provinces.
    pub fn nepal() -> &'static Gazetteer {
        static NEPAL_GAZETTEER: OnceLock<Gazetteer> = OnceLock::new();
        NEPAL_GAZETTEER.get_or_init(|| Gazetteer::from_table(NEPAL))
    }

    pub fn from_table(table: &[(&str, DistrictTable)]) -> Self {
        let provinces = table
            .iter()
            .map(|(province, districts)| Province {
                name: province.to_string(),
                districts: districts
                    .iter()
                    .map(|(district, cities)| District {
                        name: district.to_string(),
                        cities: cities.iter().map(|c| c.to_string()).collect(),
                    })
                    .collect(),
            })
            .collect();

        Self { provinces }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Province> {
        self.provinces.iter()
    }

    pub fn provinces(&self) -> impl Iterator<Item = &str> {
        self.provinces.iter().map(|p| p.name.as_str())
    }

    pub fn districts(&self, province: &str) -> Vec<&str> {
        self.province(province)
            .map(|p| p.districts.iter().map(|d| d.name.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn cities(&self, province: &str, district: &str) -> Vec<&str> {
        self.province(province)
            .and_then(|p| p.districts.iter().find(|d| d.name == district))
            .map(|d| d.cities.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every (province, district, city) triple in iteration order.
    pub fn nodes(&self) -> impl Iterator<Item = LocationNode> + '_ {
        self.provinces.iter().flat_map(|p| {
            p.districts.iter().flat_map(move |d| {
                d.cities.iter().map(move |c| LocationNode {
                    province: p.name.clone(),
                    district: d.name.clone(),
                    city: c.clone(),
                })
            })
        })
    }

    fn province(&self, name: &str) -> Option<&Province> {
        self.provinces.iter().find(|p| p.name == name)
    }
}
