use serde::{Deserialize, Serialize};

use shared_models::identity::flexible_id;
use shared_models::{EntityIds, HasEntityIds};

/// Account that owns a hospital or doctor record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerRef {
    #[serde(default, deserialize_with = "flexible_id::optional")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    #[serde(deserialize_with = "flexible_id::required")]
    pub id: String,
    #[serde(default, deserialize_with = "flexible_id::optional")]
    pub hospital_unique_id: Option<String>,
    #[serde(default)]
    pub user: Option<OwnerRef>,
    pub hospital_name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub departments: Option<Vec<serde_json::Value>>,
}

impl Hospital {
    pub fn city(&self) -> Option<&str> {
        non_blank(&self.city)
    }

    pub fn district(&self) -> Option<&str> {
        non_blank(&self.district)
    }

    pub fn province(&self) -> Option<&str> {
        non_blank(&self.province)
    }

    /// False for hospitals that have not recorded any location yet.
    pub fn has_location(&self) -> bool {
        self.city().is_some() || self.district().is_some() || self.province().is_some()
    }

    /// Department names, whether the API sent plain strings or `{ "name": .. }` objects.
    pub fn department_names(&self) -> Vec<String> {
        self.departments
            .iter()
            .flatten()
            .filter_map(|d| match d {
                serde_json::Value::String(name) => Some(name.clone()),
                serde_json::Value::Object(obj) => obj
                    .get("name")
                    .and_then(|n| n.as_str())
                    .map(str::to_string),
                _ => None,
            })
            .collect()
    }
}

impl HasEntityIds for Hospital {
    fn entity_ids(&self) -> EntityIds {
        EntityIds::new(
            Some(self.id.clone()),
            self.hospital_unique_id.clone(),
            self.user.as_ref().and_then(|u| u.id.clone()),
        )
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
