//! Hospitals and doctors are referenced by three different identifiers depending on
//! who produced the reference: the row id, the externally issued unique id, or the id
//! of the user account that owns the record. Every lookup and every outgoing payload
//! goes through [`EntityIds`] so the two call sites cannot drift apart.

/// The identifier set of one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityIds {
    pub internal: Option<String>,
    pub unique: Option<String>,
    pub user: Option<String>,
}

impl EntityIds {
    pub fn new(internal: Option<String>, unique: Option<String>, user: Option<String>) -> Self {
        Self {
            internal: normalize(internal),
            unique: normalize(unique),
            user: normalize(user),
        }
    }

    /// Identifiers in fallback order: internal, unique, owning user.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [&self.internal, &self.unique, &self.user]
            .into_iter()
            .filter_map(|id| id.as_deref())
    }

    /// True when `candidate` equals any of the three identifiers.
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        !candidate.is_empty() && self.iter().any(|id| id == candidate)
    }

    /// First identifier present, in fallback order.
    pub fn resolve(&self) -> Option<&str> {
        self.iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.resolve().is_none()
    }
}

fn normalize(id: Option<String>) -> Option<String> {
    id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub trait HasEntityIds {
    fn entity_ids(&self) -> EntityIds;

    fn matches_identifier(&self, candidate: &str) -> bool {
        self.entity_ids().matches(candidate)
    }

    fn resolved_identifier(&self) -> Option<String> {
        self.entity_ids().resolve().map(str::to_string)
    }
}

/// First entity in list order that carries `candidate` under any of its identifiers.
pub fn find_by_identifier<'a, T: HasEntityIds>(items: &'a [T], candidate: &str) -> Option<&'a T> {
    items.iter().find(|item| item.matches_identifier(candidate))
}

/// Serde helpers for ids the API sends either as numbers or as strings.
pub mod flexible_id {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn to_id(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn required<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        to_id(value).ok_or_else(|| serde::de::Error::custom("expected a string or numeric id"))
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Value>::deserialize(deserializer)?.and_then(to_id))
    }
}
