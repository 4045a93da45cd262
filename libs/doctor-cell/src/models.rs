use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use shared_models::identity::flexible_id;
use shared_models::{EntityIds, HasEntityIds};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorUser {
    #[serde(default, deserialize_with = "flexible_id::optional")]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(deserialize_with = "flexible_id::required")]
    pub id: String,
    #[serde(default, deserialize_with = "flexible_id::optional")]
    pub doctor_unique_id: Option<String>,
    pub user: DoctorUser,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub departments: Option<Vec<serde_json::Value>>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.user.first_name, self.user.last_name)
            .trim()
            .to_string()
    }

    pub fn display_name(&self) -> String {
        format!("Dr. {}", self.full_name())
    }
}

impl HasEntityIds for Doctor {
    fn entity_ids(&self) -> EntityIds {
        EntityIds::new(
            Some(self.id.clone()),
            self.doctor_unique_id.clone(),
            self.user.id.clone(),
        )
    }
}

/// Booking status of a single slot as reported by the scheduling API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlotStatus {
    Available,
    Booked,
    Break,
    Emergency,
    /// Status values this client does not know yet. Never selectable.
    Other(String),
}

impl SlotStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Booked => "booked",
            SlotStatus::Break => "break",
            SlotStatus::Emergency => "emergency",
            SlotStatus::Other(other) => other,
        }
    }

    pub fn is_available(&self) -> bool {
        *self == SlotStatus::Available
    }
}

impl From<String> for SlotStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "available" => SlotStatus::Available,
            "booked" => SlotStatus::Booked,
            "break" => SlotStatus::Break,
            "emergency" => SlotStatus::Emergency,
            _ => SlotStatus::Other(value),
        }
    }
}

impl From<SlotStatus> for String {
    fn from(status: SlotStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSlot {
    #[serde(deserialize_with = "flexible_id::required")]
    pub id: String,
    pub time: String,
    #[serde(default, deserialize_with = "optional_status")]
    pub status: Option<SlotStatus>,
}

fn optional_status<'de, D>(deserializer: D) -> Result<Option<SlotStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()).map(SlotStatus::from))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "type", default)]
    pub session_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slots: Vec<RawSlot>,
}

impl Session {
    pub fn is_break(&self) -> bool {
        self.session_type.trim().eq_ignore_ascii_case("break")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub schedule_days: Vec<ScheduleDay>,
}

/// One displayable slot of the selected day. `avail` is true exactly when the
/// resolved status is available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatSlot {
    pub id: String,
    pub display: String,
    pub avail: bool,
    pub status: SlotStatus,
    pub session_type: String,
    pub session_name: String,
}

/// Slot counts per status for the schedule legend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlotLegend {
    pub available: usize,
    pub booked: usize,
    pub on_break: usize,
    pub emergency: usize,
    pub other: usize,
}
