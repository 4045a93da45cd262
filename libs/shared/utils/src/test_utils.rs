use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};

use shared_config::AppConfig;

pub struct TestConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            api_token: Some("test-api-token".to_string()),
        }
    }
}

impl TestConfig {
    /// Config pointing at a mock server root, e.g. `MockServer::uri()`.
    pub fn for_server(uri: &str) -> Self {
        Self {
            api_base_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            api_token: self.api_token.clone(),
            request_timeout_secs: 5,
            schedule_window_days: 10,
        }
    }
}

pub struct MockPortalResponses;

impl MockPortalResponses {
    pub fn hospital_response(
        id: u64,
        name: &str,
        city: Option<&str>,
        district: Option<&str>,
        province: Option<&str>,
    ) -> Value {
        json!({
            "id": id,
            "hospital_unique_id": format!("HSP-{:04}", id),
            "user": { "id": 1000 + id },
            "hospital_name": name,
            "city": city,
            "district": district,
            "province": province,
            "departments": ["General Medicine"]
        })
    }

    pub fn doctor_response(id: u64, first_name: &str, last_name: &str, specialization: &str) -> Value {
        json!({
            "id": id,
            "doctor_unique_id": format!("DOC-{:04}", id),
            "user": {
                "id": 2000 + id,
                "first_name": first_name,
                "last_name": last_name
            },
            "specialization": specialization,
            "experience_years": 8,
            "departments": [specialization]
        })
    }

    /// One morning session with a booked and an open slot, followed by a break
    /// session whose slots carry no status.
    pub fn schedule_day(date: NaiveDate) -> Value {
        json!({
            "date": date.format("%Y-%m-%d").to_string(),
            "sessions": [
                {
                    "type": "offline",
                    "name": "Morning Clinic",
                    "slots": [
                        { "id": 1, "time": "09:00-09:10", "status": "booked" },
                        { "id": 2, "time": "09:10-09:20", "status": "available" }
                    ]
                },
                {
                    "type": "break",
                    "name": "Lunch Break",
                    "slots": [
                        { "id": 3, "time": "12:00-13:00" }
                    ]
                }
            ]
        })
    }

    pub fn schedule_response(start: NaiveDate, days: i64) -> Value {
        let days: Vec<Value> = (0..days)
            .map(|offset| Self::schedule_day(start + Duration::days(offset)))
            .collect();
        json!({ "schedule_days": days })
    }

    pub fn booking_confirmation(id: u64, reference: &str) -> Value {
        json!({
            "id": id,
            "booking_reference": reference,
            "status": "pending",
            "message": "Appointment request received"
        })
    }

    pub fn error_response(detail: &str) -> Value {
        json!({ "detail": detail })
    }
}
