use tracing::{debug, instrument};

use shared_api_client::PortalApiClient;
use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{Doctor, ScheduleDay, ScheduleResponse};

pub struct DoctorService {
    api: PortalApiClient,
    schedule_window_days: u32,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self::with_client(PortalApiClient::new(config)?, config.schedule_window_days))
    }

    pub fn with_client(api: PortalApiClient, schedule_window_days: u32) -> Self {
        Self {
            api,
            schedule_window_days,
        }
    }

    /// Doctors attached to a hospital, in the order the API lists them.
    #[instrument(skip(self))]
    pub async fn get_hospital_doctors(&self, hospital_id: &str) -> Result<Vec<Doctor>, AppError> {
        let path = format!("/hospitals/{}/doctors/", urlencoding::encode(hospital_id));
        let doctors: Vec<Doctor> = self.api.get_list(&path, &[]).await?;
        debug!("Hospital {} has {} doctors", hospital_id, doctors.len());
        Ok(doctors)
    }

    /// Rolling schedule window of a doctor at one hospital.
    #[instrument(skip(self))]
    pub async fn get_doctor_schedule(
        &self,
        doctor_id: &str,
        hospital_id: &str,
    ) -> Result<Vec<ScheduleDay>, AppError> {
        let path = format!("/doctors/{}/schedule/", urlencoding::encode(doctor_id));
        let query = [
            ("hospital", hospital_id.to_string()),
            ("days", self.schedule_window_days.to_string()),
        ];

        let response: ScheduleResponse = self.api.get_json(&path, &query).await?;
        debug!(
            "Doctor {} has {} schedule days at hospital {}",
            doctor_id,
            response.schedule_days.len(),
            hospital_id
        );
        Ok(response.schedule_days)
    }
}
