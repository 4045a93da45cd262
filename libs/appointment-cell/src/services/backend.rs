use async_trait::async_trait;

use doctor_cell::{Doctor, DoctorService, ScheduleDay};
use hospital_cell::{Hospital, HospitalService};
use shared_api_client::PortalApiClient;
use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{BookingConfirmation, BookingSubmission};
use crate::services::booking::AppointmentService;

/// The remote calls the booking flow depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn get_hospitals(&self) -> Result<Vec<Hospital>, AppError>;

    async fn get_hospital_doctors(&self, hospital_id: &str) -> Result<Vec<Doctor>, AppError>;

    async fn get_doctor_schedule(
        &self,
        doctor_id: &str,
        hospital_id: &str,
    ) -> Result<Vec<ScheduleDay>, AppError>;

    async fn book_appointment(
        &self,
        submission: BookingSubmission,
    ) -> Result<BookingConfirmation, AppError>;
}

/// [`BookingBackend`] over the portal REST API.
pub struct HttpBookingBackend {
    hospitals: HospitalService,
    doctors: DoctorService,
    appointments: AppointmentService,
}

impl HttpBookingBackend {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let api = PortalApiClient::new(config)?;
        Ok(Self {
            hospitals: HospitalService::with_client(api.clone()),
            doctors: DoctorService::with_client(api.clone(), config.schedule_window_days),
            appointments: AppointmentService::with_client(api),
        })
    }
}

#[async_trait]
impl BookingBackend for HttpBookingBackend {
    async fn get_hospitals(&self) -> Result<Vec<Hospital>, AppError> {
        self.hospitals.get_hospitals().await
    }

    async fn get_hospital_doctors(&self, hospital_id: &str) -> Result<Vec<Doctor>, AppError> {
        self.doctors.get_hospital_doctors(hospital_id).await
    }

    async fn get_doctor_schedule(
        &self,
        doctor_id: &str,
        hospital_id: &str,
    ) -> Result<Vec<ScheduleDay>, AppError> {
        self.doctors.get_doctor_schedule(doctor_id, hospital_id).await
    }

    async fn book_appointment(
        &self,
        submission: BookingSubmission,
    ) -> Result<BookingConfirmation, AppError> {
        self.appointments.book_appointment(&submission).await
    }
}
