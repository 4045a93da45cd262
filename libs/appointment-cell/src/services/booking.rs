use reqwest::multipart::{Form, Part};
use tracing::{info, instrument};

use shared_api_client::PortalApiClient;
use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{BookingConfirmation, BookingSubmission};

const BOOKING_PATH: &str = "/appointments/book/";

pub struct AppointmentService {
    api: PortalApiClient,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self::with_client(PortalApiClient::new(config)?))
    }

    pub fn with_client(api: PortalApiClient) -> Self {
        Self { api }
    }

    /// Sends the booking request as a multipart form with the payment screenshot.
    #[instrument(skip(self, submission), fields(reference = %submission.booking_reference))]
    pub async fn book_appointment(
        &self,
        submission: &BookingSubmission,
    ) -> Result<BookingConfirmation, AppError> {
        let form = Self::build_form(submission)?;
        info!(
            "Booking doctor {} at hospital {} on {} ({}), emergency: {}",
            submission.doctor_id,
            submission.hospital_id,
            submission.date,
            submission.time_slot,
            submission.is_emergency
        );

        let confirmation: BookingConfirmation = self.api.post_multipart(BOOKING_PATH, form).await?;
        info!("Booking accepted with status {:?}", confirmation.status);
        Ok(confirmation)
    }

    fn build_form(submission: &BookingSubmission) -> Result<Form, AppError> {
        let form = submission
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        let proof = &submission.payment_proof;
        let screenshot = Part::bytes(proof.bytes.clone())
            .file_name(proof.file_name.clone())
            .mime_str(&proof.content_type)
            .map_err(|e| AppError::Validation(format!("Invalid payment proof type: {}", e)))?;

        Ok(form.part("payment_screenshot", screenshot))
    }
}
