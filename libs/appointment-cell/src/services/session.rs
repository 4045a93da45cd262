use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tracing::{debug, error, instrument};

use doctor_cell::Doctor;
use hospital_cell::Hospital;
use location_cell::LocationMatch;
use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{AppointmentError, BookingConfirmation, ConsultationType, PaymentProof};
use crate::services::backend::{BookingBackend, HttpBookingBackend};
use crate::services::emergency::EmergencyParams;
use crate::services::wizard::{BookingWizard, FetchOutcome, FetchRequest, FetchTarget};

struct FetchEvent {
    ticket: u64,
    outcome: FetchOutcome,
}

/// Drives a [`BookingWizard`] against a [`BookingBackend`].
///
/// Fetches run as tokio tasks and report back over a channel; only the session
/// applies their results, one at a time. Must be created inside a tokio runtime.
pub struct BookingSession {
    wizard: BookingWizard,
    backend: Arc<dyn BookingBackend>,
    events_tx: mpsc::UnboundedSender<FetchEvent>,
    events_rx: mpsc::UnboundedReceiver<FetchEvent>,
    in_flight: usize,
}

impl BookingSession {
    pub fn connect(config: &AppConfig, params: EmergencyParams) -> Result<Self, AppointmentError> {
        let backend = HttpBookingBackend::new(config)?;
        Ok(Self::start(Arc::new(backend), params))
    }

    pub fn start(backend: Arc<dyn BookingBackend>, params: EmergencyParams) -> Self {
        Self::with_wizard(backend, BookingWizard::new(params))
    }

    pub fn with_wizard(backend: Arc<dyn BookingBackend>, mut wizard: BookingWizard) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let initial = wizard.start();

        let mut session = Self {
            wizard,
            backend,
            events_tx,
            events_rx,
            in_flight: 0,
        };
        session.dispatch(initial);
        session
    }

    pub fn wizard(&self) -> &BookingWizard {
        &self.wizard
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn dispatch(&mut self, request: FetchRequest) {
        let backend = Arc::clone(&self.backend);
        let events = self.events_tx.clone();
        let FetchRequest { ticket, target } = request;
        let kind = target.kind();
        self.in_flight += 1;

        tokio::spawn(async move {
            let fetch = tokio::spawn(async move { run_fetch(backend.as_ref(), &target).await });
            // Every ticket gets an outcome, even when the fetch panics.
            let outcome = match fetch.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("{} fetch task failed: {}", kind, e);
                    FetchOutcome::failed(kind, AppError::Internal(format!("{} fetch aborted", kind)))
                }
            };
            // A closed channel means the session is gone and nobody wants the result.
            let _ = events.send(FetchEvent { ticket, outcome });
        });
    }

    /// Waits for the next finished fetch and applies it. Returns `false` when no
    /// fetch is in flight.
    #[instrument(skip(self))]
    pub async fn process_next_event(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        let Some(event) = self.events_rx.recv().await else {
            return false;
        };
        self.in_flight -= 1;

        if let Some(follow_up) = self.wizard.apply_fetch(event.ticket, event.outcome) {
            self.dispatch(follow_up);
        }
        true
    }

    /// Applies fetches until none are in flight, follow-ups included.
    pub async fn settle(&mut self) {
        while self.process_next_event().await {}
        debug!("Session settled on the {} step", self.wizard.step_kind());
    }

    pub fn set_location_query(&mut self, query: &str) -> Result<(), AppointmentError> {
        self.wizard.set_location_query(query)
    }

    pub fn choose_location(&mut self, location: LocationMatch) -> Result<(), AppointmentError> {
        self.wizard.choose_location(location)
    }

    pub fn confirm_location(&mut self) -> Result<(), AppointmentError> {
        self.wizard.confirm_location()
    }

    pub fn select_hospital(&mut self, hospital: Hospital) -> Result<(), AppointmentError> {
        let request = self.wizard.select_hospital(hospital)?;
        self.dispatch(request);
        Ok(())
    }

    pub fn select_doctor(&mut self, doctor: Doctor) -> Result<(), AppointmentError> {
        let request = self.wizard.select_doctor(doctor)?;
        self.dispatch(request);
        Ok(())
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), AppointmentError> {
        self.wizard.select_date(date)
    }

    pub fn select_slot(&mut self, key: &str) -> Result<(), AppointmentError> {
        self.wizard.select_slot(key)
    }

    pub fn confirm_slot(&mut self) -> Result<(), AppointmentError> {
        self.wizard.confirm_slot()
    }

    pub fn set_consultation_type(&mut self, consultation_type: ConsultationType) -> Result<(), AppointmentError> {
        self.wizard.set_consultation_type(consultation_type)
    }

    pub fn set_symptoms(&mut self, symptoms: &str) -> Result<(), AppointmentError> {
        self.wizard.set_symptoms(symptoms)
    }

    pub fn attach_payment_proof(&mut self, proof: PaymentProof) -> Result<(), AppointmentError> {
        self.wizard.attach_payment_proof(proof)
    }

    pub async fn attach_payment_proof_file(&mut self, path: impl AsRef<Path>) -> Result<(), AppointmentError> {
        let proof = PaymentProof::read_from(path).await?;
        self.wizard.attach_payment_proof(proof)
    }

    pub fn back(&mut self) -> Result<(), AppointmentError> {
        if let Some(request) = self.wizard.back()? {
            self.dispatch(request);
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.wizard.reset();
    }

    /// Submits the booking. Rejected submissions never reach the backend.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<BookingConfirmation, AppointmentError> {
        let submission = self.wizard.prepare_submission()?;
        let outcome = self.backend.book_appointment(submission).await;
        let confirmation = outcome.as_ref().ok().cloned().unwrap_or_default();

        self.wizard.complete_submission(outcome)?;
        Ok(confirmation)
    }
}

async fn run_fetch(backend: &dyn BookingBackend, target: &FetchTarget) -> FetchOutcome {
    match target {
        FetchTarget::Hospitals => FetchOutcome::Hospitals(backend.get_hospitals().await),
        FetchTarget::HospitalDoctors { hospital_id } => {
            FetchOutcome::Doctors(backend.get_hospital_doctors(hospital_id).await)
        }
        FetchTarget::DoctorSchedule {
            doctor_id,
            hospital_id,
        } => FetchOutcome::Schedule(backend.get_doctor_schedule(doctor_id, hospital_id).await),
    }
}
