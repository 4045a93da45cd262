use std::fmt;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, warn};

use doctor_cell::{Doctor, FlatSlot, ScheduleDay, ScheduleFlattener, SlotLegend};
use hospital_cell::{Hospital, HospitalFilter};
use location_cell::{LocationMatch, LocationResolver};
use shared_models::{AppError, HasEntityIds};

use crate::models::{
    AppointmentError, BookingConfirmation, BookingReference, BookingSelection, BookingSubmission,
    ConsultationType, PaymentProof, StepKind, EMERGENCY_SLOT_LABEL,
};
use crate::services::emergency::{EmergencyParams, EmergencyPreselection};

/// Source of "today" for emergency bookings.
pub type Clock = fn() -> NaiveDate;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

// ==============================================================================
// REMOTE DATA
// ==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            Loadable::Loading => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Hospitals,
    Doctors,
    Schedule,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchKind::Hospitals => "hospitals",
            FetchKind::Doctors => "doctors",
            FetchKind::Schedule => "schedule",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    Hospitals,
    HospitalDoctors { hospital_id: String },
    DoctorSchedule { doctor_id: String, hospital_id: String },
}

impl FetchTarget {
    pub fn kind(&self) -> FetchKind {
        match self {
            FetchTarget::Hospitals => FetchKind::Hospitals,
            FetchTarget::HospitalDoctors { .. } => FetchKind::Doctors,
            FetchTarget::DoctorSchedule { .. } => FetchKind::Schedule,
        }
    }
}

/// A remote load the wizard needs. The result must be handed back to
/// [`BookingWizard::apply_fetch`] together with `ticket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: u64,
    pub target: FetchTarget,
}

#[derive(Debug)]
pub enum FetchOutcome {
    Hospitals(Result<Vec<Hospital>, AppError>),
    Doctors(Result<Vec<Doctor>, AppError>),
    Schedule(Result<Vec<ScheduleDay>, AppError>),
}

impl FetchOutcome {
    /// Failed outcome of the given kind.
    pub fn failed(kind: FetchKind, error: AppError) -> Self {
        match kind {
            FetchKind::Hospitals => FetchOutcome::Hospitals(Err(error)),
            FetchKind::Doctors => FetchOutcome::Doctors(Err(error)),
            FetchKind::Schedule => FetchOutcome::Schedule(Err(error)),
        }
    }

    pub fn kind(&self) -> FetchKind {
        match self {
            FetchOutcome::Hospitals(_) => FetchKind::Hospitals,
            FetchOutcome::Doctors(_) => FetchKind::Doctors,
            FetchOutcome::Schedule(_) => FetchKind::Schedule,
        }
    }
}

/// The one outstanding ticket per fetch kind. Anything else is stale.
#[derive(Debug, Default)]
struct Tickets {
    last: u64,
    hospitals: Option<u64>,
    doctors: Option<u64>,
    schedule: Option<u64>,
}

impl Tickets {
    fn slot(&mut self, kind: FetchKind) -> &mut Option<u64> {
        match kind {
            FetchKind::Hospitals => &mut self.hospitals,
            FetchKind::Doctors => &mut self.doctors,
            FetchKind::Schedule => &mut self.schedule,
        }
    }

    fn issue(&mut self, kind: FetchKind) -> u64 {
        self.last += 1;
        let ticket = self.last;
        *self.slot(kind) = Some(ticket);
        ticket
    }

    fn redeem(&mut self, kind: FetchKind, ticket: u64) -> bool {
        let slot = self.slot(kind);
        if *slot == Some(ticket) {
            *slot = None;
            true
        } else {
            false
        }
    }

    fn cancel(&mut self, kind: FetchKind) {
        *self.slot(kind) = None;
    }
}

// ==============================================================================
// STEPS
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationStep {
    pub query: String,
    pub suggestions: Vec<LocationMatch>,
    pub selected: Option<LocationMatch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HospitalStep {
    pub location: Option<LocationMatch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoctorStep {
    pub location: Option<LocationMatch>,
    pub hospital: Hospital,
    pub doctors: Loadable<Vec<Doctor>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotStep {
    pub location: Option<LocationMatch>,
    pub hospital: Hospital,
    pub doctors: Vec<Doctor>,
    pub doctor: Doctor,
    pub schedule: Loadable<Vec<ScheduleDay>>,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentStep {
    pub location: Option<LocationMatch>,
    pub hospital: Hospital,
    pub doctors: Vec<Doctor>,
    pub doctor: Doctor,
    /// `None` when the emergency shortcut skipped the schedule.
    pub schedule: Option<Vec<ScheduleDay>>,
    pub date: NaiveDate,
    pub time_slot: String,
    pub payment_proof: Option<PaymentProof>,
    pub submitting: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingStep {
    pub selection: BookingSelection,
    pub confirmation: BookingConfirmation,
}

/// The current step together with exactly the data valid on it.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    Location(LocationStep),
    Hospitals(HospitalStep),
    Doctors(DoctorStep),
    Slots(SlotStep),
    Payment(PaymentStep),
    Pending(Box<PendingStep>),
}

impl WizardStep {
    pub fn kind(&self) -> StepKind {
        match self {
            WizardStep::Location(_) => StepKind::Location,
            WizardStep::Hospitals(_) => StepKind::Hospitals,
            WizardStep::Doctors(_) => StepKind::Doctors,
            WizardStep::Slots(_) => StepKind::Slots,
            WizardStep::Payment(_) => StepKind::Payment,
            WizardStep::Pending(_) => StepKind::Pending,
        }
    }

    fn location(&self) -> Option<&LocationMatch> {
        match self {
            WizardStep::Location(step) => step.selected.as_ref(),
            WizardStep::Hospitals(step) => step.location.as_ref(),
            WizardStep::Doctors(step) => step.location.as_ref(),
            WizardStep::Slots(step) => step.location.as_ref(),
            WizardStep::Payment(step) => step.location.as_ref(),
            WizardStep::Pending(step) => step.selection.location.as_ref(),
        }
    }
}

fn invalid(step: StepKind, action: &'static str) -> AppointmentError {
    warn!("Rejected '{}' on the {} step", action, step);
    AppointmentError::InvalidTransition { step, action }
}

fn schedule_target(doctor: &Doctor, hospital: &Hospital) -> Result<FetchTarget, AppointmentError> {
    Ok(FetchTarget::DoctorSchedule {
        doctor_id: doctor
            .resolved_identifier()
            .ok_or(AppointmentError::MissingIdentifier("doctor"))?,
        hospital_id: hospital
            .resolved_identifier()
            .ok_or(AppointmentError::MissingIdentifier("hospital"))?,
    })
}

fn loaded_or_empty<T>(kind: FetchKind, result: Result<Vec<T>, AppError>) -> Vec<T> {
    match result {
        Ok(items) => {
            debug!("Loaded {} {}", items.len(), kind);
            items
        }
        Err(e) => {
            error!("Failed to load {}: {}", kind, e);
            Vec::new()
        }
    }
}

// ==============================================================================
// WIZARD
// ==============================================================================

/// Step-by-step appointment booking.
///
/// The wizard never performs I/O. Transitions that need remote data return a
/// [`FetchRequest`]; whoever drives the wizard runs it and feeds the outcome back
/// through [`BookingWizard::apply_fetch`]. Each fetch kind has a single live ticket,
/// so results for a hospital or doctor the user has since moved away from are
/// dropped instead of overwriting the current step.
pub struct BookingWizard {
    step: WizardStep,
    hospitals: Loadable<Vec<Hospital>>,
    consultation_type: ConsultationType,
    symptoms: String,
    reference: BookingReference,
    emergency: EmergencyPreselection,
    resolver: LocationResolver<'static>,
    tickets: Tickets,
    today: Clock,
}

impl BookingWizard {
    pub fn new(params: EmergencyParams) -> Self {
        Self::with_resolver(params, LocationResolver::nepal())
    }

    pub fn with_resolver(params: EmergencyParams, resolver: LocationResolver<'static>) -> Self {
        // An emergency link names the hospital, so there is no location to ask for.
        let step = if params.is_active() {
            WizardStep::Hospitals(HospitalStep { location: None })
        } else {
            WizardStep::Location(LocationStep::default())
        };

        Self {
            step,
            hospitals: Loadable::Loading,
            consultation_type: ConsultationType::default(),
            symptoms: String::new(),
            reference: BookingReference::generate(),
            emergency: EmergencyPreselection::new(params),
            resolver,
            tickets: Tickets::default(),
            today: local_today,
        }
    }

    pub fn with_clock(mut self, today: Clock) -> Self {
        self.today = today;
        self
    }

    /// Requests the hospital catalog. Call once after construction.
    pub fn start(&mut self) -> FetchRequest {
        self.hospitals = Loadable::Loading;
        self.issue(FetchTarget::Hospitals)
    }

    fn issue(&mut self, target: FetchTarget) -> FetchRequest {
        let ticket = self.tickets.issue(target.kind());
        debug!("Issuing {:?} as ticket {}", target, ticket);
        FetchRequest { ticket, target }
    }

    // --------------------------------------------------------------------------
    // Views
    // --------------------------------------------------------------------------

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn step_kind(&self) -> StepKind {
        self.step.kind()
    }

    /// (position, total) of the current step.
    pub fn progress(&self) -> (usize, usize) {
        (self.step.kind().position(), StepKind::ALL.len())
    }

    pub fn reference(&self) -> &BookingReference {
        &self.reference
    }

    pub fn is_emergency(&self) -> bool {
        self.emergency.is_emergency()
    }

    pub fn consultation_type(&self) -> ConsultationType {
        self.consultation_type
    }

    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }

    pub fn hospitals(&self) -> &Loadable<Vec<Hospital>> {
        &self.hospitals
    }

    pub fn location(&self) -> Option<&LocationMatch> {
        self.step.location()
    }

    /// Hospitals narrowed to the chosen location.
    pub fn visible_hospitals(&self) -> Vec<&Hospital> {
        match &self.hospitals {
            Loadable::Ready(hospitals) => HospitalFilter::filter(hospitals, self.location()),
            Loadable::Loading => Vec::new(),
        }
    }

    pub fn doctors(&self) -> &[Doctor] {
        match &self.step {
            WizardStep::Doctors(step) => step.doctors.ready().map(|d| d.as_slice()).unwrap_or(&[]),
            WizardStep::Slots(step) => &step.doctors,
            WizardStep::Payment(step) => &step.doctors,
            _ => &[],
        }
    }

    fn loaded_schedule(&self) -> Option<(&[ScheduleDay], Option<NaiveDate>)> {
        match &self.step {
            WizardStep::Slots(step) => step.schedule.ready().map(|days| (days.as_slice(), step.date)),
            _ => None,
        }
    }

    pub fn selectable_dates(&self) -> Vec<NaiveDate> {
        self.loaded_schedule()
            .map(|(days, _)| ScheduleFlattener::selectable_dates(days))
            .unwrap_or_default()
    }

    /// Slots of the selected date, including the ones that cannot be booked.
    pub fn flat_slots(&self) -> Vec<FlatSlot> {
        match self.loaded_schedule() {
            Some((days, Some(date))) => ScheduleFlattener::flatten(days, date),
            _ => Vec::new(),
        }
    }

    pub fn slot_legend(&self) -> SlotLegend {
        ScheduleFlattener::legend(&self.flat_slots())
    }

    /// True while the current step is waiting for remote data.
    pub fn is_loading(&self) -> bool {
        match &self.step {
            WizardStep::Hospitals(_) => self.hospitals.is_loading(),
            WizardStep::Doctors(step) => step.doctors.is_loading(),
            WizardStep::Slots(step) => step.schedule.is_loading(),
            WizardStep::Payment(step) => step.submitting,
            _ => false,
        }
    }

    pub fn can_confirm_location(&self) -> bool {
        matches!(&self.step, WizardStep::Location(step) if step.selected.is_some())
    }

    pub fn can_confirm_slot(&self) -> bool {
        matches!(&self.step, WizardStep::Slots(step) if step.date.is_some() && step.time_slot.is_some())
    }

    pub fn can_submit(&self) -> bool {
        matches!(&self.step, WizardStep::Payment(step) if step.payment_proof.is_some() && !step.submitting)
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.step {
            WizardStep::Payment(step) => step.last_error.as_deref(),
            _ => None,
        }
    }

    pub fn selection(&self) -> BookingSelection {
        if let WizardStep::Pending(step) = &self.step {
            return step.selection.clone();
        }

        let mut selection = BookingSelection {
            location: self.location().cloned(),
            hospital: None,
            doctor: None,
            date: None,
            time_slot_label: None,
            consultation_type: self.consultation_type,
            symptoms: self.symptoms.clone(),
            payment_proof: None,
            is_emergency: self.emergency.is_emergency(),
            booking_reference: self.reference.clone(),
        };

        match &self.step {
            WizardStep::Doctors(step) => {
                selection.hospital = Some(step.hospital.clone());
            }
            WizardStep::Slots(step) => {
                selection.hospital = Some(step.hospital.clone());
                selection.doctor = Some(step.doctor.clone());
                selection.date = step.date;
                selection.time_slot_label = step.time_slot.clone();
            }
            WizardStep::Payment(step) => {
                selection.hospital = Some(step.hospital.clone());
                selection.doctor = Some(step.doctor.clone());
                selection.date = Some(step.date);
                selection.time_slot_label = Some(step.time_slot.clone());
                selection.payment_proof = step.payment_proof.clone();
            }
            _ => {}
        }

        selection
    }

    // --------------------------------------------------------------------------
    // Location
    // --------------------------------------------------------------------------

    /// Updates the query and its suggestions. Editing the text drops a previously
    /// chosen suggestion.
    pub fn set_location_query(&mut self, query: &str) -> Result<(), AppointmentError> {
        let kind = self.step.kind();
        let suggestions = self.resolver.resolve(query);
        let WizardStep::Location(step) = &mut self.step else {
            return Err(invalid(kind, "set_location_query"));
        };

        if step.selected.as_ref().is_some_and(|s| s.display != query) {
            step.selected = None;
        }
        step.query = query.to_string();
        step.suggestions = suggestions;
        Ok(())
    }

    pub fn choose_location(&mut self, location: LocationMatch) -> Result<(), AppointmentError> {
        let kind = self.step.kind();
        let WizardStep::Location(step) = &mut self.step else {
            return Err(invalid(kind, "choose_location"));
        };

        debug!("Location chosen: {}", location.display);
        step.query = location.display.clone();
        step.selected = Some(location);
        Ok(())
    }

    pub fn confirm_location(&mut self) -> Result<(), AppointmentError> {
        let kind = self.step.kind();
        let WizardStep::Location(step) = &self.step else {
            return Err(invalid(kind, "confirm_location"));
        };
        let location = step.selected.clone().ok_or(AppointmentError::LocationNotSelected)?;

        info!("Location confirmed: {}", location.display);
        self.step = WizardStep::Hospitals(HospitalStep {
            location: Some(location),
        });
        Ok(())
    }

    // --------------------------------------------------------------------------
    // Hospital and doctor
    // --------------------------------------------------------------------------

    pub fn select_hospital(&mut self, hospital: Hospital) -> Result<FetchRequest, AppointmentError> {
        let kind = self.step.kind();
        let WizardStep::Hospitals(step) = &self.step else {
            return Err(invalid(kind, "select_hospital"));
        };
        let location = step.location.clone();
        let hospital_id = hospital
            .resolved_identifier()
            .ok_or(AppointmentError::MissingIdentifier("hospital"))?;

        info!("Hospital selected: {} ({})", hospital.hospital_name, hospital_id);
        self.tickets.cancel(FetchKind::Schedule);
        let request = self.issue(FetchTarget::HospitalDoctors { hospital_id });
        self.step = WizardStep::Doctors(DoctorStep {
            location,
            hospital,
            doctors: Loadable::Loading,
        });
        Ok(request)
    }

    pub fn select_doctor(&mut self, doctor: Doctor) -> Result<FetchRequest, AppointmentError> {
        let kind = self.step.kind();
        let WizardStep::Doctors(step) = &self.step else {
            return Err(invalid(kind, "select_doctor"));
        };
        let Loadable::Ready(doctors) = &step.doctors else {
            return Err(AppointmentError::StillLoading("doctors"));
        };
        let target = schedule_target(&doctor, &step.hospital)?;
        let (location, hospital, doctors) = (step.location.clone(), step.hospital.clone(), doctors.clone());

        info!("Doctor selected: {}", doctor.display_name());
        let request = self.issue(target);
        self.step = WizardStep::Slots(SlotStep {
            location,
            hospital,
            doctors,
            doctor,
            schedule: Loadable::Loading,
            date: None,
            time_slot: None,
        });
        Ok(request)
    }

    // --------------------------------------------------------------------------
    // Date and slot
    // --------------------------------------------------------------------------

    /// Switching to another date clears the chosen slot.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), AppointmentError> {
        let kind = self.step.kind();
        let WizardStep::Slots(step) = &mut self.step else {
            return Err(invalid(kind, "select_date"));
        };
        let Loadable::Ready(days) = &step.schedule else {
            return Err(AppointmentError::StillLoading("schedule"));
        };
        if !days.iter().any(|day| day.date == date) {
            return Err(AppointmentError::DateOutsideWindow(date));
        }

        if step.date != Some(date) {
            debug!("Date selected: {}", date);
            step.date = Some(date);
            step.time_slot = None;
        }
        Ok(())
    }

    /// Picks a slot of the selected date by label or id. Only available slots can
    /// be picked.
    pub fn select_slot(&mut self, key: &str) -> Result<(), AppointmentError> {
        let kind = self.step.kind();
        let WizardStep::Slots(step) = &mut self.step else {
            return Err(invalid(kind, "select_slot"));
        };
        let Loadable::Ready(days) = &step.schedule else {
            return Err(AppointmentError::StillLoading("schedule"));
        };
        let date = step.date.ok_or(AppointmentError::DateNotSelected)?;

        let slots = ScheduleFlattener::flatten(days, date);
        let slot = ScheduleFlattener::find_slot(&slots, key)
            .ok_or_else(|| AppointmentError::UnknownSlot(key.to_string()))?;
        if !slot.avail {
            warn!("Rejected {} slot {} on {}", slot.status, slot.display, date);
            return Err(AppointmentError::SlotUnavailable {
                label: slot.display.clone(),
                status: slot.status.clone(),
            });
        }

        debug!("Slot selected: {} on {}", slot.display, date);
        step.time_slot = Some(slot.display.clone());
        Ok(())
    }

    pub fn confirm_slot(&mut self) -> Result<(), AppointmentError> {
        let kind = self.step.kind();
        let WizardStep::Slots(step) = &self.step else {
            return Err(invalid(kind, "confirm_slot"));
        };
        let date = step.date.ok_or(AppointmentError::DateNotSelected)?;
        let time_slot = step.time_slot.clone().ok_or(AppointmentError::SlotNotSelected)?;

        info!("Slot confirmed: {} {}", date, time_slot);
        self.step = WizardStep::Payment(PaymentStep {
            location: step.location.clone(),
            hospital: step.hospital.clone(),
            doctors: step.doctors.clone(),
            doctor: step.doctor.clone(),
            schedule: step.schedule.ready().cloned(),
            date,
            time_slot,
            payment_proof: None,
            submitting: false,
            last_error: None,
        });
        Ok(())
    }

    // --------------------------------------------------------------------------
    // Payment and submission
    // --------------------------------------------------------------------------

    pub fn set_consultation_type(&mut self, consultation_type: ConsultationType) -> Result<(), AppointmentError> {
        if let WizardStep::Pending(_) = self.step {
            return Err(invalid(StepKind::Pending, "set_consultation_type"));
        }
        self.consultation_type = consultation_type;
        Ok(())
    }

    pub fn set_symptoms(&mut self, symptoms: &str) -> Result<(), AppointmentError> {
        if let WizardStep::Pending(_) = self.step {
            return Err(invalid(StepKind::Pending, "set_symptoms"));
        }
        self.symptoms = symptoms.to_string();
        Ok(())
    }

    pub fn attach_payment_proof(&mut self, proof: PaymentProof) -> Result<(), AppointmentError> {
        let kind = self.step.kind();
        let WizardStep::Payment(step) = &mut self.step else {
            return Err(invalid(kind, "attach_payment_proof"));
        };
        if proof.is_empty() {
            return Err(AppointmentError::MissingPaymentProof);
        }

        debug!("Payment proof attached: {:?}", proof);
        step.payment_proof = Some(proof);
        Ok(())
    }

    pub fn clear_payment_proof(&mut self) -> Result<(), AppointmentError> {
        let kind = self.step.kind();
        let WizardStep::Payment(step) = &mut self.step else {
            return Err(invalid(kind, "clear_payment_proof"));
        };
        step.payment_proof = None;
        Ok(())
    }

    /// Resolves the booking request and marks the payment step as submitting.
    ///
    /// Fails without side effects when the proof is missing or either party has no
    /// usable identifier, so nothing is sent in those cases.
    pub fn prepare_submission(&mut self) -> Result<BookingSubmission, AppointmentError> {
        let kind = self.step.kind();
        let is_emergency = self.emergency.is_emergency();
        let WizardStep::Payment(step) = &mut self.step else {
            return Err(invalid(kind, "submit"));
        };
        if step.submitting {
            return Err(AppointmentError::SubmissionInProgress);
        }

        let payment_proof = step
            .payment_proof
            .clone()
            .ok_or(AppointmentError::MissingPaymentProof)?;
        let doctor_id = step
            .doctor
            .resolved_identifier()
            .ok_or(AppointmentError::MissingIdentifier("doctor"))?;
        let hospital_id = step
            .hospital
            .resolved_identifier()
            .ok_or(AppointmentError::MissingIdentifier("hospital"))?;

        step.submitting = true;
        step.last_error = None;

        Ok(BookingSubmission {
            doctor_id,
            hospital_id,
            date: step.date,
            time_slot: step.time_slot.clone(),
            consultation_type: self.consultation_type,
            symptoms: self.symptoms.clone(),
            payment_proof,
            booking_reference: self.reference.clone(),
            is_emergency,
        })
    }

    /// Applies the booking API's answer. A failure keeps every payment field so the
    /// user can retry.
    pub fn complete_submission(
        &mut self,
        result: Result<BookingConfirmation, AppError>,
    ) -> Result<(), AppointmentError> {
        let kind = self.step.kind();
        let WizardStep::Payment(step) = &mut self.step else {
            return Err(invalid(kind, "complete_submission"));
        };
        if !step.submitting {
            return Err(invalid(kind, "complete_submission"));
        }

        match result {
            Ok(confirmation) => {
                step.submitting = false;
                let selection = self.selection();
                info!(
                    "Booking {} submitted, server reference {:?}",
                    selection.booking_reference, confirmation.booking_reference
                );
                self.step = WizardStep::Pending(Box::new(PendingStep {
                    selection,
                    confirmation,
                }));
                Ok(())
            }
            Err(e) => {
                let detail = e.user_message().to_string();
                error!("Booking submission failed: {}", e);
                step.submitting = false;
                step.last_error = Some(detail.clone());
                Err(AppointmentError::SubmissionFailed(detail))
            }
        }
    }

    // --------------------------------------------------------------------------
    // Navigation
    // --------------------------------------------------------------------------

    /// Returns to the previous step. In-flight loads for the step being left are
    /// abandoned. Leaving an emergency payment step reloads the doctor's schedule.
    pub fn back(&mut self) -> Result<Option<FetchRequest>, AppointmentError> {
        let kind = self.step.kind();
        let refetch = match &self.step {
            WizardStep::Location(_) | WizardStep::Pending(_) => return Err(invalid(kind, "back")),
            WizardStep::Payment(step) if step.submitting => {
                return Err(AppointmentError::SubmissionInProgress)
            }
            WizardStep::Payment(step) if step.schedule.is_none() => {
                Some(schedule_target(&step.doctor, &step.hospital)?)
            }
            _ => None,
        };

        let mut request = None;
        let previous = std::mem::replace(&mut self.step, WizardStep::Location(LocationStep::default()));
        self.step = match previous {
            WizardStep::Hospitals(step) => WizardStep::Location(LocationStep {
                query: step.location.as_ref().map(|l| l.display.clone()).unwrap_or_default(),
                suggestions: Vec::new(),
                selected: step.location,
            }),
            WizardStep::Doctors(step) => {
                self.tickets.cancel(FetchKind::Doctors);
                WizardStep::Hospitals(HospitalStep {
                    location: step.location,
                })
            }
            WizardStep::Slots(step) => {
                self.tickets.cancel(FetchKind::Schedule);
                WizardStep::Doctors(DoctorStep {
                    location: step.location,
                    hospital: step.hospital,
                    doctors: Loadable::Ready(step.doctors),
                })
            }
            WizardStep::Payment(step) => {
                let (schedule, date, time_slot) = match step.schedule {
                    Some(days) => (Loadable::Ready(days), Some(step.date), Some(step.time_slot)),
                    None => {
                        request = refetch.map(|target| self.issue(target));
                        (Loadable::Loading, None, None)
                    }
                };
                WizardStep::Slots(SlotStep {
                    location: step.location,
                    hospital: step.hospital,
                    doctors: step.doctors,
                    doctor: step.doctor,
                    schedule,
                    date,
                    time_slot,
                })
            }
            other => other,
        };

        info!("Moved back from {} to {}", kind, self.step.kind());
        Ok(request)
    }

    /// Starts a new booking: fresh reference, cleared selection, location step.
    /// The hospital catalog is kept; emergency shortcuts do not apply again.
    pub fn reset(&mut self) {
        self.tickets.cancel(FetchKind::Doctors);
        self.tickets.cancel(FetchKind::Schedule);
        self.step = WizardStep::Location(LocationStep::default());
        self.consultation_type = ConsultationType::default();
        self.symptoms.clear();
        self.reference = BookingReference::generate();
        self.emergency = EmergencyPreselection::default();
        info!("Booking wizard reset, new reference {}", self.reference);
    }

    // --------------------------------------------------------------------------
    // Remote results
    // --------------------------------------------------------------------------

    /// Applies a finished fetch. Results whose ticket is no longer outstanding are
    /// discarded. May return a follow-up fetch when an emergency shortcut fires.
    pub fn apply_fetch(&mut self, ticket: u64, outcome: FetchOutcome) -> Option<FetchRequest> {
        let kind = outcome.kind();
        if !self.tickets.redeem(kind, ticket) {
            warn!("Discarding stale {} result (ticket {})", kind, ticket);
            return None;
        }

        match outcome {
            FetchOutcome::Hospitals(result) => {
                self.hospitals = Loadable::Ready(loaded_or_empty(kind, result));
                self.apply_emergency_hospital()
            }
            FetchOutcome::Doctors(result) => {
                let doctors = loaded_or_empty(kind, result);
                if let WizardStep::Doctors(step) = &mut self.step {
                    step.doctors = Loadable::Ready(doctors);
                }
                self.apply_emergency_doctor();
                None
            }
            FetchOutcome::Schedule(result) => {
                let days = loaded_or_empty(kind, result);
                if let WizardStep::Slots(step) = &mut self.step {
                    if step.date.is_none() {
                        step.date = ScheduleFlattener::first_available_date(&days);
                    }
                    step.schedule = Loadable::Ready(days);
                }
                None
            }
        }
    }

    fn apply_emergency_hospital(&mut self) -> Option<FetchRequest> {
        if !matches!(self.step, WizardStep::Hospitals(_)) {
            return None;
        }
        let Loadable::Ready(hospitals) = &self.hospitals else {
            return None;
        };
        let hospital = self.emergency.hospital_to_select(hospitals)?.clone();

        match self.select_hospital(hospital) {
            Ok(request) => Some(request),
            Err(e) => {
                warn!("Emergency hospital could not be selected: {}", e);
                None
            }
        }
    }

    fn apply_emergency_doctor(&mut self) {
        let WizardStep::Doctors(step) = &self.step else {
            return;
        };
        let Loadable::Ready(doctors) = &step.doctors else {
            return;
        };
        let Some(doctor) = self.emergency.doctor_to_select(&step.hospital, doctors) else {
            return;
        };

        let today = (self.today)();
        let payment = PaymentStep {
            location: step.location.clone(),
            hospital: step.hospital.clone(),
            doctors: doctors.clone(),
            doctor: doctor.clone(),
            schedule: None,
            date: today,
            time_slot: EMERGENCY_SLOT_LABEL.to_string(),
            payment_proof: None,
            submitting: false,
            last_error: None,
        };

        info!("Emergency booking moved straight to payment for {}", today);
        self.step = WizardStep::Payment(payment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn hospitals() -> Vec<Hospital> {
        serde_json::from_value(json!([
            { "id": 1, "hospital_unique_id": "HSP-0001", "user": { "id": 1001 },
              "hospital_name": "Bir Hospital", "city": "Kathmandu", "district": "Kathmandu",
              "province": "Bagmati Province" },
            { "id": 2, "hospital_unique_id": "HSP-0002", "user": { "id": 1002 },
              "hospital_name": "BP Koirala Institute", "city": "Dharan", "district": "Sunsari",
              "province": "Koshi Province" },
            { "id": 3, "hospital_name": "Community Clinic" }
        ]))
        .unwrap()
    }

    fn doctors(first_id: u64) -> Vec<Doctor> {
        serde_json::from_value(json!([
            { "id": first_id, "user": { "id": 2000 + first_id, "first_name": "Asha", "last_name": "Karki" } },
            { "id": first_id + 1, "user": { "id": 2001 + first_id, "first_name": "Bikash", "last_name": "Rai" } }
        ]))
        .unwrap()
    }

    fn schedule() -> Vec<ScheduleDay> {
        serde_json::from_value(json!([
            { "date": "2025-06-01", "sessions": [
                { "type": "offline", "name": "Morning", "slots": [
                    { "id": 1, "time": "09:00-09:10", "status": "booked" }
                ] }
            ] },
            { "date": "2025-06-02", "sessions": [
                { "type": "offline", "name": "Morning", "slots": [
                    { "id": 2, "time": "09:00-09:10", "status": "booked" },
                    { "id": 3, "time": "09:10-09:20" }
                ] },
                { "type": "break", "name": "Lunch", "slots": [ { "id": 4, "time": "12:00-13:00" } ] }
            ] }
        ]))
        .unwrap()
    }

    fn loaded_wizard(params: EmergencyParams) -> (BookingWizard, Option<FetchRequest>) {
        let mut wizard = BookingWizard::new(params).with_clock(today);
        let request = wizard.start();
        let follow_up = wizard.apply_fetch(request.ticket, FetchOutcome::Hospitals(Ok(hospitals())));
        (wizard, follow_up)
    }

    fn at_slots() -> BookingWizard {
        let (mut wizard, _) = loaded_wizard(EmergencyParams::default());
        wizard.set_location_query("Kathman").unwrap();
        let WizardStep::Location(step) = wizard.step().clone() else {
            panic!("not on location")
        };
        wizard.choose_location(step.suggestions[0].clone()).unwrap();
        wizard.confirm_location().unwrap();

        let request = wizard.select_hospital(hospitals()[0].clone()).unwrap();
        wizard.apply_fetch(request.ticket, FetchOutcome::Doctors(Ok(doctors(10))));
        let request = wizard.select_doctor(doctors(10)[0].clone()).unwrap();
        wizard.apply_fetch(request.ticket, FetchOutcome::Schedule(Ok(schedule())));
        wizard
    }

    #[test]
    fn location_confirmation_requires_a_choice() {
        let (mut wizard, _) = loaded_wizard(EmergencyParams::default());
        wizard.set_location_query("K").unwrap();
        assert_matches!(wizard.step(), WizardStep::Location(step) if step.suggestions.is_empty());
        assert_eq!(wizard.confirm_location(), Err(AppointmentError::LocationNotSelected));
        assert!(!wizard.can_confirm_location());
    }

    #[test]
    fn editing_the_query_drops_the_choice() {
        let (mut wizard, _) = loaded_wizard(EmergencyParams::default());
        wizard.choose_location(LocationMatch::new("Dharan", "Sunsari", "Koshi Province")).unwrap();
        assert!(wizard.can_confirm_location());
        wizard.set_location_query("Dhar").unwrap();
        assert!(!wizard.can_confirm_location());
    }

    #[test]
    fn hospitals_are_filtered_by_location() {
        let (mut wizard, _) = loaded_wizard(EmergencyParams::default());
        wizard.choose_location(LocationMatch::new("Dharan", "Sunsari", "Koshi Province")).unwrap();
        wizard.confirm_location().unwrap();

        let names: Vec<&str> = wizard
            .visible_hospitals()
            .iter()
            .map(|h| h.hospital_name.as_str())
            .collect();
        assert_eq!(names, vec!["BP Koirala Institute", "Community Clinic"]);
    }

    #[test]
    fn schedule_load_selects_first_available_date() {
        let wizard = at_slots();
        assert_eq!(wizard.step_kind(), StepKind::Slots);
        assert_eq!(
            wizard.selectable_dates(),
            vec![today(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()]
        );
        assert_matches!(wizard.step(), WizardStep::Slots(step) if step.date == NaiveDate::from_ymd_opt(2025, 6, 2));
        let slots = wizard.flat_slots();
        assert_eq!(slots.len(), 3);
        assert_eq!(wizard.slot_legend().on_break, 1);
    }

    #[test]
    fn unavailable_slots_are_rejected() {
        let mut wizard = at_slots();
        assert_matches!(
            wizard.select_slot("09:00-09:10"),
            Err(AppointmentError::SlotUnavailable { .. })
        );
        assert_matches!(wizard.select_slot("4"), Err(AppointmentError::SlotUnavailable { .. }));
        assert_eq!(
            wizard.select_slot("nope"),
            Err(AppointmentError::UnknownSlot("nope".to_string()))
        );
        assert_eq!(wizard.confirm_slot(), Err(AppointmentError::SlotNotSelected));

        wizard.select_slot("3").unwrap();
        assert!(wizard.can_confirm_slot());
        assert_eq!(wizard.selection().time_slot_label.as_deref(), Some("09:10-09:20"));
    }

    #[test]
    fn changing_date_clears_slot_and_window_is_enforced() {
        let mut wizard = at_slots();
        wizard.select_slot("09:10-09:20").unwrap();
        wizard.select_date(today()).unwrap();
        assert!(!wizard.can_confirm_slot());

        let outside = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(wizard.select_date(outside), Err(AppointmentError::DateOutsideWindow(outside)));
    }

    #[test]
    fn submission_requires_proof_and_keeps_state_on_failure() {
        let mut wizard = at_slots();
        wizard.select_slot("09:10-09:20").unwrap();
        wizard.confirm_slot().unwrap();
        assert_eq!(wizard.prepare_submission(), Err(AppointmentError::MissingPaymentProof));
        assert_eq!(wizard.step_kind(), StepKind::Payment);

        wizard.set_consultation_type(ConsultationType::Online).unwrap();
        wizard.attach_payment_proof(PaymentProof::new("receipt.png", vec![1, 2])).unwrap();
        let submission = wizard.prepare_submission().unwrap();
        assert_eq!(submission.doctor_id, "10");
        assert_eq!(submission.hospital_id, "1");
        assert_eq!(submission.time_slot, "09:10-09:20");
        assert!(!submission.is_emergency);
        assert_eq!(wizard.prepare_submission(), Err(AppointmentError::SubmissionInProgress));

        let failed = wizard.complete_submission(Err(AppError::BadRequest("Slot already taken".to_string())));
        assert_eq!(failed, Err(AppointmentError::SubmissionFailed("Slot already taken".to_string())));
        assert_eq!(wizard.step_kind(), StepKind::Payment);
        assert_eq!(wizard.last_error(), Some("Slot already taken"));
        assert!(wizard.can_submit());
        assert_eq!(wizard.consultation_type(), ConsultationType::Online);

        wizard.prepare_submission().unwrap();
        wizard.complete_submission(Ok(BookingConfirmation::default())).unwrap();
        assert_eq!(wizard.step_kind(), StepKind::Pending);
        let summary = wizard.selection();
        assert_eq!(summary.time_slot_label.as_deref(), Some("09:10-09:20"));
        assert!(summary.payment_proof.is_some());
        assert_matches!(wizard.back(), Err(AppointmentError::InvalidTransition { .. }));
    }

    #[test]
    fn back_discards_in_flight_doctor_load() {
        let (mut wizard, _) = loaded_wizard(EmergencyParams::default());
        wizard.choose_location(LocationMatch::new("Kathmandu", "Kathmandu", "Bagmati Province")).unwrap();
        wizard.confirm_location().unwrap();
        let request = wizard.select_hospital(hospitals()[0].clone()).unwrap();

        assert_eq!(wizard.back(), Ok(None));
        assert_eq!(wizard.step_kind(), StepKind::Hospitals);
        assert!(wizard.apply_fetch(request.ticket, FetchOutcome::Doctors(Ok(doctors(10)))).is_none());
        assert_eq!(wizard.step_kind(), StepKind::Hospitals);
        assert!(wizard.doctors().is_empty());

        wizard.back().unwrap();
        assert_matches!(wizard.step(), WizardStep::Location(step) if step.selected.is_some());
    }

    fn at_doctors() -> BookingWizard {
        let (mut wizard, _) = loaded_wizard(EmergencyParams::default());
        wizard.choose_location(LocationMatch::new("Kathmandu", "Kathmandu", "Bagmati Province")).unwrap();
        wizard.confirm_location().unwrap();
        let request = wizard.select_hospital(hospitals()[0].clone()).unwrap();
        wizard.apply_fetch(request.ticket, FetchOutcome::Doctors(Ok(doctors(10))));
        wizard
    }

    #[test]
    fn late_schedule_for_previous_doctor_is_discarded() {
        let mut wizard = at_doctors();
        let first = wizard.select_doctor(doctors(10)[0].clone()).unwrap();
        wizard.back().unwrap();
        let second = wizard.select_doctor(doctors(10)[1].clone()).unwrap();
        assert_eq!(
            second.target,
            FetchTarget::DoctorSchedule { doctor_id: "11".to_string(), hospital_id: "1".to_string() }
        );

        assert!(wizard.apply_fetch(first.ticket, FetchOutcome::Schedule(Ok(schedule()))).is_none());
        assert!(wizard.is_loading());
        assert!(wizard.selectable_dates().is_empty());

        let later: Vec<ScheduleDay> = serde_json::from_value(json!([
            { "date": "2025-06-05", "sessions": [
                { "type": "offline", "name": "Morning", "slots": [ { "id": 9, "time": "10:00-10:10" } ] }
            ] }
        ]))
        .unwrap();
        wizard.apply_fetch(second.ticket, FetchOutcome::Schedule(Ok(later)));
        assert!(!wizard.is_loading());
        assert_eq!(wizard.selectable_dates(), vec![NaiveDate::from_ymd_opt(2025, 6, 5).unwrap()]);
        assert_matches!(wizard.step(), WizardStep::Slots(step) if step.doctor.id == "11");
    }

    #[test]
    fn shared_slot_label_selects_the_available_session() {
        let mut wizard = at_doctors();
        let request = wizard.select_doctor(doctors(10)[0].clone()).unwrap();
        let days: Vec<ScheduleDay> = serde_json::from_value(json!([
            { "date": "2025-06-03", "sessions": [
                { "type": "online", "name": "Online", "slots": [ { "id": 30, "time": "09:00", "status": "booked" } ] },
                { "type": "offline", "name": "Walk-in", "slots": [ { "id": 31, "time": "09:00", "status": "available" } ] }
            ] }
        ]))
        .unwrap();
        wizard.apply_fetch(request.ticket, FetchOutcome::Schedule(Ok(days)));

        wizard.select_slot("09:00").unwrap();
        assert!(wizard.can_confirm_slot());
        assert_matches!(wizard.select_slot("30"), Err(AppointmentError::SlotUnavailable { .. }));
    }

    #[test]
    fn failed_fetch_collapses_to_empty_list() {
        let (mut wizard, _) = loaded_wizard(EmergencyParams::default());
        wizard.choose_location(LocationMatch::new("Kathmandu", "Kathmandu", "Bagmati Province")).unwrap();
        wizard.confirm_location().unwrap();
        let request = wizard.select_hospital(hospitals()[0].clone()).unwrap();
        wizard.apply_fetch(
            request.ticket,
            FetchOutcome::Doctors(Err(AppError::Network("connection reset".to_string()))),
        );

        assert_eq!(wizard.step_kind(), StepKind::Doctors);
        assert!(!wizard.is_loading());
        assert!(wizard.doctors().is_empty());
    }

    #[test]
    fn emergency_without_doctor_picks_first_doctor() {
        let (mut wizard, follow_up) = loaded_wizard(EmergencyParams::new(true, Some("HSP-0002"), None));
        let request = follow_up.expect("doctor fetch for the emergency hospital");
        assert_eq!(
            request.target,
            FetchTarget::HospitalDoctors { hospital_id: "2".to_string() }
        );

        wizard.apply_fetch(request.ticket, FetchOutcome::Doctors(Ok(doctors(20))));
        let WizardStep::Payment(step) = wizard.step() else { panic!("expected payment") };
        assert_eq!(step.doctor.id, "20");
        assert_eq!(step.date, today());
        assert_eq!(step.time_slot, EMERGENCY_SLOT_LABEL);
        assert!(wizard.is_emergency());
    }

    #[test]
    fn emergency_back_reloads_schedule_without_refiring() {
        let (mut wizard, follow_up) =
            loaded_wizard(EmergencyParams::new(true, Some("1001"), Some("2011")));
        let request = follow_up.unwrap();
        wizard.apply_fetch(request.ticket, FetchOutcome::Doctors(Ok(doctors(10))));
        assert_matches!(wizard.step(), WizardStep::Payment(step) if step.doctor.id == "11");

        let request = wizard.back().unwrap().expect("schedule reload");
        assert_eq!(
            request.target,
            FetchTarget::DoctorSchedule { doctor_id: "11".to_string(), hospital_id: "1".to_string() }
        );
        wizard.apply_fetch(request.ticket, FetchOutcome::Schedule(Ok(schedule())));
        assert!(!wizard.can_confirm_slot());

        wizard.back().unwrap();
        assert_eq!(wizard.step_kind(), StepKind::Doctors);
        assert_eq!(wizard.doctors().len(), 2);
    }

    #[test]
    fn emergency_hospital_is_not_picked_after_leaving_the_step() {
        let mut wizard = BookingWizard::new(EmergencyParams::new(true, Some("HSP-0002"), None)).with_clock(today);
        let request = wizard.start();
        assert_eq!(wizard.step_kind(), StepKind::Hospitals);
        wizard.back().unwrap();

        let follow_up = wizard.apply_fetch(request.ticket, FetchOutcome::Hospitals(Ok(hospitals())));
        assert!(follow_up.is_none());
        assert_eq!(wizard.step_kind(), StepKind::Location);
        assert!(wizard.selection().hospital.is_none());
    }

    #[test]
    fn emergency_miss_falls_back_to_manual_flow() {
        let (wizard, follow_up) = loaded_wizard(EmergencyParams::new(true, Some("HSP-9999"), None));
        assert!(follow_up.is_none());
        assert_eq!(wizard.step_kind(), StepKind::Hospitals);
        assert_eq!(wizard.visible_hospitals().len(), 3);
    }

    #[test]
    fn reset_starts_over_with_a_new_reference() {
        let mut wizard = at_slots();
        wizard.set_symptoms("fever").unwrap();
        let before = wizard.reference().clone();

        wizard.reset();
        assert_eq!(wizard.step_kind(), StepKind::Location);
        assert_eq!(wizard.progress(), (1, 6));
        assert_eq!(wizard.symptoms(), "");
        assert_ne!(wizard.reference(), &before);
        assert!(matches!(wizard.hospitals(), Loadable::Ready(list) if list.len() == 3));
    }
}
