use std::fmt;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use doctor_cell::{Doctor, SlotStatus};
use hospital_cell::Hospital;
use location_cell::LocationMatch;
use shared_models::identity::flexible_id;
use shared_models::AppError;

/// Time-slot label recorded for emergency bookings. It is not a schedule slot.
pub const EMERGENCY_SLOT_LABEL: &str = "Emergency - Immediate";

const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const REFERENCE_LEN: usize = 8;

// ==============================================================================
// BOOKING FORM
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationType {
    Online,
    #[default]
    Offline,
}

impl ConsultationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationType::Online => "online",
            ConsultationType::Offline => "offline",
        }
    }
}

impl fmt::Display for ConsultationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-side correlation tag sent with a booking request.
///
/// Not guaranteed unique: the server must assign or deduplicate the authoritative
/// reference, which comes back in [`BookingConfirmation::booking_reference`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingReference(String);

impl BookingReference {
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng>(rng: &mut R) -> Self {
        let token = (0..REFERENCE_LEN)
            .map(|_| REFERENCE_ALPHABET[rng.gen_range(0..REFERENCE_ALPHABET.len())] as char)
            .collect();
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payment screenshot attached on the payment step.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentProof {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PaymentProof {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Reads a screenshot from disk without blocking the caller's runtime thread.
    pub async fn read_from(path: impl AsRef<Path>) -> Result<Self, AppointmentError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppointmentError::ProofUnreadable(format!("{}: {}", path.display(), e)))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "payment-proof".to_string());

        Ok(Self::new(file_name, bytes))
    }

    /// `data:` URL used to preview the screenshot before submitting.
    pub fn preview_data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, BASE64.encode(&self.bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for PaymentProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentProof")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

// ==============================================================================
// WIZARD SNAPSHOTS
// ==============================================================================

/// Steps of the booking wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Location,
    Hospitals,
    Doctors,
    Slots,
    Payment,
    Pending,
}

impl StepKind {
    pub const ALL: [StepKind; 6] = [
        StepKind::Location,
        StepKind::Hospitals,
        StepKind::Doctors,
        StepKind::Slots,
        StepKind::Payment,
        StepKind::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Location => "location",
            StepKind::Hospitals => "hospitals",
            StepKind::Doctors => "doctors",
            StepKind::Slots => "slots",
            StepKind::Payment => "payment",
            StepKind::Pending => "pending",
        }
    }

    /// One-based position for a stepper.
    pub fn position(&self) -> usize {
        StepKind::ALL
            .iter()
            .position(|step| step == self)
            .map_or(0, |index| index + 1)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of everything chosen so far. Fields not reached yet are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSelection {
    pub location: Option<LocationMatch>,
    pub hospital: Option<Hospital>,
    pub doctor: Option<Doctor>,
    pub date: Option<NaiveDate>,
    pub time_slot_label: Option<String>,
    pub consultation_type: ConsultationType,
    pub symptoms: String,
    pub payment_proof: Option<PaymentProof>,
    pub is_emergency: bool,
    pub booking_reference: BookingReference,
}

/// A fully resolved booking request, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSubmission {
    pub doctor_id: String,
    pub hospital_id: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub consultation_type: ConsultationType,
    pub symptoms: String,
    pub payment_proof: PaymentProof,
    pub booking_reference: BookingReference,
    pub is_emergency: bool,
}

impl BookingSubmission {
    /// Text fields of the multipart form, in submission order. The screenshot is
    /// attached separately as `payment_screenshot`.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("doctor", self.doctor_id.clone()),
            ("hospital", self.hospital_id.clone()),
            ("date", self.date.format("%Y-%m-%d").to_string()),
            ("time_slot", self.time_slot.clone()),
            ("consultation_type", self.consultation_type.as_str().to_string()),
            ("symptoms", self.symptoms.clone()),
            ("booking_reference", self.booking_reference.as_str().to_string()),
            ("is_emergency", self.is_emergency.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    #[serde(default, deserialize_with = "flexible_id::optional")]
    pub id: Option<String>,
    #[serde(default)]
    pub booking_reference: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("'{action}' is not available on the {step} step")]
    InvalidTransition { step: StepKind, action: &'static str },

    #[error("No location selected")]
    LocationNotSelected,

    #[error("Still loading {0}")]
    StillLoading(&'static str),

    #[error("Date {0} is outside the schedule window")]
    DateOutsideWindow(NaiveDate),

    #[error("No date selected")]
    DateNotSelected,

    #[error("No time slot selected")]
    SlotNotSelected,

    #[error("Unknown time slot: {0}")]
    UnknownSlot(String),

    #[error("Time slot {label} is not available ({status})")]
    SlotUnavailable { label: String, status: SlotStatus },

    #[error("Please upload the payment screenshot before submitting")]
    MissingPaymentProof,

    #[error("Could not resolve a {0} identifier for this booking")]
    MissingIdentifier(&'static str),

    #[error("A booking request is already being submitted")]
    SubmissionInProgress,

    #[error("Booking failed: {0}")]
    SubmissionFailed(String),

    #[error("Could not read payment proof: {0}")]
    ProofUnreadable(String),

    #[error(transparent)]
    Fetch(#[from] AppError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use serde_json::json;

    #[test]
    fn reference_is_eight_uppercase_alphanumerics() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let reference = BookingReference::generate_with(&mut rng);
            assert_eq!(reference.as_str().len(), 8);
            assert!(reference
                .as_str()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn preview_is_a_data_url() {
        let proof = PaymentProof::new("receipt.PNG", vec![1, 2, 3]);
        assert_eq!(proof.content_type, "image/png");
        assert_eq!(proof.preview_data_url(), "data:image/png;base64,AQID");
        assert_eq!(
            PaymentProof::new("scan", vec![]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn reads_proof_from_disk() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(b"jpeg-bytes").unwrap();

        let proof = tokio_test::block_on(PaymentProof::read_from(file.path())).unwrap();
        assert_eq!(proof.content_type, "image/jpeg");
        assert_eq!(proof.bytes, b"jpeg-bytes");
        assert!(proof.file_name.ends_with(".jpg"));
    }

    #[test]
    fn unreadable_proof_is_reported() {
        let result = tokio_test::block_on(PaymentProof::read_from("/nonexistent/receipt.png"));
        assert!(matches!(result, Err(AppointmentError::ProofUnreadable(_))));
    }

    #[test]
    fn form_fields_carry_label_and_stringified_flag() {
        let submission = BookingSubmission {
            doctor_id: "5".to_string(),
            hospital_id: "HSP-0001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            time_slot: EMERGENCY_SLOT_LABEL.to_string(),
            consultation_type: ConsultationType::default(),
            symptoms: String::new(),
            payment_proof: PaymentProof::new("p.jpg", vec![0]),
            booking_reference: BookingReference("AB12CD34".to_string()),
            is_emergency: true,
        };

        let fields = submission.form_fields();
        assert!(fields.contains(&("date", "2025-06-01".to_string())));
        assert!(fields.contains(&("time_slot", "Emergency - Immediate".to_string())));
        assert!(fields.contains(&("consultation_type", "offline".to_string())));
        assert!(fields.contains(&("is_emergency", "true".to_string())));
    }

    #[test]
    fn confirmation_accepts_numeric_id() {
        let confirmation: BookingConfirmation =
            serde_json::from_value(json!({ "id": 42, "status": "pending" })).unwrap();
        assert_eq!(confirmation.id.as_deref(), Some("42"));
        assert!(confirmation.booking_reference.is_none());
    }

    #[test]
    fn step_positions() {
        assert_eq!(StepKind::Location.position(), 1);
        assert_eq!(StepKind::Pending.position(), 6);
    }
}
