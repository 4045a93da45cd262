pub mod backend;
pub mod booking;
pub mod emergency;
pub mod session;
pub mod wizard;

pub use backend::{BookingBackend, HttpBookingBackend};
pub use booking::AppointmentService;
pub use emergency::{EmergencyParams, EmergencyPreselection};
pub use session::BookingSession;
pub use wizard::{
    BookingWizard, Clock, DoctorStep, FetchKind, FetchOutcome, FetchRequest, FetchTarget,
    HospitalStep, Loadable, LocationStep, PaymentStep, PendingStep, SlotStep, WizardStep,
};
