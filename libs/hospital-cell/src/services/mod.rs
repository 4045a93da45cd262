pub mod filter;
pub mod hospital;

pub use filter::HospitalFilter;
pub use hospital::HospitalService;
