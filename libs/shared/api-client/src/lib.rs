pub mod client;
pub mod error_detail;

pub use client::PortalApiClient;
pub use error_detail::extract_error_detail;
