pub mod error;
pub mod identity;

pub use error::AppError;
pub use identity::{find_by_identifier, EntityIds, HasEntityIds};
