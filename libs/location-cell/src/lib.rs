pub mod gazetteer;
mod gazetteer_data;
pub mod models;
pub mod services;

pub use gazetteer::Gazetteer;
pub use models::*;
pub use services::*;
