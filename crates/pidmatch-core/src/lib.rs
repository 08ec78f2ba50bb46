pub mod config;
pub mod error;
pub mod models;

pub use config::{CascadeConfig, LoggingConfig, MatchConfig};
pub use error::{CoreError, Result};
pub use models::*;
