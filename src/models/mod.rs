pub mod current_vitals;
pub mod daily_log;
pub mod enums;
pub mod vital_sign;

pub use current_vitals::CurrentVitalsView;
pub use daily_log::{DailyIntake, DailyLogEntry};
pub use vital_sign::VitalsSnapshot;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
