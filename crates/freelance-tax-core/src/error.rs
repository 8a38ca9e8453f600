use thiserror::Error;

#[derive(Debug, Error)]
pub enum FreelanceTaxError {
    #[error("Invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid tax configuration: {0}")]
    InvalidConfig(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FreelanceTaxError {
    fn from(e: serde_json::Error) -> Self {
        FreelanceTaxError::SerializationError(e.to_string())
    }
}
