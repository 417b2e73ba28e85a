use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Percentage exceeded for {field} of installment {installment_number}: {value} is above 100")]
    PercentageExceeded {
        installment_number: u32,
        field: &'static str,
        value: u32,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
