use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportingError {
    #[error("invalid `{field}`: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} is not supported")]
    Unsupported(&'static str),
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl ReportingError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ReportingError::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type ReportingResult<T> = std::result::Result<T, ReportingError>;
