use serde::Serialize;

/// One field-level failure inside an itemized validation rejection.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub location: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(location: &'static str, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("user not found")]
    NotFound,
    #[error("{0}")]
    Auth(String),
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    #[error("storage failure")]
    Storage(#[source] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
