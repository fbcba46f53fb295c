use malaeb_http::error::AppError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("'{time}' is not a bookable time slot")]
    UnknownSlot { time: String },
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::NotFound { .. } => AppError::not_found(message),
            DomainError::UnknownSlot { time } => AppError::validation(
                vec![json!({"field": "time", "error": format!("unknown slot '{time}'")})],
                message,
            ),
            DomainError::Validation { field, reason } => AppError::validation(
                vec![json!({"field": field, "error": reason})],
                message,
            ),
        }
    }
}
