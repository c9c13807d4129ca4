use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rentable_market::{AuthError, LedgerError, PrimaryKey, StorageError, UnknownCategory};
use thiserror::Error;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{resource}:{identifier} not found")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("username {0} is already taken")]
    UsernameTaken(String),
    #[error("item {0} is already rented")]
    AlreadyRented(PrimaryKey),
    #[error("{0} is not a known category")]
    UnknownCategory(String),
    #[error("Unknown internal error: {0}")]
    Unknown(String),
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::UsernameTaken(_) => StatusCode::CONFLICT,
            Self::AlreadyRented(_) => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::UnknownCategory(_) => StatusCode::BAD_REQUEST,
            Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.as_status_code(), self.to_string()).into_response()
    }
}

impl From<StorageError> for ServerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound {
                resource,
                identifier,
            } => Self::NotFound {
                resource,
                identifier,
            },
            StorageError::Conflict {
                resource,
                field,
                value,
            } => Self::Conflict {
                resource,
                field,
                value,
            },
            StorageError::Unavailable { item_id } => Self::AlreadyRented(item_id),
            e => Self::Unknown(e.to_string()),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::UsernameTaken(username) => Self::UsernameTaken(username),
            AuthError::Storage(e) => e.into(),
        }
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::AlreadyRented(item_id) => Self::AlreadyRented(item_id),
            LedgerError::Storage(e) => e.into(),
        }
    }
}

impl From<UnknownCategory> for ServerError {
    fn from(value: UnknownCategory) -> Self {
        Self::UnknownCategory(value.0)
    }
}
