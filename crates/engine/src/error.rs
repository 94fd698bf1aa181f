//! The module contains the errors the engine can return.
//!
//! - [`ValidationError`] is returned when caller input is rejected before it
//!   reaches the ledger. It always names the offending field.
//! - [`EngineError`] wraps validation failures together with lookup and
//!   store failures.
use sea_orm::DbErr;
use thiserror::Error;

/// Rejection of a candidate record or request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid liters: {0}")]
    InvalidLiters(String),
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("Field \"{field}\" is not allowed for {kind}")]
    UnexpectedField {
        field: &'static str,
        kind: &'static str,
    },
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Name must not be empty")]
    EmptyName,
}

impl ValidationError {
    /// Input field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "amount",
            Self::InvalidLiters(_) => "liters",
            Self::MissingField(field) => field,
            Self::UnexpectedField { field, .. } => field,
            Self::UnknownPlatform(_) => "platform",
            Self::UnknownCategory(_) => "category",
            Self::InvalidRange(_) => "date",
            Self::EmptyName => "name",
        }
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Store(a), Self::Store(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
