use auth::PasswordError;
use thiserror::Error;

use crate::account::models::LoginMode;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for MedicalId validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MedicalIdError {
    #[error("Medical ID too short: minimum {min} digits, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Medical ID must contain only digits")]
    NotNumeric,
}

/// Top-level error for account persistence operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(#[from] AccountIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid medical ID: {0}")]
    InvalidMedicalId(#[from] MedicalIdError),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Medical ID already exists: {0}")]
    MedicalIdAlreadyExists(String),

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Rejection reasons for a single login attempt.
///
/// Each reason maps to a distinct user-facing message and HTTP status.
/// Not-found and bad-credentials stay distinguishable on the admin path;
/// the resulting account-enumeration signal is an accepted gap, applied
/// uniformly at every call site.
#[derive(Debug, Clone, Error)]
pub enum LoginError {
    #[error("Enter your e-mail address or medical registration number")]
    InvalidIdentifier,

    #[error("{}", not_found_message(.0))]
    AccountNotFound(LoginMode),

    #[error("{}", role_mismatch_message(.attempted))]
    RoleMismatch { attempted: LoginMode },

    #[error("A password is required for administrator sign-in")]
    MissingPassword,

    #[error("Incorrect password")]
    InvalidCredentials,

    #[error("Account storage unavailable: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn not_found_message(mode: &LoginMode) -> &'static str {
    match mode {
        LoginMode::Admin => "No administrator account matches that e-mail address",
        LoginMode::User => "No registration found for that e-mail or medical ID",
    }
}

fn role_mismatch_message(mismatch: &LoginMode) -> &'static str {
    match mismatch {
        // Attempted the admin form with a non-admin account
        LoginMode::Admin => "This account has no administrator access",
        // Attempted the user form with an admin account
        LoginMode::User => "Administrator accounts must use the admin sign-in form",
    }
}

impl From<PasswordError> for LoginError {
    fn from(err: PasswordError) -> Self {
        LoginError::Internal(err.to_string())
    }
}

impl From<AccountError> for LoginError {
    fn from(err: AccountError) -> Self {
        LoginError::Storage(err.to_string())
    }
}
