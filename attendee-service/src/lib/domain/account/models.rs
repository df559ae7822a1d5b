use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AccountIdError;
use crate::account::errors::EmailError;
use crate::account::errors::MedicalIdError;

/// Account aggregate entity.
///
/// Represents one registered portal account, attendee or administrator.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: EmailAddress,
    pub medical_id: Option<MedicalId>,
    pub is_admin: bool,
    pub password_hash: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Sanitized projection of this account for callers outside the
    /// authentication boundary. Never carries the password hash.
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address value type.
///
/// Normalized at construction: trimmed and lowercased, so two spellings of
/// the same address always compare and query identically. Validated against
/// RFC 5322 via the `email_address` parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Input does not parse as an email address
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Medical registration number value type.
///
/// Trimmed at construction; comparison is exact as entered. Required for
/// every non-admin account and unique across all accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicalId(String);

impl MedicalId {
    pub const MIN_DIGITS: usize = 7;

    /// Create a new validated medical registration number.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 7 digits after trimming
    /// * `NotNumeric` - Contains non-digit characters
    pub fn new(medical_id: String) -> Result<Self, MedicalIdError> {
        let medical_id = medical_id.trim().to_string();
        if !medical_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(MedicalIdError::NotNumeric);
        }
        if medical_id.len() < Self::MIN_DIGITS {
            return Err(MedicalIdError::TooShort {
                min: Self::MIN_DIGITS,
                actual: medical_id.len(),
            });
        }
        Ok(Self(medical_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MedicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Sanitized account projection returned on successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: AccountId,
    pub name: String,
    pub email: EmailAddress,
    pub is_admin: bool,
}

/// Which login form the attempt came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    Admin,
    User,
}

impl fmt::Display for LoginMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginMode::Admin => write!(f, "admin"),
            LoginMode::User => write!(f, "user"),
        }
    }
}

/// Shape classification of a raw login identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Email,
    MedicalId,
}

/// Classify a raw login string as an email or a medical registration number.
///
/// A trimmed string of at least 7 ASCII digits is a medical ID. Everything
/// else, including strings matching neither shape, falls through as an
/// email candidate so resolution fails with a clear not-found instead of a
/// classification error.
pub fn classify_identifier(raw: &str) -> IdentifierKind {
    let trimmed = raw.trim();
    if trimmed.len() >= MedicalId::MIN_DIGITS && trimmed.chars().all(|c| c.is_ascii_digit()) {
        IdentifierKind::MedicalId
    } else {
        IdentifierKind::Email
    }
}

/// Storage query for resolving a login identifier to one account.
///
/// Typed union instead of a conditionally-built filter object: the admin
/// form only ever queries the email field, while the user form tries the
/// same raw identifier against both fields in one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginQuery {
    ByEmail(String),
    ByEmailOrMedicalId { email: String, medical_id: String },
}

impl LoginQuery {
    /// Build the resolution query for an identifier under a login mode.
    ///
    /// The email arm is trimmed and lowercased; the medical-ID arm is
    /// trimmed only, compared exactly as entered. User mode deliberately
    /// skips pre-classification: a numeric string that happens to collide
    /// with an email-shaped value still resolves against the right field.
    pub fn for_mode(identifier: &str, mode: LoginMode) -> Self {
        let trimmed = identifier.trim();
        match mode {
            LoginMode::Admin => LoginQuery::ByEmail(trimmed.to_lowercase()),
            LoginMode::User => LoginQuery::ByEmailOrMedicalId {
                email: trimmed.to_lowercase(),
                medical_id: trimmed.to_string(),
            },
        }
    }
}

/// One login attempt as received from a login form.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    pub identifier: String,
    pub password: Option<String>,
    pub mode: LoginMode,
}

impl LoginAttempt {
    pub fn new(identifier: String, password: Option<String>, mode: LoginMode) -> Self {
        Self {
            identifier,
            password,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalized_to_lowercase_and_trimmed() {
        let email = EmailAddress::new("  Foo.Bar@Example.COM ".to_string()).unwrap();
        assert_eq!(email.as_str(), "foo.bar@example.com");
    }

    #[test]
    fn test_email_rejects_garbage() {
        assert!(EmailAddress::new("not an email".to_string()).is_err());
    }

    #[test]
    fn test_medical_id_trimmed_and_validated() {
        let id = MedicalId::new(" 1234567 ".to_string()).unwrap();
        assert_eq!(id.as_str(), "1234567");

        assert!(matches!(
            MedicalId::new("123456".to_string()),
            Err(MedicalIdError::TooShort { .. })
        ));
        assert!(matches!(
            MedicalId::new("12345a7".to_string()),
            Err(MedicalIdError::NotNumeric)
        ));
    }

    #[test]
    fn test_classify_digit_strings_as_medical_id() {
        assert_eq!(classify_identifier("1234567"), IdentifierKind::MedicalId);
        assert_eq!(classify_identifier("  98765432 "), IdentifierKind::MedicalId);
    }

    #[test]
    fn test_classify_emails_and_everything_else_as_email() {
        assert_eq!(classify_identifier("a@b.com"), IdentifierKind::Email);
        // Too few digits for a medical ID
        assert_eq!(classify_identifier("123456"), IdentifierKind::Email);
        // Matches neither shape: passed through as an email candidate
        assert_eq!(classify_identifier("garbage value"), IdentifierKind::Email);
    }

    #[test]
    fn test_login_query_admin_is_email_only() {
        let query = LoginQuery::for_mode("  Admin@X.com ", LoginMode::Admin);
        assert_eq!(query, LoginQuery::ByEmail("admin@x.com".to_string()));
    }

    #[test]
    fn test_login_query_user_tries_both_fields() {
        let query = LoginQuery::for_mode(" 1234567 ", LoginMode::User);
        assert_eq!(
            query,
            LoginQuery::ByEmailOrMedicalId {
                email: "1234567".to_string(),
                medical_id: "1234567".to_string(),
            }
        );
    }

    #[test]
    fn test_profile_carries_no_hash() {
        let account = Account {
            id: AccountId::new(),
            name: "Dr. Example".to_string(),
            email: EmailAddress::new("doc@example.com".to_string()).unwrap(),
            medical_id: Some(MedicalId::new("1234567".to_string()).unwrap()),
            is_admin: false,
            password_hash: Some("$argon2id$should_not_leak".to_string()),
            last_login_at: None,
            created_at: Utc::now(),
        };

        let profile = account.profile();
        assert_eq!(profile.id, account.id);
        assert_eq!(profile.email, account.email);
        assert!(!profile.is_admin);
    }
}
