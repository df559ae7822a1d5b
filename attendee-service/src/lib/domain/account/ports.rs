use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::errors::LoginError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::LoginAttempt;
use crate::account::models::LoginQuery;
use crate::account::models::Profile;

/// Port for the login decision.
#[async_trait]
pub trait AuthenticatorPort: Send + Sync + 'static {
    /// Decide a single login attempt.
    ///
    /// Resolves the identifier to at most one account for the attempt's
    /// mode, enforces the mode's authentication requirements, and records
    /// the login timestamp on success.
    ///
    /// # Returns
    /// Sanitized profile of the authenticated account
    ///
    /// # Errors
    /// * `InvalidIdentifier` - Empty or whitespace-only identifier
    /// * `AccountNotFound` - No account resolves from the identifier
    /// * `RoleMismatch` - Account's role does not match the form used
    /// * `MissingPassword` - Admin attempt without a password
    /// * `InvalidCredentials` - Admin password check failed
    /// * `Storage` - Account storage unavailable
    async fn authenticate(&self, attempt: LoginAttempt) -> Result<Profile, LoginError>;
}

/// Persistence operations for the account aggregate.
///
/// The storage layer owns the uniqueness of email and medical ID; the
/// resolver never re-checks it and relies on at-most-one-row answers.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `MedicalIdAlreadyExists` - Medical ID is already registered
    /// * `Database` - Storage operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve an account by identifier.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    /// Resolve a login query to at most one account.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn find_by_login(&self, query: &LoginQuery) -> Result<Option<Account>, AccountError>;

    /// Record a successful login timestamp.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Database` - Storage operation failed
    async fn update_last_login(
        &self,
        id: &AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), AccountError>;
}
