use std::sync::Arc;

use async_trait::async_trait;
use auth::CredentialVerifier;
use chrono::Utc;

use crate::account::errors::LoginError;
use crate::account::models::classify_identifier;
use crate::account::models::IdentifierKind;
use crate::account::models::LoginAttempt;
use crate::account::models::LoginMode;
use crate::account::models::LoginQuery;
use crate::account::models::Profile;
use crate::account::ports::AccountRepository;
use crate::account::ports::AuthenticatorPort;

/// Concrete implementation of AuthenticatorPort.
///
/// Orchestrates identifier classification, account resolution, and
/// credential verification into one login decision. Generic over the
/// repository for testability.
pub struct Authenticator<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    verifier: CredentialVerifier,
}

impl<AR> Authenticator<AR>
where
    AR: AccountRepository,
{
    pub fn new(repository: Arc<AR>) -> Self {
        Self {
            repository,
            verifier: CredentialVerifier::new(),
        }
    }
}

#[async_trait]
impl<AR> AuthenticatorPort for Authenticator<AR>
where
    AR: AccountRepository,
{
    async fn authenticate(&self, attempt: LoginAttempt) -> Result<Profile, LoginError> {
        let identifier = attempt.identifier.trim();
        if identifier.is_empty() {
            return Err(LoginError::InvalidIdentifier);
        }

        // The admin form only accepts an e-mail address; a digit string is
        // malformed for that mode and never reaches storage.
        if attempt.mode == LoginMode::Admin
            && classify_identifier(identifier) == IdentifierKind::MedicalId
        {
            return Err(LoginError::InvalidIdentifier);
        }

        let query = LoginQuery::for_mode(identifier, attempt.mode);
        let account = self
            .repository
            .find_by_login(&query)
            .await?
            .ok_or(LoginError::AccountNotFound(attempt.mode))?;

        match attempt.mode {
            LoginMode::Admin => {
                if !account.is_admin {
                    return Err(LoginError::RoleMismatch {
                        attempted: LoginMode::Admin,
                    });
                }

                let password = attempt
                    .password
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .ok_or(LoginError::MissingPassword)?;

                // An admin account without a stored hash can never verify.
                let verified = self
                    .verifier
                    .verify_against(password, account.password_hash.as_deref())?;
                if !verified {
                    return Err(LoginError::InvalidCredentials);
                }
            }
            LoginMode::User => {
                if account.is_admin {
                    return Err(LoginError::RoleMismatch {
                        attempted: LoginMode::User,
                    });
                }
            }
        }

        let now = Utc::now();
        self.repository.update_last_login(&account.id, now).await?;

        tracing::info!(
            account_id = %account.id,
            mode = %attempt.mode,
            "Login succeeded"
        );

        Ok(account.profile())
    }
}
