use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;
use attendee_service::account::errors::AccountError;
use attendee_service::account::models::Account;
use attendee_service::account::models::AccountId;
use attendee_service::account::models::EmailAddress;
use attendee_service::account::models::LoginQuery;
use attendee_service::account::models::MedicalId;
use attendee_service::account::ports::AccountRepository;
use attendee_service::domain::account::service::Authenticator;
use attendee_service::inbound::http::router::create_router;
use auth::CredentialVerifier;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use chrono::DateTime;
use chrono::Utc;

/// In-memory stand-in for the account store, mirroring its uniqueness
/// constraints so the login flow can be exercised without Postgres.
pub struct InMemoryAccountRepository {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountRepository {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    pub fn get(&self, id: &AccountId) -> Option<Account> {
        self.accounts
            .read()
            .unwrap()
            .iter()
            .find(|a| a.id == *id)
            .cloned()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AccountError::EmailAlreadyExists(
                account.email.as_str().to_string(),
            ));
        }
        if account.medical_id.is_some()
            && accounts
                .iter()
                .any(|a| a.medical_id == account.medical_id)
        {
            let medical_id = account
                .medical_id
                .as_ref()
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            return Err(AccountError::MedicalIdAlreadyExists(medical_id));
        }
        accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        Ok(self.get(id))
    }

    async fn find_by_login(&self, query: &LoginQuery) -> Result<Option<Account>, AccountError> {
        let accounts = self.accounts.read().unwrap();
        let found = match query {
            LoginQuery::ByEmail(email) => accounts
                .iter()
                .find(|a| a.email.as_str() == email.as_str()),
            LoginQuery::ByEmailOrMedicalId { email, medical_id } => accounts.iter().find(|a| {
                a.email.as_str() == email.as_str()
                    || a.medical_id
                        .as_ref()
                        .is_some_and(|m| m.as_str() == medical_id.as_str())
            }),
        };
        Ok(found.cloned())
    }

    async fn update_last_login(
        &self,
        id: &AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;
        account.last_login_at = Some(at);
        Ok(())
    }
}

pub fn admin_account(email: &str, password: &str) -> Account {
    let verifier = CredentialVerifier::new();
    Account {
        id: AccountId::new(),
        name: "Portal Admin".to_string(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        medical_id: None,
        is_admin: true,
        password_hash: Some(verifier.hash(password).unwrap()),
        last_login_at: None,
        created_at: Utc::now(),
    }
}

pub fn attendee_account(name: &str, email: &str, medical_id: &str) -> Account {
    Account {
        id: AccountId::new(),
        name: name.to_string(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        medical_id: Some(MedicalId::new(medical_id.to_string()).unwrap()),
        is_admin: false,
        password_hash: None,
        last_login_at: None,
        created_at: Utc::now(),
    }
}

/// Build the real router over an in-memory repository, returning the
/// repository handle so tests can observe persisted effects.
pub fn test_app(accounts: Vec<Account>) -> (Router, Arc<InMemoryAccountRepository>) {
    let repository = Arc::new(InMemoryAccountRepository::new(accounts));
    let authenticator = Arc::new(Authenticator::new(Arc::clone(&repository)));
    (create_router(authenticator), repository)
}

pub fn login_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}
