use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::models::LoginQuery;
use crate::account::models::MedicalId;
use crate::account::ports::AccountRepository;

const ACCOUNT_COLUMNS: &str =
    "id, name, email, medical_id, is_admin, password_hash, last_login_at, created_at";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn account_from_row(row: &PgRow) -> Result<Account, AccountError> {
        let medical_id: Option<String> = row
            .try_get("medical_id")
            .map_err(|e| AccountError::Database(e.to_string()))?;

        Ok(Account {
            id: AccountId(
                row.try_get("id")
                    .map_err(|e| AccountError::Database(e.to_string()))?,
            ),
            name: row
                .try_get("name")
                .map_err(|e| AccountError::Database(e.to_string()))?,
            email: EmailAddress::new(
                row.try_get("email")
                    .map_err(|e| AccountError::Database(e.to_string()))?,
            )?,
            medical_id: medical_id.map(MedicalId::new).transpose()?,
            is_admin: row
                .try_get("is_admin")
                .map_err(|e| AccountError::Database(e.to_string()))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| AccountError::Database(e.to_string()))?,
            last_login_at: row
                .try_get("last_login_at")
                .map_err(|e| AccountError::Database(e.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| AccountError::Database(e.to_string()))?,
        })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, name, email, medical_id, is_admin, password_hash, last_login_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id.0)
        .bind(&account.name)
        .bind(account.email.as_str())
        .bind(account.medical_id.as_ref().map(|m| m.as_str()))
        .bind(account.is_admin)
        .bind(account.password_hash.as_deref())
        .bind(account.last_login_at)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("accounts_email_key") {
                        return AccountError::EmailAlreadyExists(
                            account.email.as_str().to_string(),
                        );
                    }
                    if db_err.constraint() == Some("accounts_medical_id_key") {
                        let medical_id = account
                            .medical_id
                            .as_ref()
                            .map(|m| m.as_str().to_string())
                            .unwrap_or_default();
                        return AccountError::MedicalIdAlreadyExists(medical_id);
                    }
                }
            }
            AccountError::Database(e.to_string())
        })?;

        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::Database(e.to_string()))?;

        row.as_ref().map(Self::account_from_row).transpose()
    }

    async fn find_by_login(&self, query: &LoginQuery) -> Result<Option<Account>, AccountError> {
        // Uniqueness of both columns is enforced by the schema; LIMIT 1 is
        // the single-row guarantee for the OR arm, not a re-check.
        let row = match query {
            LoginQuery::ByEmail(email) => {
                sqlx::query(&format!(
                    "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
                ))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
            }
            LoginQuery::ByEmailOrMedicalId { email, medical_id } => {
                sqlx::query(&format!(
                    "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1 OR medical_id = $2 LIMIT 1"
                ))
                .bind(email)
                .bind(medical_id)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(|e| AccountError::Database(e.to_string()))?;

        row.as_ref().map(Self::account_from_row).transpose()
    }

    async fn update_last_login(
        &self,
        id: &AccountId,
        at: DateTime<Utc>,
    ) -> Result<(), AccountError> {
        let result = sqlx::query("UPDATE accounts SET last_login_at = $2 WHERE id = $1")
            .bind(id.0)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| AccountError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
