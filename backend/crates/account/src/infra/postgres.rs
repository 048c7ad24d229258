//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use platform::password::HashedPassword;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entity::{
    account::Account, auth_session::AuthSession, session_identity::SessionIdentity,
};
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::{
    AccountId, account_name::AccountName, email::Email, login_status::{CounterUpdate, LoginCounters}, role::Role,
};
use crate::error::{AccessError, AccessResult};

/// PostgreSQL-backed account and session repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// A conditional counter write matched no row: locked, or gone.
    async fn untouched(&self, account_id: &AccountId) -> AccessResult<CounterUpdate> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE account_id = $1)",
        )
        .bind(account_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(if exists {
            CounterUpdate::Locked
        } else {
            CounterUpdate::Missing
        })
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

const ACCOUNT_COLUMNS: &str = r#"
    account_id,
    name,
    email,
    password_hash,
    role,
    failed_logins,
    locked,
    profile_picture,
    created_at,
    updated_at
"#;

impl AccountRepository for PgAccountRepository {
    async fn find_by_email(&self, email: &Email) -> AccessResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccessResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = $1"
        ))
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AccessResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(&self, account: &Account) -> AccessResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                name,
                email,
                password_hash,
                role,
                failed_logins,
                locked,
                profile_picture,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.name.as_str())
        .bind(account.email.as_str())
        .bind(account.password.as_phc_string())
        .bind(account.role.code())
        .bind(account.failed_logins as i32)
        .bind(account.locked)
        .bind(account.profile_picture.as_deref())
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_email_conflict)?;

        Ok(())
    }

    async fn save(&self, account: &Account) -> AccessResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                name = $2,
                email = $3,
                role = $4,
                profile_picture = $5,
                updated_at = $6
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.name.as_str())
        .bind(account.email.as_str())
        .bind(account.role.code())
        .bind(account.profile_picture.as_deref())
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_email_conflict)?;

        Ok(())
    }

    async fn record_failed_login(
        &self,
        account_id: &AccountId,
        threshold: u32,
    ) -> AccessResult<CounterUpdate> {
        // Single statement: concurrent mismatches cannot lose an increment.
        let row = sqlx::query_as::<_, (i32, bool)>(
            r#"
            UPDATE accounts SET
                failed_logins = failed_logins + 1,
                locked = (failed_logins + 1 >= $2),
                updated_at = NOW()
            WHERE account_id = $1 AND NOT locked
            RETURNING failed_logins, locked
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(threshold as i32)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((failed_logins, locked)) => Ok(CounterUpdate::Applied(LoginCounters {
                failed_logins: failed_logins.max(0) as u32,
                locked,
            })),
            None => self.untouched(account_id).await,
        }
    }

    async fn reset_failed_logins(&self, account_id: &AccountId) -> AccessResult<CounterUpdate> {
        // `NOT locked` keeps a lock set by a concurrent mismatch.
        let row = sqlx::query_as::<_, (i32, bool)>(
            r#"
            UPDATE accounts SET failed_logins = 0, updated_at = NOW()
            WHERE account_id = $1 AND NOT locked
            RETURNING failed_logins, locked
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((failed_logins, locked)) => Ok(CounterUpdate::Applied(LoginCounters {
                failed_logins: failed_logins.max(0) as u32,
                locked,
            })),
            None => self.untouched(account_id).await,
        }
    }

    async fn unlock(&self, account_id: &AccountId) -> AccessResult<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE accounts SET failed_logins = 0, locked = FALSE, updated_at = NOW()
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn delete_by_id(&self, account_id: &AccountId) -> AccessResult<bool> {
        let affected = sqlx::query("DELETE FROM accounts WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAccountRepository {
    async fn create(&self, session: &AuthSession) -> AccessResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                account_id,
                identity,
                expires_at_ms,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.session_id)
        .bind(session.identity.account_id.as_uuid())
        .bind(Json(&session.identity))
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AccessResult<Option<AuthSession>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_id, identity, expires_at_ms, created_at
            FROM auth_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn update_identity(&self, identity: &SessionIdentity) -> AccessResult<u64> {
        let updated = sqlx::query("UPDATE auth_sessions SET identity = $2 WHERE account_id = $1")
            .bind(identity.account_id.as_uuid())
            .bind(Json(identity))
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(updated)
    }

    async fn delete(&self, session_id: Uuid) -> AccessResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_all_for_account(&self, account_id: &AccountId) -> AccessResult<u64> {
        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn cleanup_expired(&self) -> AccessResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

fn map_email_conflict(err: sqlx::Error) -> AccessError {
    if is_unique_violation(&err) {
        AccessError::DuplicateEmail
    } else {
        AccessError::StoreUnavailable(err)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    failed_logins: i32,
    locked: bool,
    profile_picture: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AccessResult<Account> {
        let role = Role::from_code(&self.role)
            .ok_or_else(|| AccessError::Internal(format!("Invalid role in database: {}", self.role)))?;
        let password = HashedPassword::from_phc_string(self.password_hash)?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            name: AccountName::from_db(self.name),
            email: Email::from_db(self.email),
            password,
            role,
            failed_logins: self.failed_logins.max(0) as u32,
            locked: self.locked,
            profile_picture: self.profile_picture,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    identity: Json<SessionIdentity>,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> AuthSession {
        AuthSession {
            session_id: self.session_id,
            identity: self.identity.0,
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        }
    }
}
