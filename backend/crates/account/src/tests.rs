//! Unit tests for the account crate, run against the in-memory store.

#[cfg(test)]
mod support {
    use std::sync::Arc;

    use crate::application::{AccountConfig, RegisterInput, RegisterUseCase};
    use crate::domain::value_object::{AccountId, role::Role};
    use crate::infra::{MemoryAccountStore, MemoryAuditSink};

    pub struct Fixture {
        pub store: Arc<MemoryAccountStore>,
        pub audit: Arc<MemoryAuditSink>,
        pub config: Arc<AccountConfig>,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                store: Arc::new(MemoryAccountStore::new()),
                audit: Arc::new(MemoryAuditSink::new()),
                config: Arc::new(AccountConfig::development()),
            }
        }

        pub async fn register(&self, name: &str, email: &str, password: &str, role: Role) -> AccountId {
            RegisterUseCase::new(self.store.clone(), self.audit.clone(), self.config.clone())
                .execute(RegisterInput {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    role: Some(role),
                })
                .await
                .unwrap()
        }
    }
}

#[cfg(test)]
mod guard_tests {
    use super::support::Fixture;
    use crate::application::{AuthenticateInput, AuthenticateUseCase};
    use crate::domain::AccountRepository;
    use crate::domain::value_object::role::Role;
    use crate::error::AccessError;

    fn login(email: &str, password: &str) -> AuthenticateInput {
        AuthenticateInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_fifth_mismatch_locks_and_sixth_attempt_is_rejected() {
        let fx = Fixture::new();
        let id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let guard = AuthenticateUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        for attempt in 1..=5u32 {
            let result = guard.execute(login("alice@example.com", "wrong")).await;
            assert!(
                matches!(result, Err(AccessError::InvalidPassword)),
                "attempt {attempt} should report a mismatch"
            );

            let account = fx.store.find_by_id(&id).await.unwrap().unwrap();
            assert_eq!(account.failed_logins, attempt);
            assert_eq!(account.locked, attempt >= 5);
        }

        // Correct password, but the account is locked now.
        let result = guard.execute(login("alice@example.com", "secret1")).await;
        assert!(matches!(result, Err(AccessError::AccountLocked)));

        let account = fx.store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(account.failed_logins, 5);
        assert!(account.locked);
    }

    #[tokio::test]
    async fn test_success_resets_counter() {
        let fx = Fixture::new();
        let id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let guard = AuthenticateUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        for _ in 0..3 {
            let _ = guard.execute(login("alice@example.com", "wrong")).await;
        }
        assert_eq!(fx.store.find_by_id(&id).await.unwrap().unwrap().failed_logins, 3);

        let identity = guard
            .execute(login("alice@example.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(identity.account_id, id);
        assert_eq!(identity.name, "Alice");
        assert_eq!(identity.role, Role::User);

        let account = fx.store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(account.failed_logins, 0);
        assert!(!account.locked);
    }

    #[tokio::test]
    async fn test_counter_restarts_after_success() {
        let fx = Fixture::new();
        let id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let guard = AuthenticateUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        for _ in 0..4 {
            let _ = guard.execute(login("alice@example.com", "wrong")).await;
        }
        guard
            .execute(login("alice@example.com", "secret1"))
            .await
            .unwrap();
        for _ in 0..4 {
            let _ = guard.execute(login("alice@example.com", "wrong")).await;
        }

        let account = fx.store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(account.failed_logins, 4);
        assert!(!account.locked);
    }

    #[tokio::test]
    async fn test_unknown_email() {
        let fx = Fixture::new();
        let guard = AuthenticateUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        let result = guard.execute(login("nobody@example.com", "anything")).await;
        assert!(matches!(result, Err(AccessError::NotFound)));
    }

    #[tokio::test]
    async fn test_overlong_unknown_email_is_not_found() {
        let fx = Fixture::new();
        let guard = AuthenticateUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        let email = format!("{}@example.com", "a".repeat(250));
        let result = guard.execute(login(&email, "anything")).await;

        assert!(matches!(result, Err(AccessError::NotFound)));
        let events = fx.audit.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].email.as_deref(), Some(email.as_str()));
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let fx = Fixture::new();
        fx.register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let guard = AuthenticateUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        let result = guard.execute(login("Alice@example.com", "secret1")).await;
        assert!(matches!(result, Err(AccessError::NotFound)));
    }

    #[tokio::test]
    async fn test_empty_input_is_validation_error() {
        let fx = Fixture::new();
        let guard = AuthenticateUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        assert!(matches!(
            guard.execute(login("", "secret1")).await,
            Err(AccessError::Validation(_))
        ));
        assert!(matches!(
            guard.execute(login("alice@example.com", "")).await,
            Err(AccessError::Validation(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_mismatches_are_all_counted() {
        let fx = Fixture::new();
        let id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = fx.store.clone();
            let audit = fx.audit.clone();
            let config = fx.config.clone();
            handles.push(tokio::spawn(async move {
                AuthenticateUseCase::new(store, audit, config)
                    .execute(login("alice@example.com", "wrong"))
                    .await
            }));
        }

        let mut invalid = 0;
        let mut locked = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Err(AccessError::InvalidPassword) => invalid += 1,
                Err(AccessError::AccountLocked) => locked += 1,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }

        assert_eq!(invalid, 5);
        assert_eq!(locked, 3);

        let account = fx.store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(account.failed_logins, 5);
        assert!(account.locked);
    }
}

#[cfg(test)]
mod register_tests {
    use super::support::Fixture;
    use crate::application::{RegisterInput, RegisterUseCase};
    use crate::domain::AccountRepository;
    use crate::domain::value_object::{email::Email, role::Role};
    use crate::error::AccessError;

    fn input(name: &str, email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_new_account_defaults() {
        let fx = Fixture::new();
        let use_case = RegisterUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        let id = use_case
            .execute(input("Alice", "alice@example.com", "secret1"))
            .await
            .unwrap();

        let account = fx.store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(account.role, Role::User);
        assert_eq!(account.failed_logins, 0);
        assert!(!account.locked);
        assert!(account.profile_picture.is_none());
        assert_ne!(account.password.as_phc_string(), "secret1");
        assert!(account.password.as_phc_string().starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_role_is_kept() {
        let fx = Fixture::new();
        let id = fx
            .register("Root", "root@example.com", "secret1", Role::Admin)
            .await;

        let account = fx.store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(account.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let fx = Fixture::new();
        let use_case = RegisterUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        use_case
            .execute(input("Alice", "alice@example.com", "secret1"))
            .await
            .unwrap();
        let result = use_case
            .execute(input("Another Alice", "alice@example.com", "secret2"))
            .await;

        assert!(matches!(result, Err(AccessError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_short_password() {
        let fx = Fixture::new();
        let use_case = RegisterUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        let result = use_case
            .execute(input("Alice", "alice@example.com", "12345"))
            .await;

        match result {
            Err(AccessError::Validation(message)) => {
                assert_eq!(message, "Password must be at least 6 characters.")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        let email = Email::new("alice@example.com").unwrap();
        assert!(!fx.store.exists_by_email(&email).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let fx = Fixture::new();
        let use_case = RegisterUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        for (name, email, password) in [
            ("", "alice@example.com", "secret1"),
            ("Alice", "", "secret1"),
            ("Alice", "alice@example.com", ""),
        ] {
            let result = use_case.execute(input(name, email, password)).await;
            match result {
                Err(AccessError::Validation(message)) => {
                    assert_eq!(message, "Please fill in all fields.")
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }
}

#[cfg(test)]
mod audit_tests {
    use std::sync::Arc;

    use super::support::Fixture;
    use crate::application::{AuthenticateInput, AuthenticateUseCase};
    use crate::domain::audit::{AuditAction, AuditEvent, AuditSink};
    use crate::domain::value_object::role::Role;
    use crate::error::{AccessError, AccessResult};

    struct FailingAuditSink;

    impl AuditSink for FailingAuditSink {
        async fn record(&self, _event: &AuditEvent) -> AccessResult<()> {
            Err(AccessError::Internal("audit backend down".to_string()))
        }
    }

    fn login(email: &str, password: &str) -> AuthenticateInput {
        AuthenticateInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_each_outcome_is_recorded() {
        let fx = Fixture::new();
        let id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let guard = AuthenticateUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        let _ = guard.execute(login("ghost@example.com", "secret1")).await;
        let _ = guard.execute(login("alice@example.com", "wrong")).await;
        let _ = guard.execute(login("alice@example.com", "secret1")).await;

        let events = fx.audit.events();
        let actions: Vec<_> = events.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                AuditAction::AccountRegistered,
                AuditAction::LoginUnknownEmail,
                AuditAction::LoginInvalidPassword,
                AuditAction::LoginSucceeded,
            ]
        );

        assert_eq!(events[1].account_id, None);
        assert_eq!(events[1].email.as_deref(), Some("ghost@example.com"));
        assert_eq!(events[2].account_id, Some(id));
        assert_eq!(events[2].details["failed_logins"], 1);
        assert_eq!(events[3].account_id, Some(id));
    }

    #[tokio::test]
    async fn test_lockout_is_recorded() {
        let fx = Fixture::new();
        fx.register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let guard = AuthenticateUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());

        for _ in 0..6 {
            let _ = guard.execute(login("alice@example.com", "wrong")).await;
        }

        let actions: Vec<_> = fx.audit.events().iter().map(|e| e.action).collect();
        assert_eq!(
            actions
                .iter()
                .filter(|a| **a == AuditAction::LoginInvalidPassword)
                .count(),
            5
        );
        assert_eq!(
            actions
                .iter()
                .filter(|a| **a == AuditAction::AccountLockedOut)
                .count(),
            1
        );
        assert_eq!(actions.last(), Some(&AuditAction::LoginRejectedLocked));
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_change_outcome() {
        let fx = Fixture::new();
        fx.register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let guard = AuthenticateUseCase::new(
            fx.store.clone(),
            Arc::new(FailingAuditSink),
            fx.config.clone(),
        );

        assert!(
            guard
                .execute(login("alice@example.com", "secret1"))
                .await
                .is_ok()
        );
        assert!(matches!(
            guard.execute(login("alice@example.com", "wrong")).await,
            Err(AccessError::InvalidPassword)
        ));
        assert!(matches!(
            guard.execute(login("ghost@example.com", "x")).await,
            Err(AccessError::NotFound)
        ));
    }
}

#[cfg(test)]
mod store_failure_tests {
    use std::sync::Arc;

    use crate::application::{AccountConfig, AuthenticateInput, AuthenticateUseCase};
    use crate::domain::entity::account::Account;
    use crate::domain::repository::AccountRepository;
    use crate::domain::value_object::{AccountId, email::Email, login_status::CounterUpdate};
    use crate::error::{AccessError, AccessResult};
    use crate::infra::MemoryAuditSink;
    use kernel::error::kind::ErrorKind;

    struct UnreachableStore;

    fn down<T>() -> AccessResult<T> {
        Err(AccessError::StoreUnavailable(sqlx::Error::PoolTimedOut))
    }

    impl AccountRepository for UnreachableStore {
        async fn find_by_email(&self, _email: &Email) -> AccessResult<Option<Account>> {
            down()
        }
        async fn find_by_id(&self, _id: &AccountId) -> AccessResult<Option<Account>> {
            down()
        }
        async fn exists_by_email(&self, _email: &Email) -> AccessResult<bool> {
            down()
        }
        async fn create(&self, _account: &Account) -> AccessResult<()> {
            down()
        }
        async fn save(&self, _account: &Account) -> AccessResult<()> {
            down()
        }
        async fn record_failed_login(
            &self,
            _id: &AccountId,
            _threshold: u32,
        ) -> AccessResult<CounterUpdate> {
            down()
        }
        async fn reset_failed_logins(&self, _id: &AccountId) -> AccessResult<CounterUpdate> {
            down()
        }
        async fn unlock(&self, _id: &AccountId) -> AccessResult<bool> {
            down()
        }
        async fn delete_by_id(&self, _id: &AccountId) -> AccessResult<bool> {
            down()
        }
    }

    #[tokio::test]
    async fn test_unreachable_store_surfaces_as_store_unavailable() {
        let guard = AuthenticateUseCase::new(
            Arc::new(UnreachableStore),
            Arc::new(MemoryAuditSink::new()),
            Arc::new(AccountConfig::development()),
        );

        let err = guard
            .execute(AuthenticateInput {
                email: "alice@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AccessError::StoreUnavailable(_)));
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    }
}

#[cfg(test)]
mod interleaving_tests {
    //! Another request changes the account between the guard's read and its
    //! counter write.

    use std::sync::Arc;

    use super::support::Fixture;
    use crate::application::{AuthenticateInput, AuthenticateUseCase};
    use crate::domain::AuditAction;
    use crate::domain::entity::account::Account;
    use crate::domain::repository::AccountRepository;
    use crate::domain::value_object::{AccountId, email::Email, login_status::CounterUpdate, role::Role};
    use crate::error::{AccessError, AccessResult};
    use crate::infra::MemoryAccountStore;

    #[derive(Clone, Copy)]
    enum Interleave {
        Lock,
        Delete,
    }

    /// Runs `interleave` right before each counter write.
    struct InterleavedStore {
        inner: MemoryAccountStore,
        interleave: Interleave,
    }

    impl InterleavedStore {
        async fn interleave(&self, account_id: &AccountId) -> AccessResult<()> {
            match self.interleave {
                Interleave::Lock => {
                    AccountRepository::record_failed_login(&self.inner, account_id, 1).await?;
                }
                Interleave::Delete => {
                    AccountRepository::delete_by_id(&self.inner, account_id).await?;
                }
            }
            Ok(())
        }
    }

    impl AccountRepository for InterleavedStore {
        async fn find_by_email(&self, email: &Email) -> AccessResult<Option<Account>> {
            AccountRepository::find_by_email(&self.inner, email).await
        }
        async fn find_by_id(&self, id: &AccountId) -> AccessResult<Option<Account>> {
            AccountRepository::find_by_id(&self.inner, id).await
        }
        async fn exists_by_email(&self, email: &Email) -> AccessResult<bool> {
            AccountRepository::exists_by_email(&self.inner, email).await
        }
        async fn create(&self, account: &Account) -> AccessResult<()> {
            AccountRepository::create(&self.inner, account).await
        }
        async fn save(&self, account: &Account) -> AccessResult<()> {
            AccountRepository::save(&self.inner, account).await
        }
        async fn record_failed_login(
            &self,
            id: &AccountId,
            threshold: u32,
        ) -> AccessResult<CounterUpdate> {
            self.interleave(id).await?;
            AccountRepository::record_failed_login(&self.inner, id, threshold).await
        }
        async fn reset_failed_logins(&self, id: &AccountId) -> AccessResult<CounterUpdate> {
            self.interleave(id).await?;
            AccountRepository::reset_failed_logins(&self.inner, id).await
        }
        async fn unlock(&self, id: &AccountId) -> AccessResult<bool> {
            AccountRepository::unlock(&self.inner, id).await
        }
        async fn delete_by_id(&self, id: &AccountId) -> AccessResult<bool> {
            AccountRepository::delete_by_id(&self.inner, id).await
        }
    }

    async fn attempt(
        fx: &Fixture,
        interleave: Interleave,
        password: &str,
    ) -> AccessResult<crate::domain::SessionIdentity> {
        let store = InterleavedStore {
            inner: fx.store.as_ref().clone(),
            interleave,
        };
        AuthenticateUseCase::new(Arc::new(store), fx.audit.clone(), fx.config.clone())
            .execute(AuthenticateInput {
                email: "alice@example.com".to_string(),
                password: password.to_string(),
            })
            .await
    }

    #[tokio::test]
    async fn test_lock_before_reset_rejects_correct_password() {
        let fx = Fixture::new();
        let id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;

        let result = attempt(&fx, Interleave::Lock, "secret1").await;
        assert!(matches!(result, Err(AccessError::AccountLocked)));

        let account = AccountRepository::find_by_id(fx.store.as_ref(), &id)
            .await
            .unwrap()
            .unwrap();
        assert!(account.locked);
        assert_eq!(account.failed_logins, 1);

        let actions: Vec<_> = fx.audit.events().iter().map(|e| e.action).collect();
        assert_eq!(actions.last(), Some(&AuditAction::LoginRejectedLocked));
        assert!(!actions.contains(&AuditAction::LoginSucceeded));
    }

    #[tokio::test]
    async fn test_lock_before_increment_reports_locked() {
        let fx = Fixture::new();
        fx.register("Alice", "alice@example.com", "secret1", Role::User)
            .await;

        let result = attempt(&fx, Interleave::Lock, "wrong").await;
        assert!(matches!(result, Err(AccessError::AccountLocked)));
    }

    #[tokio::test]
    async fn test_delete_before_increment_is_not_found() {
        let fx = Fixture::new();
        fx.register("Alice", "alice@example.com", "secret1", Role::User)
            .await;

        let result = attempt(&fx, Interleave::Delete, "wrong").await;
        assert!(matches!(result, Err(AccessError::NotFound)));
        assert_eq!(
            fx.audit.events().last().map(|e| e.action),
            Some(AuditAction::LoginUnknownEmail)
        );
    }

    #[tokio::test]
    async fn test_delete_before_reset_is_not_found() {
        let fx = Fixture::new();
        fx.register("Alice", "alice@example.com", "secret1", Role::User)
            .await;

        let result = attempt(&fx, Interleave::Delete, "secret1").await;
        assert!(matches!(result, Err(AccessError::NotFound)));
    }
}

#[cfg(test)]
mod session_tests {
    use super::support::Fixture;
    use crate::application::{AuthenticateInput, CheckSessionUseCase, SignInUseCase, SignOutUseCase};
    use crate::domain::entity::auth_session::AuthSession;
    use crate::domain::repository::SessionRepository;
    use crate::domain::value_object::role::Role;

    async fn sign_in(fx: &Fixture) -> String {
        SignInUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone())
            .execute(AuthenticateInput {
                email: "alice@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap()
            .session_token
    }

    #[tokio::test]
    async fn test_token_resolves_to_identity() {
        let fx = Fixture::new();
        let id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let token = sign_in(&fx).await;

        let identity = CheckSessionUseCase::new(fx.store.clone(), fx.config.clone())
            .resolve(&token)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(identity.account_id, id);
        assert_eq!(identity.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_tampered_token_is_anonymous() {
        let fx = Fixture::new();
        fx.register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let token = sign_in(&fx).await;

        let (session_id, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", uuid::Uuid::new_v4(), signature);
        assert_ne!(forged.split_once('.').unwrap().0, session_id);

        let check = CheckSessionUseCase::new(fx.store.clone(), fx.config.clone());
        assert!(check.resolve(&forged).await.unwrap().is_none());
        assert!(check.resolve("garbage").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_destroys_session() {
        let fx = Fixture::new();
        fx.register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let token = sign_in(&fx).await;

        SignOutUseCase::new(fx.store.clone(), fx.config.clone())
            .execute(&token)
            .await
            .unwrap();

        let check = CheckSessionUseCase::new(fx.store.clone(), fx.config.clone());
        assert!(check.resolve(&token).await.unwrap().is_none());
        assert_eq!(fx.store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_expired_session_is_removed() {
        let fx = Fixture::new();
        fx.register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let token = sign_in(&fx).await;
        let check = CheckSessionUseCase::new(fx.store.clone(), fx.config.clone());
        let mut session = check.get_session(&token).await.unwrap();

        // Re-insert the same session with an expiry in the past.
        session.expires_at_ms = 0;
        SessionRepository::create(fx.store.as_ref(), &session).await.unwrap();

        assert!(check.resolve(&token).await.unwrap().is_none());
        assert_eq!(fx.store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let fx = Fixture::new();
        let id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let _live = sign_in(&fx).await;

        let account = crate::domain::AccountRepository::find_by_id(fx.store.as_ref(), &id)
            .await
            .unwrap()
            .unwrap();
        let stale = AuthSession::new(account.identity(), chrono::Duration::seconds(-10));
        SessionRepository::create(fx.store.as_ref(), &stale).await.unwrap();
        assert_eq!(fx.store.session_count(), 2);

        assert_eq!(fx.store.cleanup_expired().await.unwrap(), 1);
        assert_eq!(fx.store.session_count(), 1);
    }
}

#[cfg(test)]
mod profile_tests {
    use super::support::Fixture;
    use crate::application::{
        AuthenticateInput, CheckSessionUseCase, ProfileEdit, ProfileUseCase, SignInUseCase,
    };
    use crate::domain::AccountRepository;
    use crate::domain::audit::AuditAction;
    use crate::domain::value_object::role::Role;

    #[tokio::test]
    async fn test_edit_updates_account_and_session() {
        let fx = Fixture::new();
        let id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let signed_in = SignInUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone())
            .execute(AuthenticateInput {
                email: "alice@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();

        let refreshed = ProfileUseCase::new(fx.store.clone(), fx.audit.clone())
            .edit(
                &signed_in.identity,
                ProfileEdit {
                    name: Some("Alice Liddell".to_string()),
                    profile_picture: Some("/uploads/1700000000-alice.png".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(refreshed.name, "Alice Liddell");

        let account = fx.store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(account.name.as_str(), "Alice Liddell");
        assert_eq!(
            account.profile_picture.as_deref(),
            Some("/uploads/1700000000-alice.png")
        );

        let from_session = CheckSessionUseCase::new(fx.store.clone(), fx.config.clone())
            .resolve(&signed_in.session_token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(from_session, refreshed);
        assert_eq!(
            fx.audit.events().last().map(|e| e.action),
            Some(AuditAction::ProfileUpdated)
        );
    }

    #[tokio::test]
    async fn test_empty_name_keeps_current() {
        let fx = Fixture::new();
        let id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let identity = fx.store.find_by_id(&id).await.unwrap().unwrap().identity();

        let refreshed = ProfileUseCase::new(fx.store.clone(), fx.audit.clone())
            .edit(
                &identity,
                ProfileEdit {
                    name: Some(String::new()),
                    profile_picture: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(refreshed.name, "Alice");
    }

    #[tokio::test]
    async fn test_delete_removes_account_and_sessions() {
        let fx = Fixture::new();
        let id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let signed_in = SignInUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone())
            .execute(AuthenticateInput {
                email: "alice@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();

        ProfileUseCase::new(fx.store.clone(), fx.audit.clone())
            .delete(&signed_in.identity)
            .await
            .unwrap();

        assert!(fx.store.find_by_id(&id).await.unwrap().is_none());
        assert_eq!(fx.store.session_count(), 0);
    }
}

#[cfg(test)]
mod admin_tests {
    use super::support::Fixture;
    use crate::application::{
        AdminUpdateInput, AdminUseCase, AuthenticateInput, AuthenticateUseCase,
    };
    use crate::domain::AccountRepository;
    use crate::domain::audit::AuditAction;
    use crate::domain::value_object::role::Role;
    use crate::error::AccessError;

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let fx = Fixture::new();
        let id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let alice = fx.store.find_by_id(&id).await.unwrap().unwrap().identity();

        let admin = AdminUseCase::new(fx.store.clone(), fx.audit.clone());
        assert!(matches!(
            admin.find_by_email(&alice, "alice@example.com").await,
            Err(AccessError::Forbidden)
        ));
        assert!(matches!(
            admin.unlock(&alice, &id).await,
            Err(AccessError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_unlock_restores_login() {
        let fx = Fixture::new();
        let user_id = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let admin_id = fx
            .register("Root", "root@example.com", "secret1", Role::Admin)
            .await;
        let root = fx.store.find_by_id(&admin_id).await.unwrap().unwrap().identity();
        let guard = AuthenticateUseCase::new(fx.store.clone(), fx.audit.clone(), fx.config.clone());
        let login = || AuthenticateInput {
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
        };

        for _ in 0..5 {
            let _ = guard
                .execute(AuthenticateInput {
                    email: "alice@example.com".to_string(),
                    password: "wrong".to_string(),
                })
                .await;
        }
        assert!(matches!(guard.execute(login()).await, Err(AccessError::AccountLocked)));

        let unlocked = AdminUseCase::new(fx.store.clone(), fx.audit.clone())
            .unlock(&root, &user_id)
            .await
            .unwrap();
        assert!(!unlocked.locked);
        assert_eq!(unlocked.failed_logins, 0);

        assert!(guard.execute(login()).await.is_ok());

        let unlock_event = fx
            .audit
            .events()
            .into_iter()
            .find(|e| e.action == AuditAction::AccountUnlocked)
            .unwrap();
        assert_eq!(unlock_event.details["admin_email"], "root@example.com");
        assert_eq!(unlock_event.details["was_locked"], true);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_email() {
        let fx = Fixture::new();
        let alice = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        fx.register("Bob", "bob@example.com", "secret1", Role::User)
            .await;
        let admin_id = fx
            .register("Root", "root@example.com", "secret1", Role::Admin)
            .await;
        let root = fx.store.find_by_id(&admin_id).await.unwrap().unwrap().identity();

        let result = AdminUseCase::new(fx.store.clone(), fx.audit.clone())
            .update(
                &root,
                AdminUpdateInput {
                    account_id: alice,
                    name: "Alice".to_string(),
                    email: "bob@example.com".to_string(),
                    role: Role::User,
                },
            )
            .await;

        assert!(matches!(result, Err(AccessError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let fx = Fixture::new();
        let alice = fx
            .register("Alice", "alice@example.com", "secret1", Role::User)
            .await;
        let admin_id = fx
            .register("Root", "root@example.com", "secret1", Role::Admin)
            .await;
        let root = fx.store.find_by_id(&admin_id).await.unwrap().unwrap().identity();
        let admin = AdminUseCase::new(fx.store.clone(), fx.audit.clone());

        let updated = admin
            .update(
                &root,
                AdminUpdateInput {
                    account_id: alice,
                    name: "Alice A.".to_string(),
                    email: "alice@example.org".to_string(),
                    role: Role::Admin,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(
            admin
                .find_by_email(&root, "alice@example.org")
                .await
                .unwrap()
                .account_id,
            alice
        );

        admin.delete(&root, &alice).await.unwrap();
        assert!(matches!(
            admin.find_by_email(&root, "alice@example.org").await,
            Err(AccessError::UserNotFound)
        ));
        assert!(matches!(
            admin.delete(&root, &alice).await,
            Err(AccessError::UserNotFound)
        ));
    }
}

#[cfg(test)]
mod http_tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::AccountConfig;
    use crate::infra::{MemoryAccountStore, MemoryAuditSink};
    use crate::presentation::{SessionLayerState, account_router, resolve_session};

    fn app() -> Router {
        let store = Arc::new(MemoryAccountStore::new());
        let config = Arc::new(AccountConfig::development());

        account_router(store.clone(), Arc::new(MemoryAuditSink::new()), config.clone()).layer(
            from_fn_with_state(
                SessionLayerState {
                    sessions: store,
                    config,
                },
                resolve_session::<MemoryAccountStore>,
            ),
        )
    }

    fn json_request(method: &str, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_register_login_profile_flow() {
        let app = app();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth/register",
                json!({ "name": "Alice", "email": "alice@example.com", "password": "secret1" }),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/auth/login",
                json!({ "email": "alice@example.com", "password": "secret1" }),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let cookie = set_cookie.split(';').next().unwrap().to_string();
        let body = body_json(response).await;
        assert_eq!(body["message"], "Welcome back, Alice!");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/profile")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["email"], "alice@example.com");

        // Regular users cannot reach the admin area.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin/users?email=alice@example.com")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["redirect"], "/dashboard");
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let response = app()
            .oneshot(Request::builder().uri("/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["redirect"], "/login");
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/auth/login",
                json!({ "email": "nobody@example.com", "password": "secret1" }),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["detail"], "Email not registered.");
    }

    #[tokio::test]
    async fn test_logout_clears_cookie_without_session() {
        let response = app()
            .oneshot(json_request("POST", "/auth/logout", json!({}), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(set_cookie.to_str().unwrap().contains("Max-Age=0"));
    }
}
