//! # In-process identity provider
//!
//! [`LocalAuth`] implements [`AuthProvider`] without any network service. Accounts
//! live in memory, passwords are stored only as Argon2id PHC strings, and federated
//! sign-in resolves to a pre-configured [`FederatedProfile`]. It backs the desktop
//! binary and the test suite.
//!
//! ## Rules
//!
//! - Emails are trimmed and lowercased; they must contain `@`.
//! - Passwords shorter than [`MIN_PASSWORD_LEN`] are rejected as weak.
//! - Registering signs the new account in.
//! - Unknown email and wrong password both report `InvalidCredentials`.
//! - Password reset for an unknown email fails with `UserNotFound`; otherwise the
//!   request is recorded in the outbox ([`LocalAuth::sent_password_resets`]).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;
use uuid::Uuid;

use super::password::{hash_password, verify_password};
use super::session::SessionHub;
use super::{AuthError, AuthProvider, MIN_PASSWORD_LEN};
use crate::models::UserSession;

const PASSWORD_PROVIDER: &str = "password";

/// Identity returned by the federated sign-in flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FederatedProfile {
    /// Provider name, e.g. `"google.com"`
    pub provider: String,
    pub email: String,
}

#[derive(Clone, Debug)]
struct Account {
    uid: String,
    email: String,
    password_hash: Option<String>,
    provider: String,
}

impl Account {
    fn session(&self) -> UserSession {
        UserSession {
            uid: self.uid.clone(),
            email: self.email.clone(),
            provider: self.provider.clone(),
        }
    }
}

/// In-memory AuthProvider.
#[derive(Clone, Debug, Default)]
pub struct LocalAuth {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    federated: Option<FederatedProfile>,
    outbox: Arc<Mutex<Vec<String>>>,
    hub: SessionHub,
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::InvalidEmail);
    }
    Ok(email)
}

impl LocalAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable federated sign-in, resolving to this profile.
    pub fn with_federated(mut self, profile: FederatedProfile) -> Self {
        self.federated = Some(profile);
        self
    }

    /// Emails that password reset messages were sent to, oldest first.
    pub fn sent_password_resets(&self) -> Vec<String> {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn accounts(&self) -> std::sync::MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sign_in(&self, account: &Account) -> UserSession {
        let session = account.session();
        info!(uid = %session.uid, provider = %session.provider, "signed in");
        self.hub.publish(Some(session.clone()));
        session
    }
}

impl AuthProvider for LocalAuth {
    async fn register(&self, email: &str, password: &str) -> Result<UserSession, AuthError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        if self.accounts().contains_key(&email) {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let account = Account {
            uid: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash: Some(hash_password(password)?),
            provider: PASSWORD_PROVIDER.to_string(),
        };

        {
            let mut accounts = self.accounts();
            if accounts.contains_key(&email) {
                return Err(AuthError::EmailAlreadyInUse);
            }
            accounts.insert(email, account.clone());
        }
        Ok(self.sign_in(&account))
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserSession, AuthError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let account = self
            .accounts()
            .get(&email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        let Some(ref hash) = account.password_hash else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(self.sign_in(&account))
    }

    async fn login_federated(&self) -> Result<UserSession, AuthError> {
        let profile = self
            .federated
            .clone()
            .ok_or(AuthError::FederatedUnavailable)?;
        let email = normalize_email(&profile.email)?;

        // Federated accounts are created on first sign-in.
        let account = self
            .accounts()
            .entry(email.clone())
            .or_insert_with(|| Account {
                uid: Uuid::new_v4().to_string(),
                email,
                password_hash: None,
                provider: profile.provider.clone(),
            })
            .clone();
        Ok(self.sign_in(&account))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        info!("signed out");
        self.hub.publish(None);
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email)?;
        if !self.accounts().contains_key(&email) {
            return Err(AuthError::UserNotFound);
        }
        info!(%email, "password reset requested");
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email);
        Ok(())
    }

    fn sessions(&self) -> &SessionHub {
        &self.hub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = LocalAuth::new();
        let registered = auth.register(" Cook@Example.com ", "secret1").await.unwrap();
        assert_eq!(registered.email, "cook@example.com");
        assert_eq!(registered.provider, "password");
        assert_eq!(auth.sessions().current(), Some(registered.clone()));

        auth.logout().await.unwrap();
        assert_eq!(auth.sessions().current(), None);

        let again = auth.login("cook@example.com", "secret1").await.unwrap();
        assert_eq!(again.uid, registered.uid);
    }

    #[tokio::test]
    async fn test_register_rejections() {
        let auth = LocalAuth::new();
        assert_eq!(
            auth.register("nobody", "secret1").await,
            Err(AuthError::InvalidEmail)
        );
        assert_eq!(
            auth.register("a@example.com", "123").await,
            Err(AuthError::WeakPassword)
        );
        auth.register("a@example.com", "secret1").await.unwrap();
        assert_eq!(
            auth.register("A@example.com", "secret2").await,
            Err(AuthError::EmailAlreadyInUse)
        );
    }

    #[tokio::test]
    async fn test_bad_credentials_do_not_change_session() {
        let auth = LocalAuth::new();
        auth.register("a@example.com", "secret1").await.unwrap();
        auth.logout().await.unwrap();

        assert_eq!(
            auth.login("a@example.com", "wrong!").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            auth.login("b@example.com", "secret1").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(auth.sessions().current(), None);
    }

    #[tokio::test]
    async fn test_federated_login() {
        let auth = LocalAuth::new();
        assert_eq!(
            auth.login_federated().await,
            Err(AuthError::FederatedUnavailable)
        );

        let auth = LocalAuth::new().with_federated(FederatedProfile {
            provider: "google.com".to_string(),
            email: "chef@gmail.com".to_string(),
        });
        let first = auth.login_federated().await.unwrap();
        let second = auth.login_federated().await.unwrap();
        assert_eq!(first.uid, second.uid);
        assert_eq!(first.provider, "google.com");

        // No password on a federated account
        assert_eq!(
            auth.login("chef@gmail.com", "anything").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_password_reset_outbox() {
        let auth = LocalAuth::new();
        assert_eq!(
            auth.request_password_reset("ghost@example.com").await,
            Err(AuthError::UserNotFound)
        );
        auth.register("a@example.com", "secret1").await.unwrap();
        auth.request_password_reset("a@example.com").await.unwrap();
        assert_eq!(auth.sent_password_resets(), vec!["a@example.com"]);
    }
}
