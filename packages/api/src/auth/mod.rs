//! # Authentication
//!
//! [`AuthProvider`] is the boundary to the identity service: registration, password
//! and federated sign-in, sign-out, password reset, and an observable session.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`local`] | [`LocalAuth`], an in-process provider with Argon2id password hashes |
//! | [`password`] | Hashing and verification helpers |
//! | [`session`] | [`SessionHub`], the process-wide observable session value |

pub mod local;
pub mod password;
pub mod session;

use thiserror::Error;

use crate::models::UserSession;

pub use local::{FederatedProfile, LocalAuth};
pub use password::{hash_password, verify_password};
pub use session::{SessionHub, Subscription};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Failure of an auth operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password should be at least 6 characters")]
    WeakPassword,

    #[error("An account with this email already exists")]
    EmailAlreadyInUse,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("There is no user with this email")]
    UserNotFound,

    #[error("Federated sign-in is not configured")]
    FederatedUnavailable,

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Async interface to an identity provider.
///
/// Successful sign-in, registration, and sign-out publish the new session on
/// [`AuthProvider::sessions`].
pub trait AuthProvider {
    fn register(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<UserSession, AuthError>>;
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<UserSession, AuthError>>;
    fn login_federated(&self) -> impl std::future::Future<Output = Result<UserSession, AuthError>>;
    fn logout(&self) -> impl std::future::Future<Output = Result<(), AuthError>>;
    fn request_password_reset(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<(), AuthError>>;
    fn sessions(&self) -> &SessionHub;
}
