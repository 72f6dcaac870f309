//! # Signed-in user session
//!
//! [`UserSession`] is the identity the auth provider reports for the current
//! viewer. The application holds at most one at a time and replaces it wholesale
//! whenever the provider announces a change; `None` means nobody is signed in.

use serde::{Deserialize, Serialize};

/// Identity of the signed-in viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSession {
    /// Opaque provider-assigned user id
    pub uid: String,
    pub email: String,
    /// `"password"` for email + password accounts, otherwise the federated provider
    pub provider: String,
}

impl UserSession {
    /// Text for the signed-in banner.
    pub fn greeting(&self) -> String {
        format!("Welcome, {}", self.email)
    }
}
