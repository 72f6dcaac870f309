//! Argon2id password hashes for [`super::LocalAuth`] accounts.
//!
//! Accounts keep only the PHC string (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`).
//! A stored string that cannot be parsed is an [`AuthError::Hash`], which callers
//! must keep apart from a plain mismatch.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use super::AuthError;

/// Hash with a fresh salt and the default Argon2id parameters.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// `Ok(false)` on mismatch; `Err` only when `phc` is not a valid hash string.
pub fn verify_password(password: &str, phc: &str) -> Result<bool, AuthError> {
    let stored = PasswordHash::new(phc).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &stored)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let phc = hash_password("secret1").unwrap();
        assert!(phc.starts_with("$argon2id$"));
        assert!(verify_password("secret1", &phc).unwrap());
        assert!(!verify_password("secret2", &phc).unwrap());
    }

    #[test]
    fn test_same_password_gets_new_salt() {
        assert_ne!(hash_password("secret1").unwrap(), hash_password("secret1").unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("x", "not-a-hash"),
            Err(AuthError::Hash(_))
        ));
    }
}
