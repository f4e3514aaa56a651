//! Password hashing with Argon2 (PHC string format).

use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

/// Hashes `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Returns `true` if `password` matches the PHC `hash`.
///
/// An unparsable hash never matches.
pub fn verify_password(hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// A real hash of a throwaway password, built once with the same
/// parameters as stored hashes.
fn dummy_hash() -> &'static str {
    DUMMY_HASH.get_or_init(|| hash_password("ticket-desk/no-such-user").unwrap_or_default())
}

/// Checks `password` against a stored hash, or against [`dummy_hash`] when
/// there is no account.
///
/// Both cases pay one Argon2 verification, so response time does not reveal
/// whether the account exists. A missing account never matches.
pub fn check_password(stored: Option<&str>, password: &str) -> bool {
    match stored {
        Some(hash) => verify_password(hash, password),
        None => {
            verify_password(dummy_hash(), password);
            false
        }
    }
}

#[cfg(test)]
pub(crate) fn dummy_hash_ready() -> bool {
    DUMMY_HASH.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("hunter22").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "hunter22"));
        assert!(!verify_password(&hash, "hunter23"));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_never_matches() {
        assert!(!verify_password("not-a-phc-string", "anything"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn missing_account_never_matches() {
        assert!(!check_password(None, "ticket-desk/no-such-user"));
        assert!(!check_password(None, ""));
        assert!(dummy_hash_ready());
    }

    #[test]
    fn dummy_hash_uses_stored_hash_parameters() {
        let real = hash_password("hunter22").unwrap();
        let real = PasswordHash::new(&real).unwrap();
        let dummy = PasswordHash::new(dummy_hash()).unwrap();

        assert_eq!(dummy.algorithm, real.algorithm);
        assert_eq!(dummy.version, real.version);
        assert_eq!(dummy.params, real.params);
    }

    #[test]
    fn stored_hash_is_checked_normally() {
        let hash = hash_password("hunter22").unwrap();

        assert!(check_password(Some(&hash), "hunter22"));
        assert!(!check_password(Some(&hash), "hunter23"));
    }
}
