use anyhow::Context;
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Hashes `plain` with a fresh random salt. The result is a PHC string
/// (`$argon2id$v=19$...`) that carries its own parameters.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .inspect_err(|e| error!(error = %e, "argon2 hashing failed"))
        .context("hash password")?;
    Ok(digest.to_string())
}

/// A wrong password is `Ok(false)`. A stored value that is not a usable
/// PHC string is an error, since no password could ever match it.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored)
        .inspect_err(|e| error!(error = %e, "stored password hash is malformed"))
        .context("parse password hash")?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e).context("verify password"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_salted_phc_string() {
        let digest = hash_password("abcdefgh").unwrap();
        assert!(digest.starts_with("$argon2"));
        assert_ne!(digest, hash_password("abcdefgh").unwrap());
    }

    #[test]
    fn verify_matches_only_the_original() {
        let digest = hash_password("abcdefgh").unwrap();
        assert!(verify_password("abcdefgh", &digest).unwrap());
        assert!(!verify_password("abcdefgH", &digest).unwrap());
        assert!(!verify_password("", &digest).unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error() {
        let err = verify_password("anything", "plaintext-in-the-db").unwrap_err();
        assert_eq!(err.to_string(), "parse password hash");
    }
}
