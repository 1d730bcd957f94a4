//! Password hashing (Argon2id, random salt per hash)

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::AppError;

/// Hash a plaintext password into a PHC string
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))
}

/// Check a plaintext password against a stored PHC string
///
/// A digest that does not parse never verifies.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let digest = hash_password("secret1").unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(verify_password("secret1", &digest));
        assert!(!verify_password("secret2", &digest));
    }

    #[test]
    fn test_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_garbage_digest() {
        assert!(!verify_password("secret1", "plaintext"));
    }
}
