//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) carrying their own salt and
//! parameters, so verification needs nothing but the stored string.

use argon2::{Algorithm, Argon2, Params, Version};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id hasher with the crate's default parameters.
#[derive(Debug, Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Argon2id with explicit cost parameters. Verification still honours
    /// the parameters embedded in each stored hash.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hashing(err.to_string())),
        }
    }
}
