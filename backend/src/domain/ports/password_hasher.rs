//! Port for one-way password hashing.
use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hash computation failed.
        Hashing { message: String } => InternalError, "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => InternalError, "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash string with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against a hash produced by [`PasswordHasher::hash`].
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
