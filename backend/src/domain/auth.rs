//! Authentication primitives: login credentials, sign-up passwords and API
//! token keys.
//!
//! Inbound adapters build these from raw strings before talking to the
//! account service, so services never see unvalidated credentials.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::author::{AuthorId, Username};
use super::validation::FieldViolation;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl FieldViolation for LoginValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::EmptyPassword => "empty_password",
        }
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; whitespace is preserved.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "s3cret-pass").unwrap();
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the credential lookup.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Minimum password length accepted at sign-up.
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length accepted at sign-up.
pub const PASSWORD_MAX: usize = 128;

/// Reasons a sign-up password is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },
    #[error("password must be at most {max} characters")]
    TooLong { max: usize },
    #[error("password must not be entirely numeric")]
    EntirelyNumeric,
    #[error("password is too similar to the username")]
    SimilarToUsername,
}

impl FieldViolation for PasswordValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "password_too_short",
            Self::TooLong { .. } => "password_too_long",
            Self::EntirelyNumeric => "password_entirely_numeric",
            Self::SimilarToUsername => "password_too_similar",
        }
    }
}

/// Password accepted for a new account, zeroised on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Validate `password` for an account named `username`.
    pub fn new(password: &str, username: &Username) -> Result<Self, PasswordValidationError> {
        let length = password.chars().count();
        if length < PASSWORD_MIN {
            return Err(PasswordValidationError::TooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(PasswordValidationError::TooLong { max: PASSWORD_MAX });
        }
        if password.chars().all(|c| c.is_ascii_digit()) {
            return Err(PasswordValidationError::EntirelyNumeric);
        }
        if password.eq_ignore_ascii_case(username.as_ref()) {
            return Err(PasswordValidationError::SimilarToUsername);
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    /// Plain-text password for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(***)")
    }
}

/// Number of random bytes in an API token key.
const TOKEN_BYTES: usize = 20;

/// Raw API token key handed to the client once, at login.
///
/// Only its [`TokenDigest`] is persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Generate a new random 40-hex-character key.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(Zeroizing::new(hex::encode(bytes)))
    }

    /// Wrap a key presented by a client.
    pub fn from_presented(key: &str) -> Option<Self> {
        let key = key.trim();
        (!key.is_empty()).then(|| Self(Zeroizing::new(key.to_owned())))
    }

    /// Key text returned to the client.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Storage digest of this key.
    pub fn digest(&self) -> TokenDigest {
        TokenDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Hex-encoded SHA-256 digest of an [`AuthToken`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Rehydrate a digest read from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl AsRef<str> for TokenDigest {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Credential record used to verify a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub author_id: AuthorId,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn username(raw: &str) -> Username {
        Username::new(raw).expect("valid username")
    }

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("short", PasswordValidationError::TooShort { min: PASSWORD_MIN })]
    #[case("12345678901", PasswordValidationError::EntirelyNumeric)]
    #[case("Test_User1", PasswordValidationError::SimilarToUsername)]
    fn weak_passwords_are_rejected(
        #[case] password: &str,
        #[case] expected: PasswordValidationError,
    ) {
        assert_eq!(NewPassword::new(password, &username("test_user1")), Err(expected));
    }

    #[rstest]
    fn overlong_passwords_are_rejected() {
        let password = "x".repeat(PASSWORD_MAX + 1);
        assert_eq!(
            NewPassword::new(&password, &username("ada")),
            Err(PasswordValidationError::TooLong { max: PASSWORD_MAX })
        );
    }

    #[rstest]
    fn accepted_password_is_exposed_verbatim() {
        let password = NewPassword::new("Userpass1", &username("ada")).expect("valid password");
        assert_eq!(password.expose(), "Userpass1");
        assert_eq!(format!("{password:?}"), "NewPassword(***)");
    }

    #[rstest]
    fn generated_tokens_are_forty_hex_chars_and_unique() {
        let first = AuthToken::generate();
        let second = AuthToken::generate();
        assert_eq!(first.expose().len(), 40);
        assert!(first.expose().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[rstest]
    fn digest_is_stable_and_hides_the_key() {
        let token = AuthToken::from_presented("abc123").expect("non-empty key");
        let digest = token.digest();
        assert_eq!(digest, token.digest());
        assert_eq!(digest.as_ref().len(), 64);
        assert!(!digest.as_ref().contains("abc123"));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_presented_keys_are_ignored(#[case] raw: &str) {
        assert!(AuthToken::from_presented(raw).is_none());
    }
}
