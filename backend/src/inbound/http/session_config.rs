//! Cookie session settings read from the environment.
//!
//! | Variable                  | Values                      | Debug default |
//! |---------------------------|-----------------------------|---------------|
//! | `SESSION_KEY_FILE`        | path to >= 64 random bytes  | ephemeral key |
//! | `SESSION_COOKIE_SECURE`   | `1/0/true/false/yes/no/y/n` | `true`        |
//! | `SESSION_SAMESITE`        | `Strict/Lax/None`           | `Lax`         |
//! | `SESSION_ALLOW_EPHEMERAL` | `1/0/true/false/yes/no/y/n` | `false`       |
//!
//! Debug builds fall back to the defaults with a warning. Release builds
//! require every toggle, reject an ephemeral key and refuse `SameSite=None`
//! on insecure cookies.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or invalid toggles fall back to defaults.
    Debug,
    /// Every toggle must be present and valid.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated cookie session settings.
pub struct SessionSettings {
    /// Signing and encryption key for the session cookie.
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// One environment toggle with its parser and debug fallback.
struct Toggle<T> {
    name: &'static str,
    expected: &'static str,
    parse: fn(&str) -> Option<T>,
    fallback: T,
}

impl<T: Copy + std::fmt::Debug> Toggle<T> {
    fn read<E: Env>(&self, env: &E, mode: BuildMode) -> Result<T, SessionConfigError> {
        let Some(raw) = env.string(self.name) else {
            return match mode {
                BuildMode::Debug => {
                    warn!(fallback = ?self.fallback, "{} not set; using default", self.name);
                    Ok(self.fallback)
                }
                BuildMode::Release => Err(SessionConfigError::MissingEnv { name: self.name }),
            };
        };
        match ((self.parse)(&raw), mode) {
            (Some(value), _) => Ok(value),
            (None, BuildMode::Debug) => {
                warn!(value = %raw, fallback = ?self.fallback, "invalid {}; using default", self.name);
                Ok(self.fallback)
            }
            (None, BuildMode::Release) => Err(SessionConfigError::InvalidEnv {
                name: self.name,
                value: raw,
                expected: self.expected,
            }),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

const COOKIE_SECURE: Toggle<bool> = Toggle {
    name: COOKIE_SECURE_ENV,
    expected: BOOL_EXPECTED,
    parse: parse_bool,
    fallback: true,
};

const SAME_SITE: Toggle<SameSite> = Toggle {
    name: SAMESITE_ENV,
    expected: SAMESITE_EXPECTED,
    parse: parse_same_site,
    fallback: SameSite::Lax,
};

const ALLOW_EPHEMERAL: Toggle<bool> = Toggle {
    name: ALLOW_EPHEMERAL_ENV,
    expected: BOOL_EXPECTED,
    parse: parse_bool,
    fallback: false,
};

/// Build session settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use backend::inbound::http::session_config::{session_settings_from_env, BuildMode};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).unwrap();
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = COOKIE_SECURE.read(env, mode)?;
    let same_site = SAME_SITE.read(env, mode)?;
    if same_site == SameSite::None && !cookie_secure {
        match mode {
            BuildMode::Debug => warn!(
                "SESSION_SAMESITE=None with insecure cookies; browsers may reject the session"
            ),
            BuildMode::Release => return Err(SessionConfigError::InsecureSameSiteNone),
        }
    }
    let allow_ephemeral = ALLOW_EPHEMERAL.read(env, mode)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn session_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(path = %path.display(), %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}
