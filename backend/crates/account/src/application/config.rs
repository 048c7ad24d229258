//! Application Configuration
//!
//! Configuration for the Account application layer.

use std::time::Duration;

use platform::cookie::SessionCookie;
/// Re-export SameSite from platform
pub use platform::cookie::SameSite;
use platform::crypto::derive_key;

use crate::domain::value_object::login_status::LOCK_THRESHOLD;

#[derive(Debug, Clone)]
pub struct AccountConfig {
    pub session_cookie: SessionCookie,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    pub session_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Consecutive failed logins that lock an account
    pub lock_threshold: u32,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            session_cookie: SessionCookie::default(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(24 * 3600), // 24 hours
            password_pepper: None,
            lock_threshold: LOCK_THRESHOLD,
        }
    }
}

impl AccountConfig {
    /// Signing key derived from an operator-supplied secret of any length.
    pub fn with_secret(secret: &str) -> Self {
        Self {
            session_secret: derive_key(secret),
            ..Default::default()
        }
    }

    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        let mut config = Self::with_random_secret();
        config.session_cookie.secure = false;
        config
    }

    pub fn session_ttl_ms(&self) -> i64 {
        self.session_ttl.as_millis() as i64
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
