//! Login Status
//!
//! The failed-attempt / lockout state machine.
//!
//! ```text
//! Active(n) --mismatch--> Active(n + 1)   while n + 1 < threshold
//! Active(n) --mismatch--> Locked          when  n + 1 >= threshold
//! Active(n) --match-----> Active(0)
//! Locked                                  terminal for login attempts
//! ```
//!
//! Only an administrator unlock leaves `Locked`.

use serde::{Deserialize, Serialize};

/// Consecutive mismatches that lock an account.
pub const LOCK_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginStatus {
    Active { failed_logins: u32 },
    Locked { failed_logins: u32 },
}

impl Default for LoginStatus {
    fn default() -> Self {
        LoginStatus::Active { failed_logins: 0 }
    }
}

impl LoginStatus {
    pub fn from_counters(failed_logins: u32, locked: bool) -> Self {
        if locked {
            LoginStatus::Locked { failed_logins }
        } else {
            LoginStatus::Active { failed_logins }
        }
    }

    pub fn after_mismatch(self, threshold: u32) -> Self {
        match self {
            LoginStatus::Active { failed_logins } => {
                let failed_logins = failed_logins.saturating_add(1);
                if failed_logins >= threshold {
                    LoginStatus::Locked { failed_logins }
                } else {
                    LoginStatus::Active { failed_logins }
                }
            }
            locked @ LoginStatus::Locked { .. } => locked,
        }
    }

    /// A correct password clears the counter; it never clears a lock.
    pub fn after_match(self) -> Self {
        match self {
            LoginStatus::Active { .. } => LoginStatus::Active { failed_logins: 0 },
            locked @ LoginStatus::Locked { .. } => locked,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, LoginStatus::Locked { .. })
    }

    pub fn failed_logins(&self) -> u32 {
        match self {
            LoginStatus::Active { failed_logins } | LoginStatus::Locked { failed_logins } => {
                *failed_logins
            }
        }
    }
}

/// Counters as persisted after a failed-login increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginCounters {
    pub failed_logins: u32,
    pub locked: bool,
}

impl From<LoginStatus> for LoginCounters {
    fn from(status: LoginStatus) -> Self {
        Self {
            failed_logins: status.failed_logins(),
            locked: status.is_locked(),
        }
    }
}

/// Outcome of a conditional login-counter write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterUpdate {
    Applied(LoginCounters),
    /// The row is locked; nothing was written.
    Locked,
    /// The account no longer exists.
    Missing,
}
