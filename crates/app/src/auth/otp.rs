//! One-time passcodes.
//!
//! Codes are six digits, live for ten minutes and allow five verification attempts.
//! Storage sits behind [`OtpStore`]; the in-memory store assumes a single instance.

use std::fmt;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use rand::{Rng, rngs::OsRng};
use rustc_hash::FxHashMap;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use zeroize::Zeroizing;

use crate::domain::users::models::UserUuid;

/// Lifetime of an issued code.
pub const OTP_TTL: SignedDuration = SignedDuration::from_mins(10);

/// Verification attempts allowed per code.
pub const OTP_MAX_ATTEMPTS: u8 = 5;

/// What a code was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
    AdminLogin,
    UserSignup,
    UserLogin,
}

impl OtpPurpose {
    /// Heading used in the passcode email.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::AdminLogin => "Admin Login OTP",
            Self::UserSignup => "Signup OTP",
            Self::UserLogin => "Login OTP",
        }
    }

    /// Admin codes live in their own key space so an admin and a customer
    /// sharing an address never overwrite each other's code.
    #[must_use]
    pub fn store_key(self, email: &str) -> String {
        match self {
            Self::AdminLogin => format!("admin:{email}"),
            Self::UserSignup | Self::UserLogin => format!("user:{email}"),
        }
    }
}

/// Data carried from the init step to the verify step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpPayload {
    None,
    Signup { full_name: String },
    Login { user: UserUuid },
}

/// A pending code.
#[derive(Clone)]
pub struct OtpEntry {
    pub code: Zeroizing<String>,
    pub purpose: OtpPurpose,
    pub expires_at: Timestamp,
    pub attempts: u8,
    pub payload: OtpPayload,
}

impl fmt::Debug for OtpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpEntry")
            .field("code", &"**redacted**")
            .field("purpose", &self.purpose)
            .field("expires_at", &self.expires_at)
            .field("attempts", &self.attempts)
            .field("payload", &self.payload)
            .finish()
    }
}

/// Why a submitted code was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpFailure {
    NotRequested,
    TooManyAttempts,
    Expired,
    Mismatch,
}

/// Outcome of checking a submitted code against a stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpCheck {
    /// Accepted; the entry must be removed.
    Accepted(OtpPayload),

    /// Rejected; the entry must be removed.
    Discard(OtpFailure),

    /// Rejected; the entry stays with its attempt count bumped.
    Retry(OtpFailure),
}

impl OtpEntry {
    /// Issue a fresh entry expiring [`OTP_TTL`] after `now`.
    #[must_use]
    pub fn issue(purpose: OtpPurpose, payload: OtpPayload, now: Timestamp) -> Self {
        Self {
            code: generate_code(),
            purpose,
            expires_at: now.checked_add(OTP_TTL).unwrap_or(Timestamp::MAX),
            attempts: 0,
            payload,
        }
    }

    /// Check a submitted code. Attempts are counted before expiry and equality are
    /// examined, so an exhausted entry is rejected even with the right code.
    pub fn check(&mut self, purpose: OtpPurpose, submitted: &str, now: Timestamp) -> OtpCheck {
        if self.purpose != purpose {
            return OtpCheck::Retry(OtpFailure::NotRequested);
        }

        if self.attempts >= OTP_MAX_ATTEMPTS {
            return OtpCheck::Discard(OtpFailure::TooManyAttempts);
        }

        self.attempts = self.attempts.saturating_add(1);

        if now > self.expires_at {
            return OtpCheck::Discard(OtpFailure::Expired);
        }

        let matches: bool = submitted
            .trim()
            .as_bytes()
            .ct_eq(self.code.as_bytes())
            .into();

        if matches {
            OtpCheck::Accepted(self.payload.clone())
        } else {
            OtpCheck::Retry(OtpFailure::Mismatch)
        }
    }
}

/// Six random digits.
#[must_use]
pub fn generate_code() -> Zeroizing<String> {
    Zeroizing::new(OsRng.gen_range(100_000..1_000_000_u32).to_string())
}

/// Keyed storage for pending codes.
#[automock]
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Fetch the pending entry for a key.
    async fn get(&self, key: &str) -> Option<OtpEntry>;

    /// Store or replace the entry for a key.
    async fn set(&self, key: &str, entry: OtpEntry);

    /// Remove the entry for a key.
    async fn delete(&self, key: &str);
}

/// Process-local [`OtpStore`]. Expired entries are swept on every write.
#[derive(Debug, Default)]
pub struct InMemoryOtpStore {
    entries: Mutex<FxHashMap<String, OtpEntry>>,
}

impl InMemoryOtpStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn get(&self, key: &str) -> Option<OtpEntry> {
        self.entries.lock().await.get(key).cloned()
    }

    async fn set(&self, key: &str, entry: OtpEntry) {
        let now = Timestamp::now();
        let mut entries = self.entries.lock().await;

        entries.retain(|_, pending| pending.expires_at >= now);
        entries.insert(key.to_string(), entry);
    }

    async fn delete(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}
