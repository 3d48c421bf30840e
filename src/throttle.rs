//! Per-identity login throttling with cooldown windows.
//!
//! Tracks failed authentication attempts keyed by client identity (an IP
//! address). Five cumulative failures arm a five-minute cooldown during
//! which every attempt is rejected without consulting the credential.
//! Expiry is lazy: an expired record stays in the table and no longer
//! blocks, but its failure count carries over, so the next failure re-arms
//! the cooldown. Only a successful login deletes the record.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Failures allowed before an identity is placed in cooldown.
const MAX_ATTEMPTS: u32 = 5;

/// How long a cooldown lasts once armed.
const COOLDOWN_PERIOD: Duration = Duration::from_secs(5 * 60);

/// Outcome of one authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthResult {
    /// Credential matched; any throttle record was deleted.
    Allowed,
    /// Identity is in an active cooldown; credential was not consulted.
    TooManyAttempts,
    /// Credential did not match; failure recorded.
    BadCredential,
}

/// Throttle state for a single identity.
#[derive(Debug, Clone, Default)]
struct ThrottleRecord {
    /// Cumulative failures since the last successful login.
    failure_count: u32,
    /// When the cooldown expires (None = not armed).
    cooldown_until: Option<Instant>,
}

impl ThrottleRecord {
    fn is_in_cooldown(&self, now: Instant) -> bool {
        self.cooldown_until.map(|until| now < until).unwrap_or(false)
    }
}

/// Table of per-identity throttle records.
///
/// The whole check-and-record decision runs under a single lock so that
/// concurrent attempts from the same identity observe each other.
#[derive(Debug)]
pub struct LoginThrottle {
    records: Mutex<HashMap<String, ThrottleRecord>>,
    max_attempts: u32,
    cooldown_period: Duration,
}

impl LoginThrottle {
    pub fn new() -> Self {
        Self::with_limits(MAX_ATTEMPTS, COOLDOWN_PERIOD)
    }

    pub fn with_limits(max_attempts: u32, cooldown_period: Duration) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            max_attempts,
            cooldown_period,
        }
    }

    /// Evaluate one authentication attempt for `identity` at time `now`.
    ///
    /// Active cooldown wins over everything, including a correct credential.
    /// A correct credential outside cooldown deletes the identity's record.
    /// A wrong credential increments the cumulative failure count and, once
    /// that count reaches the attempt limit, (re-)arms the cooldown.
    pub async fn check_and_record(
        &self,
        identity: &str,
        supplied: &str,
        expected: &str,
        now: Instant,
    ) -> AuthResult {
        let mut records = self.records.lock().await;

        if let Some(record) = records.get(identity) {
            if record.is_in_cooldown(now) {
                return AuthResult::TooManyAttempts;
            }
        }

        if supplied == expected {
            records.remove(identity);
            return AuthResult::Allowed;
        }

        let record = records.entry(identity.to_string()).or_default();
        record.failure_count += 1;
        if record.failure_count >= self.max_attempts {
            record.cooldown_until = Some(now + self.cooldown_period);
            tracing::info!(
                identity = %identity,
                failure_count = record.failure_count,
                cooldown_secs = self.cooldown_period.as_secs(),
                "Identity placed in login cooldown"
            );
        }
        AuthResult::BadCredential
    }

    /// Cumulative failure count for an identity (0 if no record).
    pub async fn failure_count(&self, identity: &str) -> u32 {
        let records = self.records.lock().await;
        records.get(identity).map(|r| r.failure_count).unwrap_or(0)
    }
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "correct-horse";

    #[tokio::test]
    async fn test_correct_password_allowed() {
        let throttle = LoginThrottle::new();
        let now = Instant::now();
        let result = throttle
            .check_and_record("1.2.3.4", SECRET, SECRET, now)
            .await;
        assert_eq!(result, AuthResult::Allowed);
        assert_eq!(throttle.failure_count("1.2.3.4").await, 0);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected_and_counted() {
        let throttle = LoginThrottle::new();
        let now = Instant::now();
        let result = throttle
            .check_and_record("1.2.3.4", "nope", SECRET, now)
            .await;
        assert_eq!(result, AuthResult::BadCredential);
        assert_eq!(throttle.failure_count("1.2.3.4").await, 1);
    }

    #[tokio::test]
    async fn test_fifth_failure_arms_cooldown() {
        let throttle = LoginThrottle::new();
        let now = Instant::now();

        for _ in 0..4 {
            let result = throttle
                .check_and_record("1.2.3.4", "nope", SECRET, now)
                .await;
            assert_eq!(result, AuthResult::BadCredential);
        }
        // 5th failure still reports a bad credential but arms the cooldown.
        let fifth = throttle
            .check_and_record("1.2.3.4", "nope", SECRET, now)
            .await;
        assert_eq!(fifth, AuthResult::BadCredential);

        let sixth = throttle
            .check_and_record("1.2.3.4", "nope", SECRET, now + Duration::from_secs(1))
            .await;
        assert_eq!(sixth, AuthResult::TooManyAttempts);
        // The blocked attempt was not recorded as a failure.
        assert_eq!(throttle.failure_count("1.2.3.4").await, 5);
    }

    #[tokio::test]
    async fn test_cooldown_blocks_correct_password() {
        let throttle = LoginThrottle::new();
        let now = Instant::now();
        for _ in 0..5 {
            throttle
                .check_and_record("1.2.3.4", "nope", SECRET, now)
                .await;
        }
        let result = throttle
            .check_and_record("1.2.3.4", SECRET, SECRET, now + Duration::from_secs(60))
            .await;
        assert_eq!(result, AuthResult::TooManyAttempts);
    }

    #[tokio::test]
    async fn test_success_deletes_record() {
        let throttle = LoginThrottle::new();
        let now = Instant::now();
        for _ in 0..3 {
            throttle
                .check_and_record("1.2.3.4", "nope", SECRET, now)
                .await;
        }
        assert_eq!(throttle.failure_count("1.2.3.4").await, 3);

        let result = throttle
            .check_and_record("1.2.3.4", SECRET, SECRET, now)
            .await;
        assert_eq!(result, AuthResult::Allowed);
        assert_eq!(throttle.failure_count("1.2.3.4").await, 0);
    }

    #[tokio::test]
    async fn test_expired_cooldown_no_longer_blocks() {
        let throttle = LoginThrottle::new();
        let now = Instant::now();
        for _ in 0..5 {
            throttle
                .check_and_record("1.2.3.4", "nope", SECRET, now)
                .await;
        }
        let after_expiry = now + COOLDOWN_PERIOD + Duration::from_secs(1);
        let result = throttle
            .check_and_record("1.2.3.4", SECRET, SECRET, after_expiry)
            .await;
        assert_eq!(result, AuthResult::Allowed);
    }

    #[tokio::test]
    async fn test_failure_after_expiry_rearms_cooldown() {
        let throttle = LoginThrottle::new();
        let now = Instant::now();
        for _ in 0..5 {
            throttle
                .check_and_record("1.2.3.4", "nope", SECRET, now)
                .await;
        }
        // Counts are cumulative, so the 6th failure after expiry is already
        // past the threshold and starts a fresh cooldown.
        let after_expiry = now + COOLDOWN_PERIOD + Duration::from_secs(1);
        let sixth = throttle
            .check_and_record("1.2.3.4", "nope", SECRET, after_expiry)
            .await;
        assert_eq!(sixth, AuthResult::BadCredential);
        assert_eq!(throttle.failure_count("1.2.3.4").await, 6);

        let blocked = throttle
            .check_and_record("1.2.3.4", SECRET, SECRET, after_expiry + Duration::from_secs(1))
            .await;
        assert_eq!(blocked, AuthResult::TooManyAttempts);
    }

    #[tokio::test]
    async fn test_custom_limits_are_honored() {
        let throttle = LoginThrottle::with_limits(2, Duration::from_secs(30));
        let now = Instant::now();
        for _ in 0..2 {
            throttle
                .check_and_record("1.2.3.4", "nope", SECRET, now)
                .await;
        }
        let blocked = throttle
            .check_and_record("1.2.3.4", SECRET, SECRET, now + Duration::from_secs(29))
            .await;
        assert_eq!(blocked, AuthResult::TooManyAttempts);

        let allowed = throttle
            .check_and_record("1.2.3.4", SECRET, SECRET, now + Duration::from_secs(31))
            .await;
        assert_eq!(allowed, AuthResult::Allowed);
    }

    #[tokio::test]
    async fn test_identities_are_independent() {
        let throttle = LoginThrottle::new();
        let now = Instant::now();
        for _ in 0..5 {
            throttle
                .check_and_record("1.2.3.4", "nope", SECRET, now)
                .await;
        }
        let other = throttle
            .check_and_record("5.6.7.8", SECRET, SECRET, now)
            .await;
        assert_eq!(other, AuthResult::Allowed);
    }
}
