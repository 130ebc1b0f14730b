//! Single-use credential tokens: account setup links and password resets.
//!
//! Only a SHA-256 digest of the raw token is ever persisted; the raw value
//! lives in the emailed link and nowhere else.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{SetupTokenId, UserId};

pub const SETUP_TOKEN_TTL_HOURS: i64 = 48;
pub const RESET_TOKEN_TTL_HOURS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenPurpose {
    Setup,
    Reset,
}

impl TokenPurpose {
    pub fn ttl(self) -> Duration {
        match self {
            Self::Setup => Duration::hours(SETUP_TOKEN_TTL_HOURS),
            Self::Reset => Duration::hours(RESET_TOKEN_TTL_HOURS),
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "SETUP"),
            Self::Reset => write!(f, "RESET"),
        }
    }
}

impl FromStr for TokenPurpose {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SETUP" => Ok(Self::Setup),
            "RESET" => Ok(Self::Reset),
            other => Err(DomainError::parse(format!("Unknown token purpose: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupToken {
    pub id: SetupTokenId,
    pub user_id: UserId,
    /// Hex SHA-256 of the raw token string.
    pub token_hash: String,
    pub purpose: TokenPurpose,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SetupToken {
    pub fn issue(
        user_id: UserId,
        token_hash: impl Into<String>,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SetupTokenId::new(),
            user_id,
            token_hash: token_hash.into(),
            purpose,
            expires_at: now + purpose.ttl(),
            used_at: None,
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Consume the token. Fails if already used or expired.
    pub fn mark_used(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.used_at.is_some() {
            return Err(DomainError::invalid_state_transition(
                "Token has already been used",
            ));
        }
        if self.is_expired(now) {
            return Err(DomainError::invalid_state_transition("Token has expired"));
        }
        self.used_at = Some(now);
        Ok(())
    }
}
