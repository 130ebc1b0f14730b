//! Login identities. One PHARMACY user per approved pharmacy, plus the
//! bootstrap ADMIN account.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{PharmacyId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Pharmacy,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "ADMIN"),
            Self::Pharmacy => write!(f, "PHARMACY"),
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "PHARMACY" => Ok(Self::Pharmacy),
            other => Err(DomainError::parse(format!("Unknown role: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Login identifier; for pharmacy accounts this is the pharmacy's email.
    pub username: String,
    /// Argon2id hash; `None` until the setup token has been redeemed.
    pub password_hash: Option<String>,
    pub role: Role,
    pub pharmacy_id: Option<PharmacyId>,
    pub enabled: bool,
}

impl User {
    /// A freshly-approved pharmacy account: disabled, no password, waiting
    /// for the owner to redeem the setup link.
    pub fn pending_pharmacy(username: impl Into<String>, pharmacy_id: PharmacyId) -> Self {
        Self {
            id: UserId::new(),
            username: username.into().trim().to_ascii_lowercase(),
            password_hash: None,
            role: Role::Pharmacy,
            pharmacy_id: Some(pharmacy_id),
            enabled: false,
        }
    }

    pub fn admin(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into().trim().to_ascii_lowercase(),
            password_hash: Some(password_hash.into()),
            role: Role::Admin,
            pharmacy_id: None,
            enabled: true,
        }
    }

    /// Setting a password via a redeemed token also enables the account.
    pub fn activate(&mut self, password_hash: impl Into<String>) {
        self.password_hash = Some(password_hash.into());
        self.enabled = true;
    }
}
