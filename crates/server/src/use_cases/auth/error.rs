use pharmstock_domain::DomainError;

use crate::infrastructure::ports::{MailError, PasswordError, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Account is not activated yet. Use the setup link from your approval email.")]
    AccountDisabled,
    #[error("Invalid security key")]
    InvalidSecurityKey,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Mail(#[from] MailError),
}
