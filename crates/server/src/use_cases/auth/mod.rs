pub mod admin_login;
pub mod error;
pub mod forgot_password;
pub mod pharmacy_login;
pub mod set_password;
pub mod tokens;

use std::sync::Arc;

pub use admin_login::AdminLogin;
pub use error::AuthError;
pub use forgot_password::ForgotPassword;
pub use pharmacy_login::PharmacyLogin;
pub use set_password::{SetPassword, SetPasswordRequest};

pub struct AuthUseCases {
    pub admin_login: Arc<AdminLogin>,
    pub pharmacy_login: Arc<PharmacyLogin>,
    pub set_password: Arc<SetPassword>,
    pub forgot_password: Arc<ForgotPassword>,
}

impl AuthUseCases {
    pub fn new(
        admin_login: Arc<AdminLogin>,
        pharmacy_login: Arc<PharmacyLogin>,
        set_password: Arc<SetPassword>,
        forgot_password: Arc<ForgotPassword>,
    ) -> Self {
        Self {
            admin_login,
            pharmacy_login,
            set_password,
            forgot_password,
        }
    }
}
