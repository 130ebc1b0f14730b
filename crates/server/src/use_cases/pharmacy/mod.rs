pub mod approve;
pub mod error;
pub mod list;
pub mod register;
pub mod reject;
pub mod update_profile;

use std::sync::Arc;

pub use approve::{ApprovalOutcome, ApprovePharmacy};
pub use error::PharmacyError;
pub use list::ListPharmacies;
pub use register::RegisterPharmacy;
pub use reject::RejectPharmacy;
pub use update_profile::{ProfileUpdate, UpdatePharmacyProfile};

pub struct PharmacyUseCases {
    pub register: Arc<RegisterPharmacy>,
    pub approve: Arc<ApprovePharmacy>,
    pub reject: Arc<RejectPharmacy>,
    pub list: Arc<ListPharmacies>,
    pub update_profile: Arc<UpdatePharmacyProfile>,
}

impl PharmacyUseCases {
    pub fn new(
        register: Arc<RegisterPharmacy>,
        approve: Arc<ApprovePharmacy>,
        reject: Arc<RejectPharmacy>,
        list: Arc<ListPharmacies>,
        update_profile: Arc<UpdatePharmacyProfile>,
    ) -> Self {
        Self {
            register,
            approve,
            reject,
            list,
            update_profile,
        }
    }
}
