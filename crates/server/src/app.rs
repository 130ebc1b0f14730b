//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    ports::{
        ActivityRepo, ClockPort, DrugLabelPort, InventoryRepo, LocationRepo, MailerPort,
        MedicineRepo, PasswordHasherPort, PharmacyRepo, TokenRepo, UserRepo,
    },
    session::SessionStore,
    sqlite::SqliteRepositories,
};
use crate::use_cases;

/// Settings that cannot be derived from the repositories themselves.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Shared secret required alongside admin credentials.
    pub admin_security_key: String,
    /// Frontend page that consumes the password setup token.
    pub setup_base_url: String,
    /// Frontend page that consumes the password reset token.
    pub reset_base_url: String,
    pub session_ttl_hours: i64,
}

/// Main application state.
///
/// Holds the repositories, the use cases and the session store.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub sessions: SessionStore,
    pub clock: Arc<dyn ClockPort>,
    pub drug_label: Arc<dyn DrugLabelPort>,
}

/// Container for all repository ports. Handlers reach for these directly
/// for thin reads; writes go through the use cases.
pub struct Repositories {
    pub medicine: Arc<dyn MedicineRepo>,
    pub pharmacy: Arc<dyn PharmacyRepo>,
    pub user: Arc<dyn UserRepo>,
    pub inventory: Arc<dyn InventoryRepo>,
    pub activity: Arc<dyn ActivityRepo>,
    pub token: Arc<dyn TokenRepo>,
    pub location: Arc<dyn LocationRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub auth: use_cases::AuthUseCases,
    pub pharmacy: use_cases::PharmacyUseCases,
    pub catalog: use_cases::CatalogUseCases,
    pub inventory: use_cases::InventoryUseCases,
    pub listing: use_cases::ListingUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repos: SqliteRepositories,
        hasher: Arc<dyn PasswordHasherPort>,
        mailer: Arc<dyn MailerPort>,
        drug_label: Arc<dyn DrugLabelPort>,
        config: AppConfig,
    ) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

        let auth = use_cases::AuthUseCases::new(
            Arc::new(use_cases::auth::AdminLogin::new(
                repos.user.clone(),
                hasher.clone(),
                config.admin_security_key.clone(),
            )),
            Arc::new(use_cases::auth::PharmacyLogin::new(
                repos.user.clone(),
                hasher.clone(),
            )),
            Arc::new(use_cases::auth::SetPassword::new(
                repos.token.clone(),
                repos.user.clone(),
                repos.location.clone(),
                hasher.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::auth::ForgotPassword::new(
                repos.user.clone(),
                repos.token.clone(),
                mailer.clone(),
                clock.clone(),
                config.reset_base_url.clone(),
            )),
        );

        let pharmacy = use_cases::PharmacyUseCases::new(
            Arc::new(use_cases::pharmacy::RegisterPharmacy::new(
                repos.pharmacy.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::pharmacy::ApprovePharmacy::new(
                repos.pharmacy.clone(),
                repos.user.clone(),
                repos.token.clone(),
                mailer.clone(),
                clock.clone(),
                config.setup_base_url.clone(),
            )),
            Arc::new(use_cases::pharmacy::RejectPharmacy::new(
                repos.pharmacy.clone(),
                mailer.clone(),
            )),
            Arc::new(use_cases::pharmacy::ListPharmacies::new(
                repos.pharmacy.clone(),
            )),
            Arc::new(use_cases::pharmacy::UpdatePharmacyProfile::new(
                repos.pharmacy.clone(),
            )),
        );

        let catalog = use_cases::CatalogUseCases::new(
            Arc::new(use_cases::catalog::ManageCatalog::new(
                repos.medicine.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::catalog::SearchCatalog::new(
                repos.medicine.clone(),
            )),
            Arc::new(use_cases::catalog::SuggestMedicines::new(
                repos.medicine.clone(),
            )),
            Arc::new(use_cases::catalog::DashboardSummaryQuery::new(
                repos.medicine.clone(),
                repos.pharmacy.clone(),
                repos.inventory.clone(),
            )),
        );

        let inventory = use_cases::InventoryUseCases::new(
            Arc::new(use_cases::inventory::UpsertInventoryItem::new(
                repos.inventory.clone(),
                repos.medicine.clone(),
                repos.activity.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::inventory::UpdateInventoryItem::new(
                repos.inventory.clone(),
                repos.medicine.clone(),
                repos.activity.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::inventory::RemoveInventoryItem::new(
                repos.inventory.clone(),
                repos.medicine.clone(),
                repos.activity.clone(),
                clock.clone(),
            )),
        );

        let listing = use_cases::ListingUseCases::new(Arc::new(
            use_cases::listing::PublicInventoryListing::new(
                repos.pharmacy.clone(),
                repos.inventory.clone(),
                repos.location.clone(),
            ),
        ));

        let repositories = Repositories {
            medicine: repos.medicine,
            pharmacy: repos.pharmacy,
            user: repos.user,
            inventory: repos.inventory,
            activity: repos.activity,
            token: repos.token,
            location: repos.location,
        };

        Self {
            repositories,
            use_cases: UseCases {
                auth,
                pharmacy,
                catalog,
                inventory,
                listing,
            },
            sessions: SessionStore::new(config.session_ttl_hours),
            clock,
            drug_label,
        }
    }
}
