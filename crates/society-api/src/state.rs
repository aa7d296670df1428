use std::sync::Arc;

use society_core::notification::CredentialNotifier;
use society_core::repositories::Repositories;
use society_core::services::{
    AuthService, BillService, DashboardService, FlatService, OwnerService, SocietyService, TenantService,
};
use society_security::JwtService;
use society_shared::config::SessionSettings;

use crate::views::{ViewError, Views};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub owners: Arc<OwnerService>,
    pub societies: Arc<SocietyService>,
    pub flats: Arc<FlatService>,
    pub bills: Arc<BillService>,
    pub tenants: Arc<TenantService>,
    pub dashboards: Arc<DashboardService>,
    pub views: Arc<Views>,
    /// Adds `Secure` to the session cookie.
    pub secure_cookie: bool,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        notifier: Arc<dyn CredentialNotifier>,
        session: &SessionSettings,
    ) -> Result<Self, ViewError> {
        let jwt = JwtService::new(&session.secret, session.expiry_seconds);
        Ok(Self {
            auth: Arc::new(AuthService::new(repos.users.clone(), jwt)),
            owners: Arc::new(OwnerService::new(repos.users.clone(), notifier.clone())),
            societies: Arc::new(SocietyService::new(repos.societies.clone())),
            flats: Arc::new(FlatService::new(&repos)),
            bills: Arc::new(BillService::new(&repos)),
            tenants: Arc::new(TenantService::new(&repos, notifier)),
            dashboards: Arc::new(DashboardService::new(repos)),
            views: Arc::new(Views::new()?),
            secure_cookie: session.secure_cookie,
        })
    }
}
