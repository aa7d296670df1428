//! Route table

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{admin, health, owner, public, tenant};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(public::index))
        .route("/login/", get(public::login_page).post(public::login))
        .route("/logout/", get(public::logout).post(public::logout))
        .route("/health", get(health::health_check));

    let admin_routes = Router::new()
        .route("/admin-dashboard/", get(admin::dashboard))
        .route("/admin/owners/", get(admin::owners))
        .route("/admin/create-owner/", post(admin::create_owner))
        .route("/admin/owner/{id}/update/", post(admin::update_owner))
        .route("/admin/owner/{id}/delete/", post(admin::delete_owner))
        .route("/admin/owner/{id}/toggle-status/", post(admin::toggle_owner_status))
        .route("/admin/societies/", get(admin::societies))
        .route("/admin/create-society/", post(admin::create_society))
        .route("/admin/society/{id}/update/", post(admin::update_society))
        .route("/admin/society/{id}/delete/", post(admin::delete_society))
        .route("/admin/flats/", get(admin::flats))
        .route("/admin/create-flat/", post(admin::create_flat))
        .route("/admin/flat/{id}/update/", post(admin::update_flat))
        .route("/admin/flat/{id}/delete/", post(admin::delete_flat))
        .route("/admin/bills/", get(admin::bills))
        .route("/admin/create-bill/", post(admin::create_bill))
        .route("/admin/bill/{id}/update/", post(admin::update_bill))
        .route("/admin/bill/{id}/delete/", post(admin::delete_bill))
        .route("/admin/bill/{id}/toggle-status/", post(admin::toggle_bill_status));

    let owner_routes = Router::new()
        .route("/owner-dashboard/", get(owner::dashboard))
        .route("/owner/flats/", get(owner::flats))
        .route("/owner/bills/", get(owner::bills))
        .route("/owner/tenants/", get(owner::tenants))
        .route("/owner/create-tenant/", post(owner::create_tenant))
        .route("/owner/tenant/{id}/update/", post(owner::update_tenant))
        .route("/owner/tenant/{id}/delete/", post(owner::delete_tenant))
        .route("/owner/tenant/{id}/toggle-status/", post(owner::toggle_tenant_status));

    let tenant_routes = Router::new()
        .route("/tenant-dashboard/", get(tenant::dashboard))
        .route("/tenant/flat/", get(tenant::flat));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(owner_routes)
        .merge(tenant_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
