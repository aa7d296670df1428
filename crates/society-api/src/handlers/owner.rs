//! Owner pages and tenant management
//!
//! Every lookup is scoped to flats owned by the signed-in owner.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
    Form,
};
use serde_json::json;

use super::{activation, finish, path_id};
use crate::error::PageError;
use crate::extract::OwnerUser;
use crate::forms::{BillStatusQuery, TenantForm};
use crate::response::render_page;
use crate::state::AppState;

const TENANTS: &str = "/owner/tenants/";

/// GET /owner-dashboard/
pub async fn dashboard(
    State(state): State<AppState>,
    OwnerUser(owner): OwnerUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let dashboard = state.dashboards.owner(&owner.id).await?;
    render_page(&state.views, "owner/dashboard", &headers, Some(&owner), json!({ "dashboard": dashboard }))
}

/// GET /owner/flats/
pub async fn flats(
    State(state): State<AppState>,
    OwnerUser(owner): OwnerUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let flats = state.dashboards.owner_flats(&owner.id).await?;
    render_page(&state.views, "owner/flats", &headers, Some(&owner), json!({ "flats": flats }))
}

/// GET /owner/bills/?status=PAID|UNPAID
pub async fn bills(
    State(state): State<AppState>,
    OwnerUser(owner): OwnerUser,
    Query(query): Query<BillStatusQuery>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let status = query.status();
    let bills = state.dashboards.owner_bills(&owner.id, status).await?;
    render_page(
        &state.views,
        "owner/bills",
        &headers,
        Some(&owner),
        json!({ "bills": bills, "status_filter": status }),
    )
}

/// GET /owner/tenants/
pub async fn tenants(
    State(state): State<AppState>,
    OwnerUser(owner): OwnerUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let tenants = state.tenants.list(&owner.id).await?;
    let flats = state.tenants.owner_flats(&owner.id).await?;
    render_page(
        &state.views,
        "owner/tenants",
        &headers,
        Some(&owner),
        json!({ "tenants": tenants, "flats": flats }),
    )
}

/// POST /owner/create-tenant/
pub async fn create_tenant(
    State(state): State<AppState>,
    OwnerUser(owner): OwnerUser,
    Form(form): Form<TenantForm>,
) -> Response {
    let result = async {
        let input = form.into_new_tenant()?;
        state.tenants.create(&owner.id, input).await
    }
    .await;
    finish(
        TENANTS,
        result,
        |user| format!("Tenant {} created successfully.", user.full_name()),
        "An system error occurred while creating the tenant.",
    )
}

/// POST /owner/tenant/{id}/update/
pub async fn update_tenant(
    State(state): State<AppState>,
    OwnerUser(owner): OwnerUser,
    Path(id): Path<String>,
    Form(form): Form<TenantForm>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Tenant not found.")?;
        let input = form.into_update()?;
        state.tenants.update(&owner.id, &id, input).await
    }
    .await;
    finish(
        TENANTS,
        result,
        |user| format!("Tenant {} updated successfully.", user.full_name()),
        "An unexpected error occurred while updating the tenant.",
    )
}

/// POST /owner/tenant/{id}/delete/
pub async fn delete_tenant(
    State(state): State<AppState>,
    OwnerUser(owner): OwnerUser,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Tenant not found.")?;
        state.tenants.delete(&owner.id, &id).await
    }
    .await;
    finish(
        TENANTS,
        result,
        |_| "Tenant account deleted successfully.".to_string(),
        "An unexpected error occurred during deletion.",
    )
}

/// POST /owner/tenant/{id}/toggle-status/
pub async fn toggle_tenant_status(
    State(state): State<AppState>,
    OwnerUser(owner): OwnerUser,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Tenant not found.")?;
        state.tenants.toggle_status(&owner.id, &id).await
    }
    .await;
    finish(
        TENANTS,
        result,
        |(tenant, user)| format!("Tenant {} {}.", user.full_name(), activation(tenant.is_active)),
        "Failed to update tenant status.",
    )
}
