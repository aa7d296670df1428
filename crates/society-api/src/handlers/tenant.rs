use axum::{extract::State, http::HeaderMap, response::Response};
use serde_json::json;

use crate::error::PageError;
use crate::extract::TenantUser;
use crate::response::render_page;
use crate::state::AppState;

/// GET /tenant-dashboard/ - renders an empty state when no lease is linked
pub async fn dashboard(
    State(state): State<AppState>,
    TenantUser(tenant): TenantUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let overview = state.dashboards.tenant(&tenant.id).await?;
    render_page(&state.views, "tenant/dashboard", &headers, Some(&tenant), json!({ "overview": overview }))
}

/// GET /tenant/flat/
pub async fn flat(
    State(state): State<AppState>,
    TenantUser(tenant): TenantUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let overview = state.dashboards.tenant(&tenant.id).await?;
    render_page(&state.views, "tenant/flat", &headers, Some(&tenant), json!({ "overview": overview }))
}
