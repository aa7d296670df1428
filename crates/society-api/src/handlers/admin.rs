//! Administrator pages and actions
//!
//! Every action ends in a 303 back to its list page with a notice.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    Form,
};
use chrono::{Datelike, Local};
use serde_json::json;
use tracing::info;

use society_core::domain::Month;

use super::{activation, finish, path_id};
use crate::error::PageError;
use crate::extract::AdminUser;
use crate::forms::{BillForm, FlatForm, OwnerForm, SocietyForm};
use crate::response::render_page;
use crate::state::AppState;

const OWNERS: &str = "/admin/owners/";
const SOCIETIES: &str = "/admin/societies/";
const FLATS: &str = "/admin/flats/";
const BILLS: &str = "/admin/bills/";

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// GET /admin-dashboard/
pub async fn dashboard(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let dashboard = state.dashboards.admin().await?;
    render_page(&state.views, "admin/dashboard", &headers, Some(&admin), json!({ "dashboard": dashboard }))
}

/// GET /admin/owners/
pub async fn owners(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let owners = state.owners.list().await?;
    render_page(&state.views, "admin/owners", &headers, Some(&admin), json!({ "owners": owners }))
}

/// GET /admin/societies/
pub async fn societies(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let societies = state.societies.list().await?;
    render_page(&state.views, "admin/societies", &headers, Some(&admin), json!({ "societies": societies }))
}

/// GET /admin/flats/
pub async fn flats(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let flats = state.flats.list().await?;
    let societies = state.flats.societies().await?;
    let owners = state.owners.list_active().await?;
    render_page(
        &state.views,
        "admin/flats",
        &headers,
        Some(&admin),
        json!({ "flats": flats, "societies": societies, "owners": owners }),
    )
}

/// GET /admin/bills/
pub async fn bills(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let bills = state.bills.list().await?;
    let flats = state.bills.billable_flats().await?;
    let today = Local::now();
    let months: Vec<_> = Month::ALL
        .iter()
        .map(|m| json!({ "value": m.as_str(), "label": m.label() }))
        .collect();
    let current_month = Month::ALL
        .get(today.month0() as usize)
        .map(Month::as_str)
        .unwrap_or("JANUARY");
    render_page(
        &state.views,
        "admin/bills",
        &headers,
        Some(&admin),
        json!({
            "bills": bills,
            "flats": flats,
            "months": months,
            "current_year": today.year(),
            "current_month": current_month,
        }),
    )
}

// ---------------------------------------------------------------------------
// Owners
// ---------------------------------------------------------------------------

/// POST /admin/create-owner/
pub async fn create_owner(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Form(form): Form<OwnerForm>,
) -> Response {
    let result = async {
        let account = form.into_new_account()?;
        state.owners.create(account).await
    }
    .await;
    finish(
        OWNERS,
        result,
        |owner| {
            info!("Owner {} created", owner.id);
            format!("Owner account for {} created successfully.", owner.full_name())
        },
        "An unexpected error occurred while creating the owner.",
    )
}

/// POST /admin/owner/{id}/update/
pub async fn update_owner(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    Form(form): Form<OwnerForm>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Owner not found.")?;
        let (update, password) = form.into_update()?;
        state.owners.update(&id, update, password).await
    }
    .await;
    finish(
        OWNERS,
        result,
        |owner| format!("Owner details for {} updated successfully.", owner.full_name()),
        "An system error occurred while updating the owner.",
    )
}

/// POST /admin/owner/{id}/delete/
pub async fn delete_owner(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Owner not found.")?;
        state.owners.delete(&id).await
    }
    .await;
    finish(
        OWNERS,
        result,
        |owner| format!("Owner {} has been deleted permanently.", owner.full_name()),
        "An unexpected error occurred during deletion.",
    )
}

/// POST /admin/owner/{id}/toggle-status/
pub async fn toggle_owner_status(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Owner not found.")?;
        state.owners.toggle_status(&id).await
    }
    .await;
    finish(
        OWNERS,
        result,
        |owner| format!("Owner {} has been {}.", owner.full_name(), activation(owner.is_active)),
        "Failed to change owner status.",
    )
}

// ---------------------------------------------------------------------------
// Societies
// ---------------------------------------------------------------------------

/// POST /admin/create-society/
pub async fn create_society(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Form(form): Form<SocietyForm>,
) -> Response {
    let result = async {
        let (name, address) = form.into_parts()?;
        state.societies.create(name, address).await
    }
    .await;
    finish(
        SOCIETIES,
        result,
        |society| format!("Society \"{}\" created successfully.", society.name),
        "An unexpected error occurred while creating the society.",
    )
}

/// POST /admin/society/{id}/update/
pub async fn update_society(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    Form(form): Form<SocietyForm>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Society not found.")?;
        let (name, address) = form.into_parts()?;
        state.societies.update(&id, name, address).await
    }
    .await;
    finish(
        SOCIETIES,
        result,
        |society| format!("Society \"{}\" updated successfully.", society.name),
        "An unexpected error occurred while updating the society.",
    )
}

/// POST /admin/society/{id}/delete/
pub async fn delete_society(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Society not found.")?;
        state.societies.delete(&id).await
    }
    .await;
    finish(
        SOCIETIES,
        result,
        |society| format!("Society \"{}\" deleted successfully.", society.name),
        "An unexpected error occurred during deletion.",
    )
}

// ---------------------------------------------------------------------------
// Flats
// ---------------------------------------------------------------------------

/// POST /admin/create-flat/
pub async fn create_flat(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Form(form): Form<FlatForm>,
) -> Response {
    let result = async {
        let assignment = form.into_assignment()?;
        state.flats.create(assignment).await
    }
    .await;
    finish(
        FLATS,
        result,
        |(flat, society)| format!("Flat {} created successfully in {}.", flat.flat_number, society.name),
        "An unexpected error occurred while creating the flat.",
    )
}

/// POST /admin/flat/{id}/update/
pub async fn update_flat(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    Form(form): Form<FlatForm>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Flat not found.")?;
        let assignment = form.into_assignment()?;
        state.flats.update(&id, assignment).await
    }
    .await;
    finish(
        FLATS,
        result,
        |flat| format!("Flat {} updated successfully.", flat.flat_number),
        "An unexpected error occurred while updating the flat.",
    )
}

/// POST /admin/flat/{id}/delete/
pub async fn delete_flat(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Flat not found.")?;
        state.flats.delete(&id).await
    }
    .await;
    finish(
        FLATS,
        result,
        |flat| format!("Flat {} deleted successfully.", flat.flat_number),
        "An unexpected error occurred during deletion.",
    )
}

// ---------------------------------------------------------------------------
// Bills
// ---------------------------------------------------------------------------

/// POST /admin/create-bill/
pub async fn create_bill(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Form(form): Form<BillForm>,
) -> Response {
    let result = async {
        let terms = form.into_new_terms()?;
        state.bills.create(terms).await
    }
    .await;
    finish(
        BILLS,
        result,
        |(bill, flat)| {
            format!(
                "Bill generated for {} ({} {}) successfully.",
                flat.flat_number,
                bill.month.as_str(),
                bill.year
            )
        },
        "An unexpected error occurred while generating the bill.",
    )
}

/// POST /admin/bill/{id}/update/
pub async fn update_bill(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    Form(form): Form<BillForm>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Bill not found.")?;
        let terms = form.into_updated_terms()?;
        state.bills.update(&id, terms).await
    }
    .await;
    finish(
        BILLS,
        result,
        |_| "Bill updated successfully.".to_string(),
        "An unexpected error occurred while updating the bill.",
    )
}

/// POST /admin/bill/{id}/delete/
pub async fn delete_bill(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Bill not found.")?;
        state.bills.delete(&id).await
    }
    .await;
    finish(
        BILLS,
        result,
        |_| "Bill deleted successfully.".to_string(),
        "An unexpected error occurred while deleting the bill.",
    )
}

/// POST /admin/bill/{id}/toggle-status/
pub async fn toggle_bill_status(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = path_id(&id, "Bill not found.")?;
        state.bills.toggle_status(&id).await
    }
    .await;
    finish(
        BILLS,
        result,
        |(bill, flat)| format!("Bill for Flat {} marked as {}.", flat.flat_number, bill.status.as_str()),
        "Failed to update bill status.",
    )
}
