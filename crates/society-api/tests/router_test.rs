use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{Datelike, Local};
use tower::ServiceExt;

use society_api::notice::{read_notices, Notice, NoticeLevel};
use society_api::{build_router, AppState};
use society_core::domain::NewAccount;
use society_core::repositories::Repositories;
use society_infrastructure::LogNotifier;
use society_shared::config::SessionSettings;

struct TestApp {
    router: Router,
    state: AppState,
}

const ADMIN_PASSWORD: &str = "Adm1n-Secret";

async fn app() -> TestApp {
    let session = SessionSettings {
        secret: "router-test-secret".into(),
        expiry_seconds: 3600,
        secure_cookie: false,
    };
    let state = AppState::new(Repositories::in_memory(), Arc::new(LogNotifier), &session).unwrap();
    state
        .auth
        .create_superuser(NewAccount {
            email: "admin@example.com".into(),
            username: "admin".into(),
            first_name: "Site".into(),
            last_name: "Admin".into(),
            phone: None,
            password: ADMIN_PASSWORD.into(),
        })
        .await
        .unwrap();
    TestApp { router: build_router(state.clone()), state }
}

impl TestApp {
    async fn get(&self, uri: &str, session: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = session {
            request = request.header(header::COOKIE, cookie);
        }
        self.router.clone().oneshot(request.body(Body::empty()).unwrap()).await.unwrap()
    }

    async fn post(&self, uri: &str, session: Option<&str>, form: &str) -> Response {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = session {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::from(form.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// Logs in and returns the `session_token=...` cookie pair.
    async fn login(&self, identifier: &str, password: &str) -> String {
        let response = self
            .post("/login/", None, &format!("email={}&password={}", identifier, password))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        cookie_pair(&response, "session_token=").expect("session cookie")
    }

    async fn create_owner(&self, admin: &str, username: &str) -> uuid::Uuid {
        let form = format!(
            "email={u}@example.com&username={u}&first_name=Anil&last_name=Kapoor&phone=&password=Owner-Pass1",
            u = username
        );
        let response = self.post("/admin/create-owner/", Some(admin), &form).await;
        assert_eq!(notices(&response)[0].level, NoticeLevel::Success);
        let owners = self.state.owners.list().await.unwrap();
        owners.iter().find(|o| o.username == username).unwrap().id
    }
}

fn cookie_pair(response: &Response, prefix: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(prefix))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

fn notices(response: &Response) -> Vec<Notice> {
    let Some(pair) = cookie_pair(response, "notice=") else {
        return Vec::new();
    };
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());
    read_notices(&headers)
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("healthy"));
}

#[tokio::test]
async fn test_gated_route_without_session_redirects_to_login() {
    let app = app().await;
    for uri in ["/admin-dashboard/", "/owner/tenants/", "/tenant/flat/"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login/");
    }

    let response = app.get("/admin/bills/", Some("session_token=not-a-jwt")).await;
    assert_eq!(location(&response), "/login/");
}

#[tokio::test]
async fn test_login_failures_show_notice() {
    let app = app().await;

    let response = app.post("/login/", None, "email=admin&password=wrong").await;
    assert_eq!(location(&response), "/login/");
    assert_eq!(notices(&response)[0].message, "Invalid email/username or password.");

    let response = app.post("/login/", None, "email=&password=").await;
    assert_eq!(notices(&response)[0].message, "Please provide both email/username and password.");
}

#[tokio::test]
async fn test_login_with_multibyte_identifier_is_rejected() {
    let app = app().await;

    let response = app
        .post("/login/", None, "email=%E6%97%A5%E6%9C%AC%40example.com&password=whatever")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login/");
    assert_eq!(notices(&response)[0].message, "Invalid email/username or password.");

    let response = app.post("/login/", None, "email=%C3%A9&password=whatever").await;
    assert_eq!(notices(&response)[0].message, "Invalid email/username or password.");
}

#[tokio::test]
async fn test_admin_login_by_email_or_username() {
    let app = app().await;

    let response = app
        .post("/login/", None, &format!("email=admin@example.com&password={}", ADMIN_PASSWORD))
        .await;
    assert_eq!(location(&response), "/admin-dashboard/");
    assert_eq!(notices(&response)[0].message, "Welcome back, Site!");

    let session = app.login("admin", ADMIN_PASSWORD).await;
    let response = app.get("/admin-dashboard/", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Admin Dashboard"));

    let response = app.get("/login/", Some(&session)).await;
    assert_eq!(location(&response), "/");
    let response = app.get("/", Some(&session)).await;
    assert_eq!(location(&response), "/admin-dashboard/");
}

#[tokio::test]
async fn test_wrong_role_is_sent_home_with_notice() {
    let app = app().await;
    let admin = app.login("admin", ADMIN_PASSWORD).await;
    app.create_owner(&admin, "anil").await;

    let owner = app.login("anil", "Owner-Pass1").await;
    let response = app.get("/admin/owners/", Some(&owner)).await;
    assert_eq!(location(&response), "/");
    assert_eq!(notices(&response)[0].message, "Access denied. Administrator privileges required.");

    let response = app.get("/owner-dashboard/", Some(&owner)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_inactive_owner_cannot_sign_in() {
    let app = app().await;
    let admin = app.login("admin", ADMIN_PASSWORD).await;
    let owner_id = app.create_owner(&admin, "anil").await;

    let response = app
        .post(&format!("/admin/owner/{}/toggle-status/", owner_id), Some(&admin), "")
        .await;
    assert_eq!(notices(&response)[0].message, "Owner Anil Kapoor has been deactivated.");

    let response = app.post("/login/", None, "email=anil&password=Owner-Pass1").await;
    assert_eq!(location(&response), "/login/");
    assert_eq!(
        notices(&response)[0].message,
        "Your account is currently inactive. Please contact the administrator."
    );
}

#[tokio::test]
async fn test_society_flat_bill_flow() {
    let app = app().await;
    let admin = app.login("admin", ADMIN_PASSWORD).await;
    let owner_id = app.create_owner(&admin, "anil").await;

    let response = app
        .post("/admin/create-society/", Some(&admin), "name=Lake+View&address=12+Ring+Road%2C+Pune")
        .await;
    assert_eq!(location(&response), "/admin/societies/");
    assert_eq!(notices(&response)[0].message, "Society \"Lake View\" created successfully.");
    let society = app.state.societies.list().await.unwrap().remove(0).society;

    let form = format!("society={}&flat_number=a-101&owner={}", society.id, owner_id);
    let response = app.post("/admin/create-flat/", Some(&admin), &form).await;
    assert_eq!(notices(&response)[0].message, "Flat A-101 created successfully in Lake View.");
    let response = app.post("/admin/create-flat/", Some(&admin), &form).await;
    assert_eq!(notices(&response)[0].level, NoticeLevel::Error);
    let flat = app.state.flats.list().await.unwrap().remove(0).flat;

    let year = Local::now().year();
    let bill = format!("flat={}&month=MARCH&year={}&amount=2500", flat.id, year);
    let response = app.post("/admin/create-bill/", Some(&admin), &bill).await;
    assert_eq!(
        notices(&response)[0].message,
        format!("Bill generated for A-101 (MARCH {}) successfully.", year)
    );
    let response = app.post("/admin/create-bill/", Some(&admin), &bill).await;
    assert_eq!(notices(&response)[0].level, NoticeLevel::Error);

    let response = app
        .post("/admin/create-bill/", Some(&admin), &format!("flat={}&month=MARCH&year=3000&amount=10", flat.id))
        .await;
    assert!(notices(&response)[0].message.starts_with("Validation error: Year cannot be more than"));

    let response = app
        .post(&format!("/admin/society/{}/delete/", society.id), Some(&admin), "")
        .await;
    assert_eq!(
        notices(&response)[0].message,
        "Cannot delete Society \"Lake View\" because it contains flats."
    );

    let response = app.get("/admin/bills/", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("March"));

    let owner = app.login("anil", "Owner-Pass1").await;
    let response = app.get("/owner/bills/?status=UNPAID", Some(&owner)).await;
    assert!(body_text(response).await.contains("A-101"));
    let response = app.get("/owner/bills/?status=PAID", Some(&owner)).await;
    assert!(body_text(response).await.contains("No bills found."));
}

#[tokio::test]
async fn test_owner_manages_tenant() {
    let app = app().await;
    let admin = app.login("admin", ADMIN_PASSWORD).await;
    let owner_id = app.create_owner(&admin, "anil").await;
    app.post("/admin/create-society/", Some(&admin), "name=Lake+View&address=12+Ring+Road+Pune")
        .await;
    let society = app.state.societies.list().await.unwrap().remove(0).society;
    app.post(
        "/admin/create-flat/",
        Some(&admin),
        &format!("society={}&flat_number=B-2&owner={}", society.id, owner_id),
    )
    .await;
    let flat = app.state.flats.list().await.unwrap().remove(0).flat;

    let owner = app.login("anil", "Owner-Pass1").await;
    let tenant_form = |start: &str| {
        format!(
            "email=meera@example.com&username=meera&first_name=Meera&last_name=Iyer&password=Tenant-Pass1\
             &flat={}&rent_amount=15000&start_date={}",
            flat.id, start
        )
    };

    let response = app.post("/owner/create-tenant/", Some(&owner), &tenant_form("1999-01-01")).await;
    assert_eq!(
        notices(&response)[0].message,
        "Validation error: Start date cannot be before year 2000"
    );
    assert!(app.state.tenants.list(&owner_id).await.unwrap().is_empty());

    let response = app.post("/owner/create-tenant/", Some(&owner), &tenant_form("2024-04-01")).await;
    assert_eq!(location(&response), "/owner/tenants/");
    assert_eq!(notices(&response)[0].message, "Tenant Meera Iyer created successfully.");

    let tenant = app.login("meera", "Tenant-Pass1").await;
    let response = app.get("/tenant/flat/", Some(&tenant)).await;
    let body = body_text(response).await;
    assert!(body.contains("B-2"));
    assert!(body.contains("Anil Kapoor"));

    let tenant_id = app.state.tenants.list(&owner_id).await.unwrap()[0].tenant.id;
    let response = app
        .post(&format!("/owner/tenant/{}/toggle-status/", tenant_id), Some(&owner), "")
        .await;
    assert_eq!(notices(&response)[0].message, "Tenant Meera Iyer deactivated.");

    let response = app
        .post(&format!("/owner/tenant/{}/delete/", tenant_id), Some(&owner), "")
        .await;
    assert_eq!(notices(&response)[0].message, "Tenant account deleted successfully.");
    let response = app.post("/login/", None, "email=meera&password=Tenant-Pass1").await;
    assert_eq!(location(&response), "/login/");
}

#[tokio::test]
async fn test_unknown_ids_report_not_found() {
    let app = app().await;
    let admin = app.login("admin", ADMIN_PASSWORD).await;

    let response = app.post("/admin/owner/42/delete/", Some(&admin), "").await;
    assert_eq!(location(&response), "/admin/owners/");
    assert_eq!(notices(&response)[0].message, "Owner not found.");

    let response = app
        .post(&format!("/admin/bill/{}/toggle-status/", uuid::Uuid::new_v4()), Some(&admin), "")
        .await;
    assert_eq!(notices(&response)[0].message, "Bill not found.");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = app().await;
    let response = app.post("/logout/", None, "").await;
    assert_eq!(location(&response), "/");
    assert!(cookie_pair(&response, "session_token=").is_some());
    assert_eq!(notices(&response)[0].message, "You have been logged out successfully.");
}

#[tokio::test]
async fn test_notices_render_once() {
    let app = app().await;
    let response = app.post("/login/", None, "email=admin&password=wrong").await;
    let pair = cookie_pair(&response, "notice=").unwrap();

    let response = app.get("/login/", Some(&pair)).await;
    assert!(cookie_pair(&response, "notice=").is_some());
    assert!(body_text(response).await.contains("Invalid email/username or password."));
}
