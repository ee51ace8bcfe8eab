use std::sync::Arc;

use account_service::AccountService;
use api_gateway::config::AppConfig;
use api_gateway::{app, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::db;
use http_body_util::BodyExt;
use loan_ledger::LoanLedger;
use tower::ServiceExt;
use tracing::Level;

const SECRET: &str = "router-test-secret-that-is-long-enough";

fn config(allow_privileged: bool) -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "SECRET_KEY" => Some(SECRET.to_string()),
        "ALLOW_PRIVILEGED_SIGNUP" => Some(allow_privileged.to_string()),
        _ => None,
    })
    .unwrap()
}

fn test_app(allow_privileged: bool) -> (Router, Arc<AccountService>) {
    let accounts = Arc::new(AccountService::new().with_bcrypt_cost(4));
    let ledger = Arc::new(LoanLedger::new());
    let state = AppState::new(accounts.clone(), ledger, None, &config(allow_privileged));
    (app(state, Level::DEBUG), accounts)
}

fn form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

/// Sign up and log in, returning the `name=value` cookie pair
async fn login_as(app: &Router, phone: &str, role: &str) -> String {
    let signup = app
        .clone()
        .oneshot(form("/signup", &format!("name=Tester&phone={}&password=pw&role={}", phone, role), None))
        .await
        .unwrap();
    assert_eq!(signup.status(), StatusCode::SEE_OTHER);

    let login = app
        .clone()
        .oneshot(form("/", &format!("phone={}&password=pw", phone), None))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&login), "/dashboard");

    let set_cookie = login.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_pages_render() {
    let (app, _) = test_app(false);

    let login = app.clone().oneshot(get("/", None)).await.unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    assert!(body_text(login).await.contains("Azar Finance Login"));

    let signup = app.oneshot(get("/signup", None)).await.unwrap();
    assert_eq!(signup.status(), StatusCode::OK);
    assert!(body_text(signup).await.contains("Azar Finance Signup"));
}

#[tokio::test]
async fn test_signup_duplicate_phone() {
    let (app, accounts) = test_app(false);
    let body = "name=Amina&phone=0700000001&password=pw&role=client";

    let first = app.clone().oneshot(form("/signup", body, None)).await.unwrap();
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&first), "/");

    let second = app.oneshot(form("/signup", body, None)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_text(second).await, "User already exists");
    assert_eq!(accounts.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_signup_role_checks() {
    let (app, _) = test_app(false);

    let unknown = app
        .clone()
        .oneshot(form("/signup", "name=A&phone=1&password=pw&role=superuser", None))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

    let privileged = app
        .oneshot(form("/signup", "name=A&phone=1&password=pw&role=admin", None))
        .await
        .unwrap();
    assert_eq!(privileged.status(), StatusCode::FORBIDDEN);

    let (open_app, _) = test_app(true);
    let allowed = open_app
        .oneshot(form("/signup", "name=A&phone=1&password=pw&role=admin", None))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_invalid_login() {
    let (app, _) = test_app(false);
    login_as(&app, "0700000002", "client").await;

    let wrong = app.clone().oneshot(form("/", "phone=0700000002&password=nope", None)).await.unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(body_text(wrong).await, "Invalid login");

    let unknown = app.oneshot(form("/", "phone=0799999999&password=pw", None)).await.unwrap();
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(unknown).await, "Invalid login");
}

#[tokio::test]
async fn test_dashboard_requires_session() {
    let (app, _) = test_app(false);

    let anonymous = app.clone().oneshot(get("/dashboard", None)).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&anonymous), "/");

    let forged = app
        .clone()
        .oneshot(get("/dashboard", Some("azar_session=made-up-token")))
        .await
        .unwrap();
    assert_eq!(forged.status(), StatusCode::SEE_OTHER);

    let apply = app.oneshot(form("/apply", "amount=500", None)).await.unwrap();
    assert_eq!(apply.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&apply), "/");
}

#[tokio::test]
async fn test_client_applies_and_sees_loan() {
    let (app, _) = test_app(false);
    let cookie = login_as(&app, "0700000003", "client").await;

    let apply = app.clone().oneshot(form("/apply", "amount=500", Some(&cookie))).await.unwrap();
    assert_eq!(apply.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&apply), "/dashboard");

    let dashboard = app.oneshot(get("/dashboard", Some(&cookie))).await.unwrap();
    assert_eq!(dashboard.status(), StatusCode::OK);
    let html = body_text(dashboard).await;
    assert!(html.contains("CLIENT DASHBOARD"));
    assert!(html.contains("Welcome Tester"));
    assert!(html.contains("<li>500 - pending</li>"));
}

#[tokio::test]
async fn test_invalid_amount() {
    let (app, _) = test_app(false);
    let cookie = login_as(&app, "0700000004", "client").await;

    let response = app.oneshot(form("/apply", "amount=12.5", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_collector_cannot_apply() {
    let (app, _) = test_app(true);
    let cookie = login_as(&app, "0700000005", "collector").await;

    let response = app.clone().oneshot(form("/apply", "amount=100", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let dashboard = app.oneshot(get("/dashboard", Some(&cookie))).await.unwrap();
    let html = body_text(dashboard).await;
    assert!(html.contains("COLLECTOR DASHBOARD"));
    assert!(!html.contains("action=\"/apply\""));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (app, _) = test_app(false);
    let cookie = login_as(&app, "0700000006", "client").await;

    let logout = app.clone().oneshot(get("/logout", Some(&cookie))).await.unwrap();
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&logout), "/");

    // The old cookie no longer resolves to a session
    let dashboard = app.oneshot(get("/dashboard", Some(&cookie))).await.unwrap();
    assert_eq!(dashboard.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&dashboard), "/");
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app(false);
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(report["status"], "ok");
    assert_eq!(report["database"], "none");
}

#[tokio::test]
async fn test_health_with_database() {
    let pool = db::init_memory_pool().await.unwrap();
    let state = AppState::new(
        Arc::new(AccountService::new()),
        Arc::new(LoanLedger::new()),
        Some(pool),
        &config(false),
    );

    let response = app(state, Level::DEBUG).oneshot(get("/health", None)).await.unwrap();
    let report: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(report["database"], "up");
}
