// File: tests/end_to_end.rs

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use azar_tests::test_helpers::{sqlite_stack, TestStack};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

async fn file_stack(dir: &TempDir, allow_privileged: bool) -> TestStack {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("azar.db").display());
    sqlite_stack(&url, allow_privileged).await.unwrap()
}

async fn send(router: &Router, method: &str, uri: &str, body: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if method == "POST" {
        builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    router
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

async fn text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION].to_str().unwrap().to_string()
}

async fn signup_and_login(router: &Router, name: &str, phone: &str, role: &str) -> String {
    let signup = send(
        router,
        "POST",
        "/signup",
        &format!("name={}&phone={}&password=secret&role={}", name, phone, role),
        None,
    )
    .await;
    assert_eq!(signup.status(), StatusCode::SEE_OTHER);

    let login = send(router, "POST", "/", &format!("phone={}&password=secret", phone), None).await;
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
    login.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_client_journey() {
    let dir = tempfile::tempdir().unwrap();
    let stack = file_stack(&dir, false).await;
    let router = &stack.router;

    let cookie = signup_and_login(router, "Amina", "0700000001", "client").await;

    let apply = send(router, "POST", "/apply", "amount=500", Some(&cookie)).await;
    assert_eq!(apply.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&apply), "/dashboard");

    let dashboard = send(router, "GET", "/dashboard", "", Some(&cookie)).await;
    assert_eq!(dashboard.status(), StatusCode::OK);
    let html = text(dashboard).await;
    assert!(html.contains("CLIENT DASHBOARD"));
    assert!(html.contains("Welcome Amina"));
    assert!(html.contains("<li>500 - pending</li>"));

    let logout = send(router, "GET", "/logout", "", Some(&cookie)).await;
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);

    let after = send(router, "GET", "/dashboard", "", Some(&cookie)).await;
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&after), "/");
}

#[tokio::test]
async fn test_role_scoped_dashboards() {
    let dir = tempfile::tempdir().unwrap();
    let stack = file_stack(&dir, true).await;
    let router = &stack.router;

    let alice = signup_and_login(router, "Alice", "0700000011", "client").await;
    let bob = signup_and_login(router, "Bob", "0700000012", "client").await;
    let collector = signup_and_login(router, "Chebet", "0700000013", "collector").await;
    let admin = signup_and_login(router, "Dalia", "0700000014", "admin").await;

    send(router, "POST", "/apply", "amount=111", Some(&alice)).await;
    send(router, "POST", "/apply", "amount=222", Some(&bob)).await;

    let alice_view = text(send(router, "GET", "/dashboard", "", Some(&alice)).await).await;
    assert!(alice_view.contains("111 - pending"));
    assert!(!alice_view.contains("222 - pending"));

    for staff in [&collector, &admin] {
        let view = text(send(router, "GET", "/dashboard", "", Some(staff)).await).await;
        assert!(view.contains("111 - pending"));
        assert!(view.contains("222 - pending"));
        assert!(!view.contains("action=\"/apply\""));
    }

    assert_eq!(stack.ledger.count_loans().await.unwrap(), 2);
}

#[tokio::test]
async fn test_duplicate_signup_keeps_one_user() {
    let dir = tempfile::tempdir().unwrap();
    let stack = file_stack(&dir, false).await;
    let body = "name=Amina&phone=0700000021&password=secret&role=client";

    let first = send(&stack.router, "POST", "/signup", body, None).await;
    let second = send(&stack.router, "POST", "/signup", body, None).await;

    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(text(second).await, "User already exists");

    assert_eq!(stack.accounts.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let cookie = {
        let stack = file_stack(&dir, false).await;
        let cookie = signup_and_login(&stack.router, "Eshe", "0700000031", "client").await;
        send(&stack.router, "POST", "/apply", "amount=900", Some(&cookie)).await;
        stack.pool.close().await;
        cookie
    };

    // Same database file and secret, fresh process state
    let stack = file_stack(&dir, false).await;
    let dashboard = send(&stack.router, "GET", "/dashboard", "", Some(&cookie)).await;
    assert_eq!(dashboard.status(), StatusCode::OK);
    assert!(text(dashboard).await.contains("900 - pending"));
}
