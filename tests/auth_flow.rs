//! Integration tests for login, logout, session restore and route gating.

mod common;

use common::AppHarness;
use serde_json::{json, Value};
use smart_ledger_lib::api::ApiError;
use smart_ledger_lib::auth::{AuthError, RegisterForm};
use smart_ledger_lib::router::{GuardOutcome, Route};
use smart_ledger_lib::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_login_persists_credentials_and_goes_home() {
    let h = AppHarness::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .and(body_json(json!({"email": "a@b.com", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "a-1", "refresh": "r-1"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    h.state.auth.login("a@b.com", "secret").await.unwrap();

    let session = h.state.auth.session();
    assert_eq!(session.access.as_deref(), Some("a-1"));
    assert_eq!(session.refresh.as_deref(), Some("r-1"));
    assert_eq!(h.stored(ACCESS_TOKEN_KEY).as_deref(), Some("a-1"));
    assert_eq!(h.stored(REFRESH_TOKEN_KEY).as_deref(), Some("r-1"));
    assert_eq!(h.state.router.current(), Route::Dashboard);

    // The client now sends the new credential.
    assert_eq!(h.state.api.session().access_token().as_deref(), Some("a-1"));
}

#[tokio::test]
async fn test_login_failure_surfaces_backend_detail() {
    let h = AppHarness::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.state.auth.login("a@b.com", "wrong").await.unwrap_err();

    assert!(matches!(err, AuthError::Api(_)));
    assert_eq!(
        err.user_message("Login failed"),
        "No active account found with the given credentials"
    );
    assert!(!h.state.auth.is_authenticated());
    assert_eq!(h.stored(ACCESS_TOKEN_KEY), None);
    assert_eq!(h.state.router.current(), Route::Login);
}

#[tokio::test]
async fn test_login_with_empty_credential_is_rejected() {
    let h = AppHarness::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "", "refresh": "r-1"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.state.auth.login("a@b.com", "secret").await.unwrap_err();

    assert!(matches!(err, AuthError::Api(ApiError::Parse(_))));
    assert!(!h.state.auth.is_authenticated());
    assert_eq!(h.stored(ACCESS_TOKEN_KEY), None);
    assert_eq!(h.stored(REFRESH_TOKEN_KEY), None);
    assert_eq!(h.state.router.current(), Route::Login);
}

#[tokio::test]
async fn test_login_rolls_back_access_when_refresh_cannot_be_stored() {
    let h = AppHarness::start().await;

    // A directory where the refresh credential file goes makes the write fail
    std::fs::create_dir_all(h.dir.path().join("storage").join("refresh_token.dat")).unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "a-1", "refresh": "r-1"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.state.auth.login("a@b.com", "secret").await.unwrap_err();

    assert!(matches!(err, AuthError::Storage(_)));
    assert_eq!(h.stored(ACCESS_TOKEN_KEY), None);
    assert!(!h.state.auth.is_authenticated());
    assert_eq!(h.state.router.current(), Route::Login);
}

#[tokio::test]
async fn test_login_requires_email_and_password() {
    let h = AppHarness::start().await;

    let err = h.state.auth.login("", "secret").await.unwrap_err();
    assert!(matches!(err, AuthError::Form(_)));
    assert!(h.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_twice_is_harmless() {
    let h = AppHarness::start_with_stored(Some(("a-1", "r-1"))).await;
    assert!(h.state.auth.is_authenticated());

    Mock::given(method("POST"))
        .and(path("/auth/logout/"))
        .and(body_json(json!({"refresh": "r-1"})))
        .respond_with(ResponseTemplate::new(205))
        .expect(1)
        .mount(&h.server)
        .await;

    h.state.auth.logout().await.unwrap();
    assert!(!h.state.auth.is_authenticated());
    assert_eq!(h.stored(ACCESS_TOKEN_KEY), None);
    assert_eq!(h.stored(REFRESH_TOKEN_KEY), None);
    assert_eq!(h.state.router.current(), Route::Login);

    h.state.auth.logout().await.unwrap();
    assert!(!h.state.auth.is_authenticated());
    assert_eq!(h.stored(ACCESS_TOKEN_KEY), None);
    assert_eq!(h.state.router.current(), Route::Login);
}

#[tokio::test]
async fn test_logout_ignores_backend_failure() {
    let h = AppHarness::start_with_stored(Some(("a-1", "r-1"))).await;

    Mock::given(method("POST"))
        .and(path("/auth/logout/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    h.state.auth.logout().await.unwrap();
    assert!(!h.state.auth.is_authenticated());
    assert_eq!(h.stored(REFRESH_TOKEN_KEY), None);
}

#[tokio::test]
async fn test_register_does_not_sign_in() {
    let h = AppHarness::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register/"))
        .and(body_json(json!({
            "email": "a@b.com",
            "username": "ab",
            "password": "secret",
            "first_name": "",
            "last_name": "",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&h.server)
        .await;

    let form = RegisterForm {
        email: "a@b.com".into(),
        username: "ab".into(),
        password: "secret".into(),
        ..Default::default()
    };
    h.state.auth.register(&form).await.unwrap();

    assert!(!h.state.auth.is_authenticated());
    assert_eq!(h.stored(ACCESS_TOKEN_KEY), None);
}

#[tokio::test]
async fn test_stored_session_is_restored_at_startup() {
    let h = AppHarness::start_with_stored(Some(("a-1", "r-1"))).await;

    let session = h.state.session.snapshot();
    assert!(session.is_authenticated());

    let outcome = h.state.router.visit("/budget", &session);
    assert_eq!(outcome, GuardOutcome::Render(Route::Budget));

    let outcome = h.state.router.visit("/login", &session);
    assert_eq!(outcome, GuardOutcome::Redirect(Route::Dashboard));
}

#[tokio::test]
async fn test_protected_route_without_credential_redirects_to_login() {
    let h = AppHarness::start().await;

    let outcome = h
        .state
        .router
        .visit("/transactions", &h.state.session.snapshot());

    assert_eq!(outcome, GuardOutcome::Redirect(Route::Login));
    assert_eq!(h.state.router.current(), Route::Login);
    assert_eq!(Route::Login.path(), "/login");
}

#[tokio::test]
async fn test_failed_refresh_expires_the_stored_session() {
    let h = AppHarness::start_with_stored(Some(("stale", "r-1"))).await;

    Mock::given(method("GET"))
        .and(path("/budgets/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;

    h.state.router.visit("/budget", &h.state.session.snapshot());
    assert_eq!(h.state.router.current(), Route::Budget);

    let err = h.state.api.get_json::<Value>("/budgets/").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!h.state.auth.is_authenticated());
    assert_eq!(h.stored(ACCESS_TOKEN_KEY), None);
    assert_eq!(h.stored(REFRESH_TOKEN_KEY), None);
    assert_eq!(h.state.router.current(), Route::Login);
}
