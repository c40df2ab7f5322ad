//! Registration, login and the bearer-token gate.

mod common;

use axum::http::{Method, StatusCode};
use common::{sample_entry, TestApp, SECRET};
use serde_json::json;

#[tokio::test]
async fn register_login_and_me() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Ann", "email": "ann@x.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some());
    let id = body["user"]["id"].as_i64().unwrap();
    assert_eq!(body["user"]["name"], "Ann");
    assert_eq!(body["user"]["email"], "ann@x.com");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ann@x.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["id"], id);

    let (status, body) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "Ann");
    assert_eq!(body["email"], "ann@x.com");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn login_token_resolves_to_registered_user() {
    let app = TestApp::new();
    let (_, id) = app.register("Bo", "bo@x.com", "hunter22").await;

    let (_, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "BO@x.com ", "password": "hunter22" })),
        )
        .await;
    let token = body["token"].as_str().unwrap();

    let tokens = api_lib::security::TokenService::new(SECRET, chrono::Duration::hours(1));
    assert_eq!(tokens.verify(token), Ok(id));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = TestApp::new();
    app.register("Ann", "ann@x.com", "secret1").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Other", "email": "Ann@X.com", "password": "secret2" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn registration_validates_fields() {
    let app = TestApp::new();
    for body in [
        json!({ "email": "a@x.com", "password": "secret1" }),
        json!({ "name": "A", "password": "secret1" }),
        json!({ "name": "A", "email": "a@x.com" }),
        json!({ "name": "A", "email": "nope", "password": "secret1" }),
        json!({ "name": "A", "email": "a@x.com", "password": "123" }),
    ] {
        let (status, _) = app
            .send(Method::POST, "/api/auth/register", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let app = TestApp::new();
    app.register("Ann", "ann@x.com", "secret1").await;

    for body in [
        json!({ "email": "ann@x.com", "password": "wrong-one" }),
        json!({ "email": "nobody@x.com", "password": "secret1" }),
    ] {
        let (status, body) = app
            .send(Method::POST, "/api/auth/login", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password");
    }
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = TestApp::new();
    let (token, _) = app.register("Ann", "ann@x.com", "secret1").await;

    // Existing data that rejected writes must not touch.
    let (_, entry) = app.post("/api/journal", &token, sample_entry()).await;
    let entry_uri = format!("/api/journal/{}", entry["id"]);
    app.post("/api/assessment", &token, json!({ "score": 12 })).await;
    app.post("/api/journal/chat", &token, json!({ "message": "hello" }))
        .await;
    let (_, assessments_before) = app.get("/api/assessment/history", &token).await;
    let (_, chats_before) = app.get("/api/journal/chat/history", &token).await;

    let foreign = api_lib::security::TokenService::new(
        b"some-other-deployment-secret-0123456789",
        chrono::Duration::hours(1),
    );
    let foreign_token = foreign.issue(1).unwrap();

    let mut tampered = token.clone();
    tampered.push('x');

    let mut rewrite = sample_entry();
    rewrite["title"] = json!("rewritten");

    for bad in [None, Some("not-a-token"), Some(foreign_token.as_str()), Some(tampered.as_str())] {
        for (method, uri) in [
            (Method::GET, "/api/auth/me"),
            (Method::GET, "/api/journal"),
            (Method::GET, entry_uri.as_str()),
            (Method::GET, "/api/journal/analytics/mood-trends"),
            (Method::GET, "/api/assessment/history"),
            (Method::GET, "/api/assessment/latest"),
            (Method::GET, "/api/journal/chat/history"),
            (Method::DELETE, entry_uri.as_str()),
        ] {
            let (status, _) = app.send(method, uri, bad, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} with {:?}", uri, bad);
        }

        // Writes are rejected before the body is read and leave no trace.
        for (method, uri, body) in [
            (Method::POST, "/api/journal", sample_entry()),
            (Method::PUT, entry_uri.as_str(), rewrite.clone()),
            (Method::POST, "/api/assessment", json!({ "score": 30 })),
            (Method::POST, "/api/journal/chat", json!({ "message": "intruder" })),
        ] {
            let (status, _) = app.send(method, uri, bad, Some(body)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} with {:?}", uri, bad);
        }
    }

    let (_, entries) = app.get("/api/journal", &token).await;
    assert_eq!(entries, json!([entry]));
    let (status, fetched) = app.get(&entry_uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, entry);
    assert_eq!(app.get("/api/assessment/history", &token).await.1, assessments_before);
    assert_eq!(app.get("/api/journal/chat/history", &token).await.1, chats_before);
}

#[tokio::test]
async fn token_for_unknown_user_is_unauthorized() {
    let app = TestApp::new();
    let tokens = api_lib::security::TokenService::new(SECRET, chrono::Duration::hours(1));
    let orphan = tokens.issue(9_999).unwrap();

    let (status, _) = app.get("/api/auth/me", &orphan).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let app = TestApp::new();
    let (_, id) = app.register("Ann", "ann@x.com", "secret1").await;
    let stale = api_lib::security::TokenService::new(SECRET, chrono::Duration::seconds(-60));
    let token = stale.issue(id).unwrap();

    let (status, _) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
