mod common;

use axum::http::StatusCode;
use common::admin_account;
use common::attendee_account;
use common::login_request;
use common::response_json;
use common::test_app;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_admin_login_success() {
    let admin = admin_account("admin@x.com", "rightpass");
    let admin_id = admin.id;
    let (app, repository) = test_app(vec![admin]);

    let response = app
        .oneshot(login_request(json!({
            "identifier": "Admin@X.com",
            "password": "rightpass",
            "is_admin": true
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["data"]["success"], true);
    assert_eq!(body["data"]["user"]["email"], "admin@x.com");
    assert_eq!(body["data"]["user"]["is_admin"], true);
    // Sanitized profile: no hash anywhere in the payload
    assert!(body["data"]["user"].get("password_hash").is_none());

    let stored = repository.get(&admin_id).unwrap();
    assert!(stored.last_login_at.is_some());
}

#[tokio::test]
async fn test_admin_login_wrong_password() {
    let admin = admin_account("admin@x.com", "rightpass");
    let admin_id = admin.id;
    let (app, repository) = test_app(vec![admin]);

    let response = app
        .oneshot(login_request(json!({
            "identifier": "admin@x.com",
            "password": "wrongpass",
            "is_admin": true
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let stored = repository.get(&admin_id).unwrap();
    assert!(stored.last_login_at.is_none());
}

#[tokio::test]
async fn test_admin_login_missing_password_is_bad_request() {
    let (app, _) = test_app(vec![admin_account("admin@x.com", "rightpass")]);

    let response = app
        .oneshot(login_request(json!({
            "identifier": "admin@x.com",
            "is_admin": true
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["data"]["success"], false);
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("password is required"));
}

#[tokio::test]
async fn test_admin_login_unknown_email_is_not_found() {
    let (app, _) = test_app(vec![]);

    let response = app
        .oneshot(login_request(json!({
            "identifier": "nobody@x.com",
            "password": "pass",
            "is_admin": true
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attendee_via_admin_form_is_forbidden() {
    let (app, _) = test_app(vec![attendee_account("Dr. A", "doc@x.com", "1234567")]);

    let response = app
        .oneshot(login_request(json!({
            "identifier": "doc@x.com",
            "password": "whatever",
            "is_admin": true
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_via_user_form_is_steered_to_admin_form() {
    let (app, _) = test_app(vec![admin_account("admin@x.com", "rightpass")]);

    let response = app
        .oneshot(login_request(json!({
            "identifier": "admin@x.com"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = response_json(response).await;
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("admin sign-in"));
}

#[tokio::test]
async fn test_user_login_by_medical_id() {
    let attendee = attendee_account("Dr. A", "doc@x.com", "1234567");
    let attendee_id = attendee.id;
    let (app, repository) = test_app(vec![attendee]);

    let response = app
        .oneshot(login_request(json!({
            "identifier": " 1234567 "
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["data"]["user"]["name"], "Dr. A");
    assert_eq!(body["data"]["user"]["is_admin"], false);

    let stored = repository.get(&attendee_id).unwrap();
    assert!(stored.last_login_at.is_some());
}

#[tokio::test]
async fn test_user_login_by_email_case_insensitive() {
    let (app, _) = test_app(vec![attendee_account("Dr. A", "doc@x.com", "1234567")]);

    let response = app
        .oneshot(login_request(json!({
            "identifier": "Doc@X.COM"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_user_medical_id_never_matches_another_accounts_email() {
    // Two attendees: the digit identifier must resolve by medical ID,
    // not accidentally against anyone's email field.
    let owner = attendee_account("Owner", "owner@x.com", "7654321");
    let owner_id = owner.id;
    let other = attendee_account("Other", "7654321other@x.com", "1111111");
    let (app, _) = test_app(vec![other, owner]);

    let response = app
        .oneshot(login_request(json!({
            "identifier": "7654321"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["data"]["user"]["id"], owner_id.to_string());
}

#[tokio::test]
async fn test_user_login_unknown_identifier_is_not_found() {
    let (app, _) = test_app(vec![]);

    let response = app
        .oneshot(login_request(json!({
            "identifier": "9999999"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response_json(response).await;
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("No registration found"));
}

#[tokio::test]
async fn test_empty_identifier_is_bad_request() {
    let (app, _) = test_app(vec![]);

    let response = app
        .oneshot(login_request(json!({
            "identifier": "   "
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = test_app(vec![]);

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .method("GET")
                .uri("/api/health")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
