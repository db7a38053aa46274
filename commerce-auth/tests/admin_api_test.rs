//! Superadmin administration surface: capability registry CRUD and
//! dashboard-user invites, through the full router.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use commerce_auth::build_router;
use commerce_auth::dtos::dashboard_user::{AddDashboardUserRequest, UpdateDashboardUserRequest};
use commerce_auth::models::{Account, AccountStatus, Role};
use commerce_auth::store::AccountStore;
use common::{latest_otp_for, spawn_app, TestApp};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn superadmin_token(app: &TestApp) -> String {
    let account = Account::new_dashboard(
        "Root".to_string(),
        "root@example.com".to_string(),
        "555-0001".to_string(),
        "$argon2id$hash".to_string(),
        Role::Superadmin,
        vec![],
        None,
    );
    app.state.jwt.issue_access_token(&account).unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn admin_surface_requires_a_superadmin_token() {
    let app = spawn_app();

    // No token: 403
    let response = build_router(app.state.clone())
        .oneshot(request(Method::GET, "/capabilities", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Dashboard admin is not enough: 401
    let admin = Account::new_dashboard(
        "Ops".to_string(),
        "ops@example.com".to_string(),
        "555-0002".to_string(),
        "$argon2id$hash".to_string(),
        Role::Admin,
        vec![1, 2, 3],
        None,
    );
    let token = app.state.jwt.issue_access_token(&admin).unwrap();
    let response = build_router(app.state.clone())
        .oneshot(request(Method::GET, "/capabilities", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn capability_crud_round_trip() {
    let app = spawn_app();
    let token = superadmin_token(&app);

    // Create: 201
    let response = build_router(app.state.clone())
        .oneshot(request(
            Method::POST,
            "/capabilities",
            Some(&token),
            Some(json!({ "name": "products", "description": "Product catalog" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Duplicate name: 409
    let response = build_router(app.state.clone())
        .oneshot(request(
            Method::POST,
            "/capabilities",
            Some(&token),
            Some(json!({ "name": "Products" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // List: the created entry with its assigned numeric id
    let response = build_router(app.state.clone())
        .oneshot(request(Method::GET, "/capabilities", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["capability_id"], 1);
    let id = list[0]["id"].as_str().unwrap().to_string();

    // Get by id
    let response = build_router(app.state.clone())
        .oneshot(request(
            Method::GET,
            &format!("/capabilities/{}", id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Update keeps the numeric id
    let response = build_router(app.state.clone())
        .oneshot(request(
            Method::PATCH,
            &format!("/capabilities/{}", id),
            Some(&token),
            Some(json!({ "name": "catalog", "description": "Renamed" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "catalog");
    assert_eq!(body["capability_id"], 1);

    // Delete, then the id is gone
    let response = build_router(app.state.clone())
        .oneshot(request(
            Method::DELETE,
            &format!("/capabilities/{}", id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = build_router(app.state.clone())
        .oneshot(request(
            Method::GET,
            &format!("/capabilities/{}", id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_capability_id_is_400() {
    let app = spawn_app();
    let token = superadmin_token(&app);

    let response = build_router(app.state.clone())
        .oneshot(request(
            Method::GET,
            "/capabilities/not-an-object-id",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invited_dashboard_user_can_verify_and_log_in() {
    let app = spawn_app();

    app.state
        .dashboard
        .add_dashboard_user(AddDashboardUserRequest {
            full_name: "Ops Admin".to_string(),
            email: "ops@example.com".to_string(),
            phone: "555-0102".to_string(),
            role: Role::Admin,
            capability_ids: vec![1, 7],
            profile_picture: None,
        })
        .await
        .unwrap();

    // The invite mail carries the generated temporary password
    let invites = app.notifier.sent_to("ops@example.com");
    assert_eq!(invites.len(), 1);
    let account = app
        .state
        .accounts
        .find_by_email("ops@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.role, Role::Admin);
    assert_eq!(account.capability_ids, vec![1, 7]);
    assert_eq!(account.status, AccountStatus::Pending);

    // The invite body carries the temporary password inside its only
    // <strong> tag.
    let html = &invites[0].html_body;
    let start = html.find("<strong>").unwrap() + "<strong>".len();
    let end = html.find("</strong>").unwrap();
    let temp_password = &html[start..end];

    // Invitees verify through the same OTP flow as self-registration
    app.state.auth.resend_otp("ops@example.com").await.unwrap();
    let otp = latest_otp_for(&app, "ops@example.com");
    app.state
        .auth
        .verify_email("ops@example.com", &otp)
        .await
        .unwrap();

    let tokens = app
        .state
        .auth
        .login("ops@example.com", temp_password)
        .await
        .unwrap();
    let claims = app.state.jwt.verify_access_token(&tokens.access_token).unwrap();
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.capability_ids, vec![1, 7]);
}

#[tokio::test]
async fn dashboard_invite_cannot_grant_superadmin() {
    let app = spawn_app();

    let err = app
        .state
        .dashboard
        .add_dashboard_user(AddDashboardUserRequest {
            full_name: "Sneaky".to_string(),
            email: "sneaky@example.com".to_string(),
            phone: "555-0103".to_string(),
            role: Role::Superadmin,
            capability_ids: vec![],
            profile_picture: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        commerce_auth::services::ServiceError::RoleNotAssignable(_)
    ));
}

#[tokio::test]
async fn dashboard_update_changes_grants_but_not_email() {
    let app = spawn_app();

    app.state
        .dashboard
        .add_dashboard_user(AddDashboardUserRequest {
            full_name: "Ops Admin".to_string(),
            email: "ops@example.com".to_string(),
            phone: "555-0102".to_string(),
            role: Role::Admin,
            capability_ids: vec![1],
            profile_picture: None,
        })
        .await
        .unwrap();

    let account = app
        .state
        .accounts
        .find_by_email("ops@example.com")
        .await
        .unwrap()
        .unwrap();

    // Activating an unverified account is refused; only OTP consumption
    // moves pending to active
    let err = app
        .state
        .dashboard
        .update_dashboard_user(
            &account.id.to_hex(),
            UpdateDashboardUserRequest {
                full_name: None,
                phone: None,
                role: None,
                status: Some(AccountStatus::Active),
                capability_ids: None,
                profile_picture: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        commerce_auth::services::ServiceError::EmailNotVerified
    ));

    let updated = app
        .state
        .dashboard
        .update_dashboard_user(
            &account.id.to_hex(),
            UpdateDashboardUserRequest {
                full_name: Some("Ops Lead".to_string()),
                phone: None,
                role: None,
                status: None,
                capability_ids: Some(vec![1, 2, 3]),
                profile_picture: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.full_name, "Ops Lead");
    assert_eq!(updated.capability_ids, vec![1, 2, 3]);
    // Email is immutable through this surface
    assert_eq!(updated.email, "ops@example.com");

    // Once verified, an administrative suspend and reinstate both work
    app.state.auth.resend_otp("ops@example.com").await.unwrap();
    let otp = latest_otp_for(&app, "ops@example.com");
    app.state
        .auth
        .verify_email("ops@example.com", &otp)
        .await
        .unwrap();

    let updated = app
        .state
        .dashboard
        .update_dashboard_user(
            &account.id.to_hex(),
            UpdateDashboardUserRequest {
                full_name: None,
                phone: None,
                role: None,
                status: Some(AccountStatus::Suspended),
                capability_ids: None,
                profile_picture: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, AccountStatus::Suspended);
}

#[tokio::test]
async fn dashboard_update_rejects_duplicate_phone() {
    let app = spawn_app();

    for (email, phone) in [("a@example.com", "555-0110"), ("b@example.com", "555-0111")] {
        app.state
            .dashboard
            .add_dashboard_user(AddDashboardUserRequest {
                full_name: "User".to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                role: Role::Admin,
                capability_ids: vec![],
                profile_picture: None,
            })
            .await
            .unwrap();
    }

    let account = app
        .state
        .accounts
        .find_by_email("b@example.com")
        .await
        .unwrap()
        .unwrap();

    let err = app
        .state
        .dashboard
        .update_dashboard_user(
            &account.id.to_hex(),
            UpdateDashboardUserRequest {
                full_name: None,
                phone: Some("555-0110".to_string()),
                role: None,
                status: None,
                capability_ids: None,
                profile_picture: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        commerce_auth::services::ServiceError::PhoneTaken
    ));
}
