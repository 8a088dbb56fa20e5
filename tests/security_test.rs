use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use serial_test::serial;
use tower::util::ServiceExt; // for `oneshot`

use bookmarket::auth::{create_jwt, decode_jwt, hash_password, verify_password};
use bookmarket::{api, db};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

#[tokio::test]
async fn test_password_hashing() {
    let password = "super_secret_password";
    let hash = hash_password(password).expect("Failed to hash password");

    assert_ne!(password, hash);
    assert!(verify_password(password, &hash).unwrap());
    assert!(!verify_password("wrong_password", &hash).unwrap());
}

// Each hash draws a fresh OS-random salt, so equal passwords never
// produce equal hashes.
#[tokio::test]
async fn test_hashing_salts_are_unique() {
    let password = "super_secret_password";
    let first = hash_password(password).expect("Failed to hash password");
    let second = hash_password(password).expect("Failed to hash password");

    assert_ne!(first, second);
    assert!(verify_password(password, &first).unwrap());
    assert!(verify_password(password, &second).unwrap());
}

#[tokio::test]
#[serial]
async fn test_jwt_creation_and_verification() {
    let token = create_jwt(7, "reader@example.com").expect("Failed to create JWT");
    assert!(!token.is_empty());

    let claims = decode_jwt(&token).expect("Failed to verify JWT");
    assert_eq!(claims.sub, "7");
    assert_eq!(claims.email, "reader@example.com");
}

// Token minting and verification must agree on the secret taken from the
// environment. Serial because JWT_SECRET is process-global.
#[tokio::test]
#[serial]
async fn test_jwt_secret_from_env() {
    std::env::set_var("JWT_SECRET", "per-deployment-secret");

    let token = create_jwt(3, "reader@example.com").expect("Failed to create JWT");
    let claims = decode_jwt(&token).expect("Failed to verify JWT");
    assert_eq!(claims.sub, "3");

    // a token minted under the old secret no longer verifies
    std::env::remove_var("JWT_SECRET");
    assert!(decode_jwt(&token).is_err());
}

#[tokio::test]
#[serial]
async fn test_tampered_token_is_rejected() {
    let token = create_jwt(7, "reader@example.com").unwrap();
    let mut tampered = token.clone();
    tampered.pop();
    tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

    assert!(decode_jwt(&tampered).is_err());
}

async fn login_app() -> (Router, DatabaseConnection) {
    let db = setup_test_db().await;
    let app = api::api_router(db.clone());
    (app, db)
}

#[tokio::test]
#[serial]
async fn test_login_flow() {
    let (app, db) = login_app().await;

    // 1. Create a user manually
    let password = "reader_password";
    let hash = hash_password(password).unwrap();
    let now = chrono::Utc::now().to_rfc3339();

    let new_user = bookmarket::models::user::ActiveModel {
        name: Set("Ana Reader".to_string()),
        username: Set("ana".to_string()),
        email: Set("ana@example.com".to_string()),
        bio: Set(None),
        avatar: Set(None),
        password_hash: Set(hash),
        following: Set("[]".to_string()),
        wishlist: Set("[]".to_string()),
        purchased: Set("[]".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    bookmarket::models::user::Entity::insert(new_user)
        .exec(&db)
        .await
        .expect("Failed to create user");

    // 2. Successful login
    let payload = serde_json::json!({
        "email": "ana@example.com",
        "password": "reader_password"
    });
    let req = Request::builder()
        .uri("/auth/login")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 3. Invalid password
    let payload_bad = serde_json::json!({
        "email": "ana@example.com",
        "password": "wrong_password"
    });
    let req_bad = Request::builder()
        .uri("/auth/login")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&payload_bad).unwrap()))
        .unwrap();
    let response_bad = app.clone().oneshot(req_bad).await.unwrap();
    assert_eq!(response_bad.status(), StatusCode::UNAUTHORIZED);

    // 4. Non-existent account
    let payload_none = serde_json::json!({
        "email": "nobody@example.com",
        "password": "password"
    });
    let req_none = Request::builder()
        .uri("/auth/login")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&payload_none).unwrap()))
        .unwrap();
    let response_none = app.oneshot(req_none).await.unwrap();
    assert_eq!(response_none.status(), StatusCode::UNAUTHORIZED);
}
