pub mod auth;
pub mod books;
pub mod chapters;
pub mod health;
pub mod orders;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::domain::DomainError;

/// HTTP mapping for domain failures. Store detail is logged, never sent.
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(e: sea_orm::DbErr) -> Self {
        ApiError(DomainError::from(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            DomainError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Authentication required" })),
            )
                .into_response(),
            DomainError::UnknownPrincipal => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unknown user" })),
            )
                .into_response(),
            DomainError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Not found" })),
            )
                .into_response(),
            DomainError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": [{ "msg": msg }] })),
            )
                .into_response(),
            DomainError::Store(detail) => {
                tracing::error!("store failure: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Server error" })),
                )
                    .into_response()
            }
        }
    }
}

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/login", post(auth::login))
        // Users & profiles
        .route("/users", post(users::register))
        .route("/users/user", post(users::update_user))
        .route("/users/:username", get(users::get_user))
        .route(
            "/users/:username/follow",
            post(users::follow).delete(users::unfollow),
        )
        // Books
        .route("/books", post(books::create_book))
        .route("/books/:id", get(books::get_book))
        .route(
            "/books/:id/wishlist",
            post(books::wishlist_add).delete(books::wishlist_remove),
        )
        // Purchases are append-only: no DELETE route exists
        .route("/books/:id/purchase", post(books::purchase))
        // Orders
        .route("/orders", get(orders::list_orders))
        // Chapters
        .route("/chapters", post(chapters::create_chapter))
        .route("/chapters/:id", get(chapters::get_chapter))
        .with_state(db)
}
