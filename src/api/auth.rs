use crate::auth::{create_jwt, verify_password};
use crate::models::user::{self, Entity as User};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

pub async fn login(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    tracing::info!("Login attempt for {}", payload.email);

    let found = match User::find()
        .filter(user::Column::Email.eq(&payload.email))
        .one(&db)
        .await
    {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("store failure during login: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Server error" })),
            )
                .into_response();
        }
    };

    let Some(account) = found else {
        tracing::warn!("No account for {}", payload.email);
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid credentials" })),
        )
            .into_response();
    };

    match verify_password(&payload.password, &account.password_hash) {
        Ok(true) => match create_jwt(account.id, &account.email) {
            Ok(token) => (StatusCode::OK, Json(json!({ "token": token }))).into_response(),
            Err(e) => {
                tracing::error!("token issuance failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Server error" })),
                )
                    .into_response()
            }
        },
        _ => {
            tracing::warn!("Password verification failed for {}", account.username);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response()
        }
    }
}
