use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::Deserialize;
use serde_json::json;

use super::ApiError;
use crate::auth::{create_jwt, hash_password, resolve_principal, Claims, OptionalClaims};
use crate::domain::DomainError;
use crate::models::user::{self, gravatar_url, Entity as User};
use crate::relations::{self, Following};

fn valid_username(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

// local@domain.tld shape, no whitespace
fn valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}

async fn load_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<user::Model, DomainError> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    name: String,
    username: String,
    email: String,
    password: String,
}

pub async fn register(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(DomainError::Validation("Please include a valid name.".into()).into());
    }
    if !valid_username(&payload.username) {
        return Err(DomainError::Validation("Please include a valid username.".into()).into());
    }
    if !valid_email(&payload.email) {
        return Err(DomainError::Validation("Please include a valid email.".into()).into());
    }
    if payload.password.len() < 6 {
        return Err(DomainError::Validation(
            "Please enter a password with length of 6 or more.".into(),
        )
        .into());
    }

    let taken = User::find()
        .filter(
            sea_orm::Condition::any()
                .add(user::Column::Email.eq(&payload.email))
                .add(user::Column::Username.eq(&payload.username)),
        )
        .one(&db)
        .await?;

    if taken.is_some() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": [{ "msg": "User already exists" }] })),
        )
            .into_response());
    }

    let password_hash =
        hash_password(&payload.password).map_err(DomainError::Store)?;
    let avatar = gravatar_url(&payload.email);
    let now = chrono::Utc::now().to_rfc3339();

    let new_user = user::ActiveModel {
        name: Set(payload.name),
        username: Set(payload.username),
        email: Set(payload.email),
        bio: Set(None),
        avatar: Set(Some(avatar)),
        password_hash: Set(password_hash),
        following: Set("[]".to_string()),
        wishlist: Set("[]".to_string()),
        purchased: Set("[]".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = new_user.insert(&db).await?;
    tracing::info!("Registered user {} ({})", created.username, created.id);

    let token = create_jwt(created.id, &created.email).map_err(DomainError::Store)?;
    Ok(Json(json!({ "token": token })).into_response())
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    name: Option<String>,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    bio: Option<String>,
}

pub async fn update_user(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let acting = resolve_principal(&db, &claims).await?;
    let mut active: user::ActiveModel = acting.into();

    if let Some(password) = payload.password {
        if password.len() > 6 {
            let hash = hash_password(&password).map_err(DomainError::Store)?;
            active.password_hash = Set(hash);
        }
    }

    if let Some(name) = payload.name {
        active.name = Set(name);
    }

    if let Some(username) = payload.username {
        if !valid_username(&username) {
            return Err(DomainError::Validation("username is invalid".into()).into());
        }
        active.username = Set(username);
    }

    if let Some(bio) = payload.bio {
        active.bio = Set(Some(bio));
    }

    // Changing the email re-derives the avatar; a blank email is surfaced
    // to the caller, never written through.
    if let Some(email) = payload.email {
        if email.is_empty() || !valid_email(&email) {
            return Err(DomainError::Validation("email is invalid".into()).into());
        }
        active.avatar = Set(Some(gravatar_url(&email)));
        active.email = Set(email);
    }

    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    let updated = active.update(&db).await?;

    Ok(Json(json!({ "user": updated.own_profile() })))
}

pub async fn get_user(
    OptionalClaims(claims): OptionalClaims,
    State(db): State<DatabaseConnection>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let target = load_by_username(&db, &username).await?;

    let viewer = match &claims {
        Some(claims) => Some(resolve_principal(&db, claims).await?),
        None => None,
    };

    Ok(Json(json!({ "profile": target.profile_for(viewer.as_ref()) })))
}

pub async fn follow(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let acting = resolve_principal(&db, &claims).await?;
    let target = load_by_username(&db, &username).await?;

    let acting = relations::add::<Following>(&db, acting, target.id).await?;

    // Self-follow renders the acting record, which carries the fresh set
    let view = if acting.id == target.id {
        acting.profile_for(Some(&acting))
    } else {
        target.profile_for(Some(&acting))
    };
    Ok(Json(json!({ "profile": view })))
}

pub async fn unfollow(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let acting = resolve_principal(&db, &claims).await?;
    let target = load_by_username(&db, &username).await?;

    let acting = relations::remove::<Following>(&db, acting, target.id).await?;

    let view = if acting.id == target.id {
        acting.profile_for(Some(&acting))
    } else {
        target.profile_for(Some(&acting))
    };
    Ok(Json(json!({ "profile": view })))
}
