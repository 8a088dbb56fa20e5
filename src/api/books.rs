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
use crate::auth::{resolve_principal, Claims};
use crate::domain::DomainError;
use crate::models::book::{self, BookDto, Entity as Book};
use crate::models::order::{self, OrderDto};
use crate::relations::{self, Purchased, Wishlist};

async fn load_book(db: &DatabaseConnection, id: i32) -> Result<book::Model, DomainError> {
    Book::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)
}

#[derive(Deserialize)]
pub struct CreateBookRequest {
    title: String,
    summary: String,
    price: f64,
    main_genre: Option<String>,
    #[serde(default)]
    sub_genres: Vec<String>,
}

pub async fn create_book(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateBookRequest>,
) -> Result<Response, ApiError> {
    let acting = resolve_principal(&db, &claims).await?;

    if payload.title.is_empty()
        || !payload.title.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(DomainError::Validation("title is invalid".into()).into());
    }
    let summary_len = payload.summary.chars().count();
    if !(16..=256).contains(&summary_len) {
        return Err(
            DomainError::Validation("summary must be 16 to 256 characters".into()).into(),
        );
    }
    if !payload.price.is_finite() || payload.price < 0.0 {
        return Err(DomainError::Validation("price is invalid".into()).into());
    }
    if payload.sub_genres.iter().any(|g| g.chars().count() > 128) {
        return Err(
            DomainError::Validation("sub genres must be at most 128 characters".into()).into(),
        );
    }

    let taken = Book::find()
        .filter(book::Column::Title.eq(&payload.title))
        .one(&db)
        .await?;
    if taken.is_some() {
        return Err(DomainError::Validation("title is already taken".into()).into());
    }

    let now = chrono::Utc::now().to_rfc3339();
    let new_book = book::ActiveModel {
        title: Set(payload.title),
        summary: Set(payload.summary),
        author_id: Set(acting.id),
        price: Set(payload.price),
        main_genre: Set(payload.main_genre),
        sub_genres: Set(serde_json::to_string(&payload.sub_genres)
            .map_err(|e| DomainError::Store(e.to_string()))?),
        chapters: Set("[]".to_string()),
        published_at: Set(now.clone()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = new_book.insert(&db).await?;
    tracing::info!("Book '{}' created by user {}", created.title, acting.id);

    Ok((StatusCode::CREATED, Json(json!({ "book": BookDto::from(created) }))).into_response())
}

pub async fn get_book(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let found = load_book(&db, id).await?;
    Ok(Json(json!({ "book": BookDto::from(found) })))
}

pub async fn wishlist_add(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let acting = resolve_principal(&db, &claims).await?;
    let book = load_book(&db, id).await?;

    let acting = relations::add::<Wishlist>(&db, acting, book.id).await?;

    Ok(Json(json!({ "user": acting.own_profile() })))
}

pub async fn wishlist_remove(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let acting = resolve_principal(&db, &claims).await?;
    let book = load_book(&db, id).await?;

    let acting = relations::remove::<Wishlist>(&db, acting, book.id).await?;

    Ok(Json(json!({ "user": acting.own_profile() })))
}

pub async fn purchase(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let acting = resolve_principal(&db, &claims).await?;
    let book = load_book(&db, id).await?;

    // A repeat purchase leaves the set unchanged and records no new order
    let already_owned = relations::contains::<Purchased>(&acting, book.id);
    let acting = relations::add::<Purchased>(&db, acting, book.id).await?;

    if already_owned {
        return Ok(Json(json!({ "user": acting.own_profile(), "order": null })));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let new_order = order::ActiveModel {
        buyer_id: Set(acting.id),
        book_id: Set(book.id),
        info: Set(book.price),
        date: Set(now.clone()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let placed = new_order.insert(&db).await?;
    tracing::info!(
        "user {} purchased book {} (order {})",
        acting.id,
        book.id,
        placed.id
    );

    Ok(Json(json!({
        "user": acting.own_profile(),
        "order": OrderDto::from(placed)
    })))
}
