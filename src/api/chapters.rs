use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;

use super::ApiError;
use crate::auth::{resolve_principal, Claims};
use crate::domain::DomainError;
use crate::models::book::{self, Entity as Book};
use crate::models::chapter::{self, ChapterDto, Entity as Chapter};

#[derive(Deserialize)]
pub struct CreateChapterRequest {
    title: String,
    book: i32,
    content: String,
    word_count: Option<i32>,
    chapter_number: Option<i32>,
}

pub async fn create_chapter(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateChapterRequest>,
) -> Result<Response, ApiError> {
    resolve_principal(&db, &claims).await?;

    if payload.title.is_empty()
        || !payload.title.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(DomainError::Validation("title is invalid".into()).into());
    }
    if payload.content.chars().count() < 128 {
        return Err(
            DomainError::Validation("content must be at least 128 characters".into()).into(),
        );
    }

    let owning_book = Book::find_by_id(payload.book)
        .one(&db)
        .await?
        .ok_or(DomainError::NotFound)?;

    let now = chrono::Utc::now().to_rfc3339();
    let new_chapter = chapter::ActiveModel {
        title: Set(payload.title),
        word_count: Set(payload.word_count),
        book_id: Set(owning_book.id),
        chapter_number: Set(payload.chapter_number),
        next_chapter_id: Set(None),
        prev_chapter_id: Set(None),
        content: Set(payload.content),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    };
    // The chapter row and the book's reading-order list commit together;
    // a failed append must not leave an orphaned chapter. The chapter
    // next/prev links are left untouched here.
    let txn = db.begin().await?;
    let created = new_chapter.insert(&txn).await?;

    let mut chapter_ids: Vec<i32> =
        serde_json::from_str(&owning_book.chapters).unwrap_or_default();
    chapter_ids.push(created.id);

    let mut active: book::ActiveModel = owning_book.into();
    active.chapters = Set(serde_json::to_string(&chapter_ids)
        .map_err(|e| DomainError::Store(e.to_string()))?);
    active.updated_at = Set(now);
    active.update(&txn).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "chapter": ChapterDto::from(created) })),
    )
        .into_response())
}

pub async fn get_chapter(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let found = Chapter::find_by_id(id)
        .one(&db)
        .await?
        .ok_or(DomainError::NotFound)?;

    Ok(Json(json!({ "chapter": ChapterDto::from(found) })))
}
