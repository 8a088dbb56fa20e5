use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chapters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub word_count: Option<i32>,
    pub book_id: i32,
    pub chapter_number: Option<i32>,
    // Doubly-linked ordering within a book; stored as-is, no operation
    // reconciles it with the book's chapter list.
    pub next_chapter_id: Option<i32>,
    pub prev_chapter_id: Option<i32>,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id"
    )]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ChapterDto {
    pub id: Option<i32>,
    pub title: String,
    pub word_count: Option<i32>,
    pub book: i32,
    pub content: String,
    pub chapter_number: Option<i32>,
    pub next_chapter: Option<i32>,
    pub prev_chapter: Option<i32>,
}

impl From<Model> for ChapterDto {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            title: model.title,
            word_count: model.word_count,
            book: model.book_id,
            content: model.content,
            chapter_number: model.chapter_number,
            next_chapter: model.next_chapter_id,
            prev_chapter: model.prev_chapter_id,
        }
    }
}
