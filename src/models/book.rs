use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub author_id: i32,
    pub price: f64,
    pub main_genre: Option<String>,
    pub sub_genres: String, // JSON array
    pub chapters: String,   // JSON array of chapter ids, in reading order
    pub published_at: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
    #[sea_orm(has_many = "super::chapter::Entity")]
    Chapters,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::chapter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chapters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct BookDto {
    pub id: Option<i32>,
    pub title: String,
    pub summary: String,
    pub author: Option<i32>,
    pub price: f64,
    pub main_genre: Option<String>,
    pub sub_genres: Vec<String>,
    pub chapters: Vec<i32>,
    pub published_at: Option<String>,
}

impl From<Model> for BookDto {
    fn from(model: Model) -> Self {
        let sub_genres: Vec<String> =
            serde_json::from_str(&model.sub_genres).unwrap_or_default();
        let chapters: Vec<i32> = serde_json::from_str(&model.chapters).unwrap_or_default();

        Self {
            id: Some(model.id),
            title: model.title,
            summary: model.summary,
            author: Some(model.author_id),
            price: model.price,
            main_genre: model.main_genre,
            sub_genres,
            chapters,
            published_at: Some(model.published_at),
        }
    }
}
