use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::relations::{self, Following, Purchased, Wishlist};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub password_hash: String,
    // JSON id arrays, maintained only through the relations module
    pub following: String,
    pub wishlist: String,
    pub purchased: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book::Entity")]
    Books,
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Books.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Gravatar URI for an email, using SHA-256 addressing.
/// Recomputed at registration and whenever the email changes.
pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
        hex::encode(digest)
    )
}

/// The profile a user sees of themselves. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct OwnProfile {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub date: String,
    pub username: String,
    pub bio: Option<String>,
    pub following: Vec<i32>,
    pub wishlist: Vec<i32>,
    pub purchased: Vec<i32>,
    pub status: &'static str,
}

/// The profile anyone else (or no one) sees. Never carries the email.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub name: String,
    pub username: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub date: String,
    pub wishlist: Vec<i32>,
    /// Whether the viewer follows this user; false with no viewer
    pub following: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProfileView {
    Own(OwnProfile),
    Public(PublicProfile),
}

impl Model {
    /// Select the view of `self` for `viewer`: equal ids get the owner's
    /// view, anyone else (or an anonymous viewer) gets the public one.
    pub fn profile_for(&self, viewer: Option<&Model>) -> ProfileView {
        match viewer {
            Some(v) if v.id == self.id => ProfileView::Own(self.own_profile()),
            other => ProfileView::Public(self.public_profile_for(other)),
        }
    }

    pub fn own_profile(&self) -> OwnProfile {
        OwnProfile {
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
            date: self.created_at.clone(),
            username: self.username.clone(),
            bio: self.bio.clone(),
            following: relations::members::<Following>(self),
            wishlist: relations::members::<Wishlist>(self),
            purchased: relations::members::<Purchased>(self),
            status: "my profile",
        }
    }

    pub fn public_profile_for(&self, viewer: Option<&Model>) -> PublicProfile {
        PublicProfile {
            name: self.name.clone(),
            username: self.username.clone(),
            bio: self.bio.clone(),
            avatar: self.avatar.clone(),
            date: self.created_at.clone(),
            wishlist: relations::members::<Wishlist>(self),
            following: viewer
                .map(|v| relations::contains::<Following>(v, self.id))
                .unwrap_or(false),
        }
    }
}
