//! Relationship set engine
//!
//! One generic implementation of the per-user membership sets (followed
//! users, wishlisted books, purchased books). Each set is a JSON id-array
//! column on the user row; a zero-sized marker type names the column, so
//! the add/remove/contains semantics exist exactly once.

use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::domain::DomainError;
use crate::models::user;

/// One of the user's membership set columns.
pub trait RelationSet {
    const NAME: &'static str;

    fn read(owner: &user::Model) -> &str;
    fn write(owner: &mut user::ActiveModel, raw: String);
}

/// Ids of users the owner follows.
pub struct Following;

impl RelationSet for Following {
    const NAME: &'static str = "following";

    fn read(owner: &user::Model) -> &str {
        &owner.following
    }

    fn write(owner: &mut user::ActiveModel, raw: String) {
        owner.following = Set(raw);
    }
}

/// Ids of books the owner has wishlisted.
pub struct Wishlist;

impl RelationSet for Wishlist {
    const NAME: &'static str = "wishlist";

    fn read(owner: &user::Model) -> &str {
        &owner.wishlist
    }

    fn write(owner: &mut user::ActiveModel, raw: String) {
        owner.wishlist = Set(raw);
    }
}

/// Ids of books the owner has purchased. Append-only at the API level.
pub struct Purchased;

impl RelationSet for Purchased {
    const NAME: &'static str = "purchased";

    fn read(owner: &user::Model) -> &str {
        &owner.purchased
    }

    fn write(owner: &mut user::ActiveModel, raw: String) {
        owner.purchased = Set(raw);
    }
}

/// Decode the set, preserving insertion order. An empty or unparsable
/// column reads as the empty set.
pub fn members<S: RelationSet>(owner: &user::Model) -> Vec<i32> {
    serde_json::from_str(S::read(owner)).unwrap_or_default()
}

/// Pure membership query, no side effects.
pub fn contains<S: RelationSet>(owner: &user::Model, member_id: i32) -> bool {
    members::<S>(owner).contains(&member_id)
}

/// Insert `member_id` if absent. Idempotent: a repeated add is a no-op that
/// skips the store write entirely. Returns the owner's persisted state.
pub async fn add<S: RelationSet>(
    db: &DatabaseConnection,
    owner: user::Model,
    member_id: i32,
) -> Result<user::Model, DomainError> {
    let mut ids = members::<S>(&owner);
    if ids.contains(&member_id) {
        return Ok(owner);
    }
    ids.push(member_id);
    tracing::debug!(
        "user {} adds {} to {} set",
        owner.id,
        member_id,
        S::NAME
    );
    persist::<S>(db, owner, ids).await
}

/// Delete `member_id` if present; removing an absent member is a no-op,
/// never an error. Returns the owner's persisted state.
pub async fn remove<S: RelationSet>(
    db: &DatabaseConnection,
    owner: user::Model,
    member_id: i32,
) -> Result<user::Model, DomainError> {
    let mut ids = members::<S>(&owner);
    let len_before = ids.len();
    ids.retain(|id| *id != member_id);
    if ids.len() == len_before {
        return Ok(owner);
    }
    tracing::debug!(
        "user {} removes {} from {} set",
        owner.id,
        member_id,
        S::NAME
    );
    persist::<S>(db, owner, ids).await
}

// Durably write the owner row before reporting success; on a store error
// the mutation is not committed and the caller is told so.
async fn persist<S: RelationSet>(
    db: &DatabaseConnection,
    owner: user::Model,
    ids: Vec<i32>,
) -> Result<user::Model, DomainError> {
    let raw = serde_json::to_string(&ids)
        .map_err(|e| DomainError::Store(e.to_string()))?;

    let mut active: user::ActiveModel = owner.into();
    S::write(&mut active, raw);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let updated = active.update(db).await?;
    Ok(updated)
}
