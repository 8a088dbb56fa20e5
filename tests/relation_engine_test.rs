use bookmarket::db;
use bookmarket::models::user;
use bookmarket::relations::{self, Following, Purchased, Wishlist};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite for testing
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_test_user(db: &DatabaseConnection, username: &str) -> user::Model {
    let now = chrono::Utc::now().to_rfc3339();
    let new_user = user::ActiveModel {
        name: Set(format!("{} Test", username)),
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        bio: Set(None),
        avatar: Set(None),
        password_hash: Set("$argon2id$dummy".to_string()),
        following: Set("[]".to_string()),
        wishlist: Set("[]".to_string()),
        purchased: Set("[]".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    new_user.insert(db).await.expect("Failed to create user")
}

async fn reload(db: &DatabaseConnection, id: i32) -> user::Model {
    user::Entity::find_by_id(id)
        .one(db)
        .await
        .expect("Failed to reload user")
        .expect("User vanished")
}

#[tokio::test]
async fn add_then_contains_is_true() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "alice").await;

    let owner = relations::add::<Following>(&db, owner, 42)
        .await
        .expect("add failed");

    assert!(relations::contains::<Following>(&owner, 42));
    // and visible on a fresh read, not just in memory
    let persisted = reload(&db, owner.id).await;
    assert!(relations::contains::<Following>(&persisted, 42));
}

#[tokio::test]
async fn remove_then_contains_is_false() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "bob").await;

    let owner = relations::add::<Wishlist>(&db, owner, 7).await.unwrap();
    let owner = relations::remove::<Wishlist>(&db, owner, 7).await.unwrap();

    assert!(!relations::contains::<Wishlist>(&owner, 7));
    let persisted = reload(&db, owner.id).await;
    assert!(!relations::contains::<Wishlist>(&persisted, 7));
}

#[tokio::test]
async fn remove_of_absent_member_is_a_noop() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "carol").await;

    // never followed anyone; removal must not error
    let owner = relations::remove::<Following>(&db, owner, 99)
        .await
        .expect("remove of absent member errored");

    assert!(!relations::contains::<Following>(&owner, 99));
    assert!(relations::members::<Following>(&owner).is_empty());
}

#[tokio::test]
async fn add_is_idempotent() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "dave").await;

    let owner = relations::add::<Following>(&db, owner, 5).await.unwrap();
    let once = relations::members::<Following>(&owner);

    let owner = relations::add::<Following>(&db, owner, 5).await.unwrap();
    let twice = relations::members::<Following>(&owner);

    assert_eq!(once, twice);
    assert_eq!(twice, vec![5]);

    let persisted = reload(&db, owner.id).await;
    assert_eq!(relations::members::<Following>(&persisted), vec![5]);
}

#[tokio::test]
async fn unrelated_members_keep_their_order() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "erin").await;

    let owner = relations::add::<Purchased>(&db, owner, 1).await.unwrap();
    let owner = relations::add::<Purchased>(&db, owner, 2).await.unwrap();
    let owner = relations::add::<Purchased>(&db, owner, 3).await.unwrap();

    let owner = relations::remove::<Purchased>(&db, owner, 2).await.unwrap();
    assert_eq!(relations::members::<Purchased>(&owner), vec![1, 3]);

    // re-adding an existing member must not reorder or duplicate
    let owner = relations::add::<Purchased>(&db, owner, 1).await.unwrap();
    assert_eq!(relations::members::<Purchased>(&owner), vec![1, 3]);
}

#[tokio::test]
async fn uninitialized_set_reads_as_empty() {
    let db = setup_test_db().await;
    let mut owner = create_test_user(&db, "frank").await;

    // simulate a row whose set column was never initialized
    owner.following = String::new();

    assert!(relations::members::<Following>(&owner).is_empty());
    assert!(!relations::contains::<Following>(&owner, 1));

    // first use treats it as empty and recovers
    let owner = relations::add::<Following>(&db, owner, 1).await.unwrap();
    assert_eq!(relations::members::<Following>(&owner), vec![1]);
}

#[tokio::test]
async fn the_three_sets_are_independent() {
    let db = setup_test_db().await;
    let owner = create_test_user(&db, "grace").await;

    let owner = relations::add::<Following>(&db, owner, 10).await.unwrap();
    let owner = relations::add::<Wishlist>(&db, owner, 20).await.unwrap();
    let owner = relations::add::<Purchased>(&db, owner, 30).await.unwrap();

    let owner = relations::remove::<Wishlist>(&db, owner, 20).await.unwrap();

    assert_eq!(relations::members::<Following>(&owner), vec![10]);
    assert!(relations::members::<Wishlist>(&owner).is_empty());
    assert_eq!(relations::members::<Purchased>(&owner), vec![30]);
}
