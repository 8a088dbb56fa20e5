use bookmarket::models::user;
use bookmarket::models::ProfileView;

fn sample_user(id: i32, username: &str, following: &str) -> user::Model {
    user::Model {
        id,
        name: format!("{} Sample", username),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        bio: Some("reads a lot".to_string()),
        avatar: Some("https://www.gravatar.com/avatar/abc".to_string()),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$secret-material".to_string(),
        following: following.to_string(),
        wishlist: "[11,12]".to_string(),
        purchased: "[13]".to_string(),
        created_at: "2026-01-01T00:00:00+00:00".to_string(),
        updated_at: "2026-01-01T00:00:00+00:00".to_string(),
    }
}

#[test]
fn equal_ids_select_the_own_view() {
    let target = sample_user(1, "ana", "[2]");
    let viewer = sample_user(1, "ana", "[2]");

    match target.profile_for(Some(&viewer)) {
        ProfileView::Own(own) => {
            assert_eq!(own.status, "my profile");
            assert_eq!(own.email, "ana@example.com");
            assert_eq!(own.following, vec![2]);
            assert_eq!(own.wishlist, vec![11, 12]);
            assert_eq!(own.purchased, vec![13]);
        }
        ProfileView::Public(_) => panic!("owner got the public view"),
    }
}

#[test]
fn different_viewer_selects_the_public_view() {
    let target = sample_user(1, "ana", "[]");
    let viewer = sample_user(2, "ben", "[]");

    assert!(matches!(
        target.profile_for(Some(&viewer)),
        ProfileView::Public(_)
    ));
}

#[test]
fn absent_viewer_selects_the_public_view() {
    let target = sample_user(1, "ana", "[]");

    match target.profile_for(None) {
        ProfileView::Public(public) => {
            assert!(!public.following);
            assert_eq!(public.wishlist, vec![11, 12]);
        }
        ProfileView::Own(_) => panic!("anonymous viewer got the own view"),
    }
}

#[test]
fn public_view_reports_whether_the_viewer_follows_the_target() {
    let target = sample_user(1, "ana", "[]");

    let follower = sample_user(2, "ben", "[1]");
    match target.profile_for(Some(&follower)) {
        ProfileView::Public(public) => assert!(public.following),
        ProfileView::Own(_) => panic!("wrong view"),
    }

    let stranger = sample_user(3, "cam", "[2]");
    match target.profile_for(Some(&stranger)) {
        ProfileView::Public(public) => assert!(!public.following),
        ProfileView::Own(_) => panic!("wrong view"),
    }
}

#[test]
fn own_view_never_carries_credential_material() {
    let target = sample_user(1, "ana", "[2]");
    let rendered =
        serde_json::to_string(&target.profile_for(Some(&target))).expect("serialize");

    assert!(!rendered.contains("password"));
    assert!(!rendered.contains("secret-material"));
}

#[test]
fn public_view_never_carries_email_or_credentials() {
    let target = sample_user(1, "ana", "[]");
    let viewer = sample_user(2, "ben", "[]");
    let rendered =
        serde_json::to_string(&target.profile_for(Some(&viewer))).expect("serialize");

    assert!(!rendered.contains("email"));
    assert!(!rendered.contains("ana@example.com"));
    assert!(!rendered.contains("password"));
    assert!(!rendered.contains("secret-material"));
}

#[test]
fn gravatar_uri_is_stable_and_case_insensitive() {
    let a = user::gravatar_url("Reader@Example.com");
    let b = user::gravatar_url("reader@example.com");

    assert_eq!(a, b);
    assert!(a.starts_with("https://www.gravatar.com/avatar/"));
    assert!(a.ends_with("?s=200&r=pg&d=mm"));
}
