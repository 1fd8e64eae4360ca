mod common;

use cinelog::{
    accounts,
    entities::user::UserRole,
    error::ApiError,
    models::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest},
};

use common::*;

#[tokio::test]
async fn register_normalizes_email_and_defaults_display_name() {
    let db = setup_db().await;
    let user = accounts::register(
        &db,
        TEST_BCRYPT_COST,
        RegisterRequest {
            email: "  Alice@Example.COM ".to_string(),
            username: "alice".to_string(),
            password: "password1".to_string(),
            display_name: None,
        },
    )
    .await
    .expect("register");

    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.display_name, "alice");
    assert_eq!(user.role, UserRole::User);
    // stored hash is not the raw password
    assert_ne!(user.password_hash, "password1");
}

#[tokio::test]
async fn duplicate_email_and_username_conflict() {
    let db = setup_db().await;
    seed_user(&db, "alice").await;

    let err = accounts::register(
        &db,
        TEST_BCRYPT_COST,
        RegisterRequest {
            email: "ALICE@example.com".to_string(),
            username: "different".to_string(),
            password: "password1".to_string(),
            display_name: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");

    let err = accounts::register(
        &db,
        TEST_BCRYPT_COST,
        RegisterRequest {
            email: "other@example.com".to_string(),
            username: "alice".to_string(),
            password: "password1".to_string(),
            display_name: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn short_passwords_are_rejected() {
    let db = setup_db().await;
    let err = accounts::register(
        &db,
        TEST_BCRYPT_COST,
        RegisterRequest {
            email: "a@example.com".to_string(),
            username: "a".to_string(),
            password: "12345".to_string(),
            display_name: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn login_accepts_email_or_username() {
    let db = setup_db().await;
    let alice = seed_user(&db, "alice").await;

    let by_email = accounts::login(
        &db,
        LoginRequest { login: "Alice@Example.com".to_string(), password: "password1".to_string() },
    )
    .await
    .expect("login by email");
    assert_eq!(by_email.id, alice.id);

    let by_username = accounts::login(
        &db,
        LoginRequest { login: "alice".to_string(), password: "password1".to_string() },
    )
    .await
    .expect("login by username");
    assert_eq!(by_username.id, alice.id);
}

#[tokio::test]
async fn bad_credentials_fail_identically() {
    let db = setup_db().await;
    seed_user(&db, "alice").await;

    let wrong_password = accounts::login(
        &db,
        LoginRequest { login: "alice".to_string(), password: "wrong".to_string() },
    )
    .await
    .unwrap_err();
    let unknown_user = accounts::login(
        &db,
        LoginRequest { login: "nobody".to_string(), password: "password1".to_string() },
    )
    .await
    .unwrap_err();

    assert!(matches!(wrong_password, ApiError::Unauthenticated(_)));
    assert!(matches!(unknown_user, ApiError::Unauthenticated(_)));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[tokio::test]
async fn profile_update_respects_other_users_uniqueness() {
    let db = setup_db().await;
    let alice = seed_user(&db, "alice").await;
    seed_user(&db, "bob").await;

    let err = accounts::update_profile(
        &db,
        alice.id,
        UpdateProfileRequest { username: Some("bob".to_string()), ..Default::default() },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");

    // re-submitting your own current email is not a conflict
    let unchanged = accounts::update_profile(
        &db,
        alice.id,
        UpdateProfileRequest { email: Some("alice@example.com".to_string()), ..Default::default() },
    )
    .await
    .expect("no-op email");
    assert_eq!(unchanged.email, "alice@example.com");

    let updated = accounts::update_profile(
        &db,
        alice.id,
        UpdateProfileRequest {
            display_name: Some("Alice A.".to_string()),
            profile_pic_url: Some("https://example.com/alice.png".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("update");
    assert_eq!(updated.display_name, "Alice A.");
    assert_eq!(updated.profile_pic_url.as_deref(), Some("https://example.com/alice.png"));
}

#[tokio::test]
async fn change_password_verifies_the_current_one() {
    let db = setup_db().await;
    let alice = seed_user(&db, "alice").await;

    let err = accounts::change_password(
        &db,
        alice.id,
        TEST_BCRYPT_COST,
        ChangePasswordRequest {
            current_password: "wrong".to_string(),
            new_password: "newpassword".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)), "got {err:?}");

    accounts::change_password(
        &db,
        alice.id,
        TEST_BCRYPT_COST,
        ChangePasswordRequest {
            current_password: "password1".to_string(),
            new_password: "newpassword".to_string(),
        },
    )
    .await
    .expect("change");

    accounts::login(
        &db,
        LoginRequest { login: "alice".to_string(), password: "newpassword".to_string() },
    )
    .await
    .expect("login with new password");
    let err = accounts::login(
        &db,
        LoginRequest { login: "alice".to_string(), password: "password1".to_string() },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated(_)));
}

#[tokio::test]
async fn user_listing_pages_by_id() {
    let db = setup_db().await;
    let alice = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;
    let carol = seed_user(&db, "carol").await;

    let page = accounts::list_users(&db, 1, 2).await.expect("page");
    assert_eq!(page.total_count, 3);
    let ids: Vec<i32> = page.items.iter().map(|u| u.id).collect();
    assert_eq!(ids, [alice.id, bob.id]);

    let page = accounts::list_users(&db, 2, 2).await.expect("page");
    let ids: Vec<i32> = page.items.iter().map(|u| u.id).collect();
    assert_eq!(ids, [carol.id]);

    let page = accounts::list_users(&db, u64::MAX, 2).await.expect("page");
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 3);
}

#[tokio::test]
async fn admins_cannot_target_themselves() {
    let db = setup_db().await;
    let admin = seed_admin(&db, "root").await;

    let err = accounts::set_role(&db, admin.id, admin.id, UserRole::User).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)), "got {err:?}");

    let err = accounts::delete_user(&db, admin.id, admin.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn role_changes_and_deletes_apply_to_others() {
    let db = setup_db().await;
    let admin = seed_admin(&db, "root").await;
    let alice = seed_user(&db, "alice").await;

    let promoted = accounts::set_role(&db, admin.id, alice.id, UserRole::Admin).await.expect("promote");
    assert_eq!(promoted.role, UserRole::Admin);

    accounts::delete_user(&db, admin.id, alice.id).await.expect("delete");
    let err = accounts::get_user(&db, alice.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {err:?}");

    let err = accounts::delete_user(&db, admin.id, alice.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "got {err:?}");
}
