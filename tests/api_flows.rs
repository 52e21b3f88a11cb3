use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use directory::database::{favorite_repo, review_repo, user_repo};
use directory::error::AppError;
use directory::services::auth_service::{self, JwtKeys, LoginBody, RegisterBody};
use directory::services::business_service::{self, BusinessInput};
use directory::services::favorite_service;
use directory::services::review_service::{self, CreateReviewBody};
use directory::state::ModerationPolicy;
use directory::web::middleware::auth::AuthenticatedUser;

async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

/// Inserts a user directly, skipping bcrypt for speed, and returns the
/// extractor value handlers would see for that user.
async fn seed_user(pool: &SqlitePool, email: &str, is_admin: bool) -> AuthenticatedUser {
    let id = user_repo::insert_user(pool, email, "not-a-real-hash", "Test User")
        .await
        .unwrap();
    if is_admin {
        sqlx::query("UPDATE users SET is_admin = 1 WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .unwrap();
    }
    AuthenticatedUser {
        id,
        email: email.to_string(),
        is_admin,
    }
}

fn listing_input(name: &str) -> BusinessInput {
    BusinessInput {
        name: Some(name.to_string()),
        category: Some("Restaurant".to_string()),
        address: Some("1 Main St".to_string()),
        city: Some("Greensboro".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn register_login_and_me_roundtrip() {
    let pool = test_pool().await;
    let jwt = JwtKeys::new("integration-secret");

    let session = auth_service::register(
        &pool,
        &jwt,
        &RegisterBody {
            email: "  Ada@Example.com ".into(),
            password: "hunter2hunter2".into(),
            name: "Ada".into(),
        },
    )
    .await
    .unwrap();

    // Email is normalized before storage and in the token.
    assert_eq!(session.user.email, "ada@example.com");
    let claims = jwt.verify(&session.token).unwrap();
    assert_eq!(claims.sub, session.user.id);
    assert!(!claims.is_admin);

    let me = auth_service::current_user(&pool, session.user.id)
        .await
        .unwrap();
    assert_eq!(me.email, "ada@example.com");

    let login = auth_service::login(
        &pool,
        &jwt,
        &LoginBody {
            email: "ada@example.com".into(),
            password: "hunter2hunter2".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(login.user.id, session.user.id);

    let wrong = auth_service::login(
        &pool,
        &jwt,
        &LoginBody {
            email: "ada@example.com".into(),
            password: "wrong-password".into(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn duplicate_email_and_weak_password_are_rejected() {
    let pool = test_pool().await;
    let jwt = JwtKeys::new("integration-secret");

    let body = RegisterBody {
        email: "dup@example.com".into(),
        password: "hunter2hunter2".into(),
        name: "First".into(),
    };
    auth_service::register(&pool, &jwt, &body).await.unwrap();

    let again = auth_service::register(
        &pool,
        &jwt,
        &RegisterBody {
            email: "DUP@example.com".into(),
            password: "hunter2hunter2".into(),
            name: "Second".into(),
        },
    )
    .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    let weak = auth_service::register(
        &pool,
        &jwt,
        &RegisterBody {
            email: "other@example.com".into(),
            password: "nodigits".into(),
            name: "Other".into(),
        },
    )
    .await;
    assert!(matches!(weak, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn submitted_listings_wait_for_approval_under_moderation() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@example.com", false).await;

    let created = business_service::create_business(&pool, &owner, &listing_input("New Cafe"))
        .await
        .unwrap();
    assert!(!created.approved);

    // Hidden from the public detail view until approved...
    let hidden =
        business_service::get_business(&pool, ModerationPolicy::Moderated, created.id).await;
    assert!(matches!(hidden, Err(AppError::NotFound(_))));

    // ...but visible when moderation is switched off.
    let open = business_service::get_business(&pool, ModerationPolicy::Open, created.id)
        .await
        .unwrap();
    assert_eq!(open.business.id, created.id);

    let approved = business_service::approve_business(&pool, created.id)
        .await
        .unwrap();
    assert!(approved.approved);

    let detail =
        business_service::get_business(&pool, ModerationPolicy::Moderated, created.id)
            .await
            .unwrap();
    assert_eq!(detail.business.name, "New Cafe");
    assert!(detail.reviews.is_empty());
    assert_eq!(detail.average_rating, None);
}

#[tokio::test]
async fn only_owner_or_admin_may_edit_a_listing() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@example.com", false).await;
    let stranger = seed_user(&pool, "stranger@example.com", false).await;
    let admin = seed_user(&pool, "admin@example.com", true).await;

    let created = business_service::create_business(&pool, &owner, &listing_input("Cafe"))
        .await
        .unwrap();

    let changes = BusinessInput {
        phone: Some("555-0100".to_string()),
        ..Default::default()
    };

    let denied = business_service::update_business(&pool, &stranger, created.id, &changes).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let updated = business_service::update_business(&pool, &owner, created.id, &changes)
        .await
        .unwrap();
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    // Partial update: untouched fields survive.
    assert_eq!(updated.name, "Cafe");

    business_service::delete_business(&pool, &admin, created.id)
        .await
        .unwrap();
    let gone = business_service::get_business(&pool, ModerationPolicy::Open, created.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn hours_round_trip_as_json_object() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@example.com", false).await;

    let mut input = listing_input("Diner");
    input.hours = Some(json!({ "Mon-Fri": "7am-3pm", "Sat": "8am-1pm" }));
    let created = business_service::create_business(&pool, &owner, &input)
        .await
        .unwrap();
    assert_eq!(
        created.hours,
        Some(json!({ "Mon-Fri": "7am-3pm", "Sat": "8am-1pm" }))
    );

    let mut bad = listing_input("Bad Hours");
    bad.hours = Some(json!("7am-3pm"));
    let rejected = business_service::create_business(&pool, &owner, &bad).await;
    assert!(matches!(rejected, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn one_review_per_user_per_business() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@example.com", false).await;
    let reviewer = seed_user(&pool, "reviewer@example.com", false).await;

    let business = business_service::create_business(&pool, &owner, &listing_input("Cafe"))
        .await
        .unwrap();

    let bad_rating = review_service::create_review(
        &pool,
        &reviewer,
        &CreateReviewBody {
            business_id: business.id,
            rating: 6,
            comment: None,
        },
    )
    .await;
    assert!(matches!(bad_rating, Err(AppError::Validation(_))));

    let review = review_service::create_review(
        &pool,
        &reviewer,
        &CreateReviewBody {
            business_id: business.id,
            rating: 4,
            comment: Some("  solid lunch spot  ".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(review.rating, 4);
    assert_eq!(review.comment.as_deref(), Some("solid lunch spot"));

    let duplicate = review_service::create_review(
        &pool,
        &reviewer,
        &CreateReviewBody {
            business_id: business.id,
            rating: 5,
            comment: None,
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let detail = business_service::get_business(&pool, ModerationPolicy::Open, business.id)
        .await
        .unwrap();
    assert_eq!(detail.reviews.len(), 1);
    assert_eq!(detail.reviews[0].user_name, "Test User");
    assert_eq!(detail.average_rating, Some(4.0));
}

#[tokio::test]
async fn review_deletion_respects_ownership() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@example.com", false).await;
    let reviewer = seed_user(&pool, "reviewer@example.com", false).await;
    let stranger = seed_user(&pool, "stranger@example.com", false).await;
    let admin = seed_user(&pool, "admin@example.com", true).await;

    let business = business_service::create_business(&pool, &owner, &listing_input("Cafe"))
        .await
        .unwrap();
    let review = review_service::create_review(
        &pool,
        &reviewer,
        &CreateReviewBody {
            business_id: business.id,
            rating: 3,
            comment: None,
        },
    )
    .await
    .unwrap();

    // Someone else's review reads as absent, not forbidden.
    let denied = review_service::delete_review(&pool, &stranger, review.id).await;
    assert!(matches!(denied, Err(AppError::NotFound(_))));

    review_service::delete_review(&pool, &admin, review.id)
        .await
        .unwrap();
    let already_gone = review_service::delete_review(&pool, &reviewer, review.id).await;
    assert!(matches!(already_gone, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn favorites_flow_with_duplicate_rejection() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@example.com", false).await;
    let user = seed_user(&pool, "user@example.com", false).await;

    let business = business_service::create_business(&pool, &owner, &listing_input("Cafe"))
        .await
        .unwrap();

    let missing = favorite_service::add_favorite(&pool, &user, 9999).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let favorite = favorite_service::add_favorite(&pool, &user, business.id)
        .await
        .unwrap();
    assert_eq!(favorite.business_id, business.id);

    let duplicate = favorite_service::add_favorite(&pool, &user, business.id).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let favorites = favorite_service::list_favorites(&pool, &user).await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].business.id, business.id);
    assert_eq!(favorites[0].business.name, "Cafe");

    favorite_service::remove_favorite(&pool, &user, business.id)
        .await
        .unwrap();
    let again = favorite_service::remove_favorite(&pool, &user, business.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
    assert!(favorite_service::list_favorites(&pool, &user)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn unique_constraint_backs_up_the_duplicate_pre_check() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@example.com", false).await;
    let user = seed_user(&pool, "user@example.com", false).await;

    let business = business_service::create_business(&pool, &owner, &listing_input("Cafe"))
        .await
        .unwrap();

    favorite_repo::insert_favorite(&pool, user.id, business.id)
        .await
        .unwrap();
    let err = favorite_repo::insert_favorite(&pool, user.id, business.id)
        .await
        .unwrap_err();
    assert!(matches!(
        AppError::or_conflict(err, "business already in favorites"),
        AppError::Conflict(_)
    ));
}

#[tokio::test]
async fn cascading_delete_removes_reviews_and_favorites() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@example.com", false).await;
    let user = seed_user(&pool, "user@example.com", false).await;

    let business = business_service::create_business(&pool, &owner, &listing_input("Cafe"))
        .await
        .unwrap();
    review_service::create_review(
        &pool,
        &user,
        &CreateReviewBody {
            business_id: business.id,
            rating: 5,
            comment: None,
        },
    )
    .await
    .unwrap();
    favorite_service::add_favorite(&pool, &user, business.id)
        .await
        .unwrap();

    business_service::delete_business(&pool, &owner, business.id)
        .await
        .unwrap();

    assert!(review_repo::list_for_business(&pool, business.id)
        .await
        .unwrap()
        .is_empty());
    assert!(favorite_service::list_favorites(&pool, &user)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn reviews_of_unapproved_listings_are_hidden_with_the_listing() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@example.com", false).await;
    let reviewer = seed_user(&pool, "reviewer@example.com", false).await;

    let business = business_service::create_business(&pool, &owner, &listing_input("Cafe"))
        .await
        .unwrap();
    review_service::create_review(
        &pool,
        &reviewer,
        &CreateReviewBody {
            business_id: business.id,
            rating: 4,
            comment: None,
        },
    )
    .await
    .unwrap();

    // Pending listing: the review list discloses nothing, same as the detail
    // endpoint.
    let hidden =
        review_service::list_for_business(&pool, ModerationPolicy::Moderated, business.id).await;
    assert!(matches!(hidden, Err(AppError::NotFound(_))));

    let open = review_service::list_for_business(&pool, ModerationPolicy::Open, business.id)
        .await
        .unwrap();
    assert_eq!(open.len(), 1);

    business_service::approve_business(&pool, business.id)
        .await
        .unwrap();
    let visible =
        review_service::list_for_business(&pool, ModerationPolicy::Moderated, business.id)
            .await
            .unwrap();
    assert_eq!(visible.len(), 1);
}

#[tokio::test]
async fn admins_cannot_delete_their_own_account() {
    let pool = test_pool().await;
    let admin = seed_user(&pool, "admin@example.com", true).await;
    let user = seed_user(&pool, "user@example.com", false).await;

    let denied = auth_service::delete_user(&pool, admin.id, admin.id).await;
    assert!(matches!(denied, Err(AppError::Validation(_))));

    auth_service::delete_user(&pool, admin.id, user.id)
        .await
        .unwrap();
    let gone = auth_service::delete_user(&pool, admin.id, user.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
}
