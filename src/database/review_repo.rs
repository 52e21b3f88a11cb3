use sqlx::SqlitePool;

use crate::models::{AdminReviewRow, ReviewRow, ReviewWithUserRow};

pub const SQL_LIST_FOR_BUSINESS: &str = r#"
SELECT
    r.id, r.business_id, r.user_id, r.rating, r.comment, r.created_at,
    u.name AS user_name
FROM reviews r
JOIN users u ON u.id = r.user_id
WHERE r.business_id = ?1
ORDER BY r.created_at DESC, r.id DESC
"#;

pub const SQL_FIND_FOR_USER: &str = r#"
SELECT id, business_id, user_id, rating, comment, created_at
FROM reviews
WHERE business_id = ?1 AND user_id = ?2
"#;

pub const SQL_LOAD_REVIEW: &str = r#"
SELECT id, business_id, user_id, rating, comment, created_at
FROM reviews
WHERE id = ?1
"#;

pub const SQL_INSERT_REVIEW: &str = r#"
INSERT INTO reviews (business_id, user_id, rating, comment) VALUES (?, ?, ?, ?)
"#;

pub const SQL_DELETE_REVIEW: &str = "DELETE FROM reviews WHERE id = ?1";

pub const SQL_LIST_ALL_ADMIN: &str = r#"
SELECT
    r.id, r.business_id, r.user_id, r.rating, r.comment, r.created_at,
    u.name AS user_name, u.email AS user_email, b.name AS business_name
FROM reviews r
JOIN users u ON u.id = r.user_id
JOIN businesses b ON b.id = r.business_id
ORDER BY r.created_at DESC, r.id DESC
"#;

pub async fn list_for_business(
    pool: &SqlitePool,
    business_id: i64,
) -> sqlx::Result<Vec<ReviewWithUserRow>> {
    sqlx::query_as::<_, ReviewWithUserRow>(SQL_LIST_FOR_BUSINESS)
        .bind(business_id)
        .fetch_all(pool)
        .await
}

pub async fn find_for_user(
    pool: &SqlitePool,
    business_id: i64,
    user_id: i64,
) -> sqlx::Result<Option<ReviewRow>> {
    sqlx::query_as::<_, ReviewRow>(SQL_FIND_FOR_USER)
        .bind(business_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn load_review(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<ReviewRow>> {
    sqlx::query_as::<_, ReviewRow>(SQL_LOAD_REVIEW)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_review(
    pool: &SqlitePool,
    business_id: i64,
    user_id: i64,
    rating: i64,
    comment: Option<&str>,
) -> sqlx::Result<i64> {
    let res = sqlx::query(SQL_INSERT_REVIEW)
        .bind(business_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .execute(pool)
        .await?;
    Ok(res.last_insert_rowid())
}

pub async fn delete_review(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_REVIEW)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn list_all_admin(pool: &SqlitePool) -> sqlx::Result<Vec<AdminReviewRow>> {
    sqlx::query_as::<_, AdminReviewRow>(SQL_LIST_ALL_ADMIN)
        .fetch_all(pool)
        .await
}
