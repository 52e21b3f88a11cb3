use sqlx::SqlitePool;

use crate::models::{FavoriteBusinessRow, FavoriteRow};

pub const SQL_LIST_FOR_USER: &str = r#"
SELECT
    b.id, b.owner_email, b.name, b.category, b.description, b.address, b.city,
    b.state, b.zip_code, b.phone, b.email, b.website, b.hours, b.latitude,
    b.longitude, b.image_url, b.approved, b.created_at, b.updated_at,
    f.created_at AS favorited_at
FROM favorites f
JOIN businesses b ON b.id = f.business_id
WHERE f.user_id = ?1
ORDER BY f.created_at DESC, f.id DESC
"#;

pub const SQL_FIND: &str = r#"
SELECT id, user_id, business_id, created_at
FROM favorites
WHERE user_id = ?1 AND business_id = ?2
"#;

pub const SQL_LOAD: &str = r#"
SELECT id, user_id, business_id, created_at
FROM favorites
WHERE id = ?1
"#;

pub const SQL_INSERT: &str = "INSERT INTO favorites (user_id, business_id) VALUES (?, ?)";

pub const SQL_DELETE: &str = "DELETE FROM favorites WHERE user_id = ?1 AND business_id = ?2";

pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> sqlx::Result<Vec<FavoriteBusinessRow>> {
    sqlx::query_as::<_, FavoriteBusinessRow>(SQL_LIST_FOR_USER)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn find(
    pool: &SqlitePool,
    user_id: i64,
    business_id: i64,
) -> sqlx::Result<Option<FavoriteRow>> {
    sqlx::query_as::<_, FavoriteRow>(SQL_FIND)
        .bind(user_id)
        .bind(business_id)
        .fetch_optional(pool)
        .await
}

pub async fn load_favorite(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<FavoriteRow>> {
    sqlx::query_as::<_, FavoriteRow>(SQL_LOAD)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_favorite(
    pool: &SqlitePool,
    user_id: i64,
    business_id: i64,
) -> sqlx::Result<i64> {
    let res = sqlx::query(SQL_INSERT)
        .bind(user_id)
        .bind(business_id)
        .execute(pool)
        .await?;
    Ok(res.last_insert_rowid())
}

pub async fn delete_favorite(
    pool: &SqlitePool,
    user_id: i64,
    business_id: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE)
        .bind(user_id)
        .bind(business_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
