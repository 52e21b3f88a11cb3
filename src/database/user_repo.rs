use sqlx::SqlitePool;

use crate::models::UserRow;

pub const SQL_FIND_BY_EMAIL: &str = r#"
SELECT id, email, password_hash, name, is_admin, created_at
FROM users
WHERE email = ?1
"#;

pub const SQL_LOAD_USER: &str = r#"
SELECT id, email, password_hash, name, is_admin, created_at
FROM users
WHERE id = ?1
"#;

pub const SQL_INSERT_USER: &str =
    "INSERT INTO users (email, password_hash, name) VALUES (?, ?, ?)";

pub const SQL_LIST_USERS: &str = r#"
SELECT id, email, password_hash, name, is_admin, created_at
FROM users
ORDER BY created_at DESC, id DESC
"#;

pub const SQL_DELETE_USER: &str = "DELETE FROM users WHERE id = ?1";

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_FIND_BY_EMAIL)
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn load_user(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_LOAD_USER)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_user(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    name: &str,
) -> sqlx::Result<i64> {
    let res = sqlx::query(SQL_INSERT_USER)
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .execute(pool)
        .await?;
    Ok(res.last_insert_rowid())
}

pub async fn list_users(pool: &SqlitePool) -> sqlx::Result<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>(SQL_LIST_USERS)
        .fetch_all(pool)
        .await
}

pub async fn delete_user(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_USER)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
