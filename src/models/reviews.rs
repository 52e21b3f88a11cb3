use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub business_id: i64,
    pub user_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReviewWithUserRow {
    pub id: i64,
    pub business_id: i64,
    pub user_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
    pub user_name: String,
}

/// Moderation view: one row per review with the names an admin needs to act.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminReviewRow {
    pub id: i64,
    pub business_id: i64,
    pub user_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
    pub user_name: String,
    pub user_email: String,
    pub business_name: String,
}
