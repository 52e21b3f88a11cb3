use serde::Serialize;

use crate::models::{BusinessRow, BusinessView};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FavoriteRow {
    pub id: i64,
    pub user_id: i64,
    pub business_id: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FavoriteBusinessRow {
    #[sqlx(flatten)]
    pub business: BusinessRow,
    pub favorited_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteView {
    #[serde(flatten)]
    pub business: BusinessView,
    pub favorited_at: String,
}

impl From<FavoriteBusinessRow> for FavoriteView {
    fn from(row: FavoriteBusinessRow) -> Self {
        FavoriteView {
            business: row.business.into(),
            favorited_at: row.favorited_at,
        }
    }
}
