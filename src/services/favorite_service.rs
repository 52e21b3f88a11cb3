use sqlx::SqlitePool;

use crate::database::{business_repo, favorite_repo};
use crate::error::AppError;
use crate::models::{FavoriteRow, FavoriteView};
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn list_favorites(
    pool: &SqlitePool,
    user: &AuthenticatedUser,
) -> Result<Vec<FavoriteView>, AppError> {
    let rows = favorite_repo::list_for_user(pool, user.id).await?;
    Ok(rows.into_iter().map(FavoriteView::from).collect())
}

pub async fn add_favorite(
    pool: &SqlitePool,
    user: &AuthenticatedUser,
    business_id: i64,
) -> Result<FavoriteRow, AppError> {
    if business_repo::load_business(pool, business_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("business"));
    }
    if favorite_repo::find(pool, user.id, business_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("business already in favorites".into()));
    }

    let id = favorite_repo::insert_favorite(pool, user.id, business_id)
        .await
        .map_err(|e| AppError::or_conflict(e, "business already in favorites"))?;

    favorite_repo::load_favorite(pool, id)
        .await?
        .ok_or(AppError::NotFound("favorite"))
}

pub async fn remove_favorite(
    pool: &SqlitePool,
    user: &AuthenticatedUser,
    business_id: i64,
) -> Result<(), AppError> {
    if favorite_repo::delete_favorite(pool, user.id, business_id).await? == 0 {
        return Err(AppError::NotFound("favorite"));
    }
    Ok(())
}
