use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::database::{business_repo, review_repo};
use crate::error::AppError;
use crate::models::{AdminReviewRow, ReviewRow, ReviewWithUserRow};
use crate::state::ModerationPolicy;
use crate::web::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct CreateReviewBody {
    pub business_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
}

/// Public listing of a business's reviews. An unapproved business reads as
/// absent under moderation, matching the detail endpoint.
pub async fn list_for_business(
    pool: &SqlitePool,
    policy: ModerationPolicy,
    business_id: i64,
) -> Result<Vec<ReviewWithUserRow>, AppError> {
    let Some(business) = business_repo::load_business(pool, business_id).await? else {
        return Err(AppError::NotFound("business"));
    };
    if policy.approved_only() && business.approved == 0 {
        return Err(AppError::NotFound("business"));
    }
    Ok(review_repo::list_for_business(pool, business_id).await?)
}

pub async fn create_review(
    pool: &SqlitePool,
    user: &AuthenticatedUser,
    body: &CreateReviewBody,
) -> Result<ReviewRow, AppError> {
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::Validation("rating must be between 1 and 5".into()));
    }
    if business_repo::load_business(pool, body.business_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("business"));
    }
    if review_repo::find_for_user(pool, body.business_id, user.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "you have already reviewed this business".into(),
        ));
    }

    let comment = body
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let id = review_repo::insert_review(pool, body.business_id, user.id, body.rating, comment)
        .await
        .map_err(|e| AppError::or_conflict(e, "you have already reviewed this business"))?;
    info!(review_id = id, business_id = body.business_id, "review created");

    review_repo::load_review(pool, id)
        .await?
        .ok_or(AppError::NotFound("review"))
}

/// A caller may delete their own review; admins may delete any. A review
/// owned by someone else reads as absent rather than forbidden.
pub async fn delete_review(
    pool: &SqlitePool,
    user: &AuthenticatedUser,
    review_id: i64,
) -> Result<(), AppError> {
    let Some(review) = review_repo::load_review(pool, review_id).await? else {
        return Err(AppError::NotFound("review"));
    };
    if review.user_id != user.id && !user.is_admin {
        return Err(AppError::NotFound("review"));
    }

    review_repo::delete_review(pool, review_id).await?;
    Ok(())
}

pub async fn admin_list_reviews(pool: &SqlitePool) -> Result<Vec<AdminReviewRow>, AppError> {
    Ok(review_repo::list_all_admin(pool).await?)
}

pub async fn admin_delete_review(pool: &SqlitePool, review_id: i64) -> Result<(), AppError> {
    if review_repo::delete_review(pool, review_id).await? == 0 {
        return Err(AppError::NotFound("review"));
    }
    Ok(())
}
