use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::services::review_service::{self, CreateReviewBody};
use crate::state::AppState;
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn list_handler(
    State(state): State<AppState>,
    Path(business_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let reviews =
        review_service::list_for_business(&state.pool, state.moderation, business_id).await?;
    Ok(Json(json!({ "reviews": reviews })))
}

pub async fn create_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateReviewBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let review = review_service::create_review(&state.pool, &user, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "review created successfully",
            "review": review,
        })),
    ))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    review_service::delete_review(&state.pool, &user, id).await?;
    Ok(Json(json!({ "message": "review deleted successfully" })))
}
