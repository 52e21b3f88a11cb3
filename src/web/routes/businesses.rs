use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::services::business_service::{self, BusinessInput};
use crate::services::search_service::{self, BusinessSearchQuery};
use crate::state::AppState;
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<BusinessSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let results = search_service::search_businesses(&state.pool, state.moderation, &query).await?;
    Ok(Json(json!({
        "businesses": results.businesses,
        "count": results.count,
    })))
}

#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<i64>,
}

pub async fn featured_handler(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<Value>, AppError> {
    let businesses =
        search_service::featured_businesses(&state.pool, state.moderation, query.limit).await?;
    Ok(Json(json!({ "businesses": businesses })))
}

pub async fn detail_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let detail = business_service::get_business(&state.pool, state.moderation, id).await?;
    Ok(Json(json!({
        "business": detail.business,
        "reviews": detail.reviews,
        "average_rating": detail.average_rating,
    })))
}

pub async fn create_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<BusinessInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let business = business_service::create_business(&state.pool, &user, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "business created successfully",
            "business": business,
        })),
    ))
}

pub async fn update_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(input): Json<BusinessInput>,
) -> Result<Json<Value>, AppError> {
    let business = business_service::update_business(&state.pool, &user, id, &input).await?;
    Ok(Json(json!({
        "message": "business updated successfully",
        "business": business,
    })))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    business_service::delete_business(&state.pool, &user, id).await?;
    Ok(Json(json!({ "message": "business deleted successfully" })))
}
