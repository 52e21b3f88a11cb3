use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::services::favorite_service;
use crate::state::AppState;
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn list_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, AppError> {
    let favorites = favorite_service::list_favorites(&state.pool, &user).await?;
    Ok(Json(json!({ "favorites": favorites })))
}

#[derive(Debug, Deserialize)]
pub struct AddFavoriteBody {
    pub business_id: i64,
}

pub async fn add_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<AddFavoriteBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let favorite = favorite_service::add_favorite(&state.pool, &user, body.business_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "business added to favorites",
            "favorite": favorite,
        })),
    ))
}

pub async fn remove_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(business_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    favorite_service::remove_favorite(&state.pool, &user, business_id).await?;
    Ok(Json(json!({ "message": "business removed from favorites" })))
}
