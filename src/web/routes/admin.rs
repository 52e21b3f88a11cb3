use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::services::business_service::{self, BusinessInput};
use crate::services::{auth_service, review_service};
use crate::state::AppState;
use crate::web::middleware::auth::AdminUser;

pub async fn list_users_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let users = auth_service::list_users(&state.pool).await?;
    Ok(Json(json!({ "users": users })))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    auth_service::delete_user(&state.pool, admin.0.id, id).await?;
    Ok(Json(json!({ "message": "user deleted successfully" })))
}

pub async fn list_reviews_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let reviews = review_service::admin_list_reviews(&state.pool).await?;
    Ok(Json(json!({ "reviews": reviews })))
}

pub async fn delete_review_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    review_service::admin_delete_review(&state.pool, id).await?;
    Ok(Json(json!({ "message": "review deleted successfully" })))
}

pub async fn list_businesses_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let businesses = business_service::admin_list_businesses(&state.pool).await?;
    Ok(Json(json!({ "businesses": businesses })))
}

pub async fn update_business_handler(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(input): Json<BusinessInput>,
) -> Result<Json<Value>, AppError> {
    let business = business_service::update_business(&state.pool, &admin.0, id, &input).await?;
    Ok(Json(json!({
        "message": "business updated successfully",
        "business": business,
    })))
}

pub async fn approve_business_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let business = business_service::approve_business(&state.pool, id).await?;
    Ok(Json(json!({
        "message": "business approved",
        "business": business,
    })))
}

pub async fn delete_business_handler(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    business_service::delete_business(&state.pool, &admin.0, id).await?;
    Ok(Json(json!({ "message": "business deleted successfully" })))
}
