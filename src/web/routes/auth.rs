use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::services::auth_service::{self, LoginBody, RegisterBody};
use crate::state::AppState;
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let session = auth_service::register(&state.pool, &state.jwt, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "user registered successfully",
            "user": session.user,
            "token": session.token,
        })),
    ))
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<Value>, AppError> {
    let session = auth_service::login(&state.pool, &state.jwt, &body).await?;
    Ok(Json(json!({
        "message": "login successful",
        "user": session.user,
        "token": session.token,
    })))
}

pub async fn me_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, AppError> {
    let user = auth_service::current_user(&state.pool, user.id).await?;
    Ok(Json(json!({ "user": user })))
}
