use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    pub is_admin: bool,
}

/// Decodes the bearer token when present and stores the caller in request
/// extensions. Requests without a valid token pass through unauthenticated;
/// handlers that need a caller extract [`AuthenticatedUser`] and get a 401
/// when it is missing.
pub async fn auth_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|hv| hv.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).to_string());

    if let Some(token) = token {
        if let Ok(claims) = state.jwt.verify(&token) {
            request.extensions_mut().insert(AuthenticatedUser {
                id: claims.sub,
                email: claims.email,
                is_admin: claims.is_admin,
            });
        }
    }

    next.run(request).await
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized("login required"))
    }
}

pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AppError::Forbidden("admin access required"));
        }
        Ok(AdminUser(user))
    }
}
