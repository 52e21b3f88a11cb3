use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::database::user_repo;
use crate::error::AppError;
use crate::models::{UserRow, UserView};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Tokens expire after 24 hours.
    pub fn issue(&self, user: &UserRow) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            is_admin: user.is_admin != 0,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(24)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(Box::new(e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("invalid or expired token"))
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

pub struct AuthSession {
    pub user: UserView,
    pub token: String,
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "password must be at least 8 characters long".into(),
        ));
    }
    if !password.bytes().any(|b| b.is_ascii_digit()) {
        return Err(AppError::Validation(
            "password must include at least one number".into(),
        ));
    }
    Ok(())
}

pub async fn register(
    pool: &SqlitePool,
    jwt: &JwtKeys,
    body: &RegisterBody,
) -> Result<AuthSession, AppError> {
    let email = body.email.trim().to_ascii_lowercase();
    let name = body.name.trim();
    if email.is_empty() || name.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "email, password and name are required".into(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("email is not valid".into()));
    }
    validate_password(&body.password)?;

    if user_repo::find_by_email(pool, &email).await?.is_some() {
        return Err(AppError::Conflict(
            "an account with this email already exists".into(),
        ));
    }

    let password_hash =
        hash(&body.password, DEFAULT_COST).map_err(|e| AppError::Internal(Box::new(e)))?;
    let id = user_repo::insert_user(pool, &email, &password_hash, name)
        .await
        .map_err(|e| AppError::or_conflict(e, "an account with this email already exists"))?;

    let user = user_repo::load_user(pool, id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    info!(user_id = user.id, "account registered");

    let token = jwt.issue(&user)?;
    Ok(AuthSession {
        user: user.into(),
        token,
    })
}

pub async fn login(
    pool: &SqlitePool,
    jwt: &JwtKeys,
    body: &LoginBody,
) -> Result<AuthSession, AppError> {
    let email = body.email.trim().to_ascii_lowercase();
    if email.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation("email and password are required".into()));
    }

    let Some(user) = user_repo::find_by_email(pool, &email).await? else {
        return Err(AppError::Unauthorized("invalid credentials"));
    };

    let ok = verify(&body.password, &user.password_hash)
        .map_err(|e| AppError::Internal(Box::new(e)))?;
    if !ok {
        return Err(AppError::Unauthorized("invalid credentials"));
    }

    let token = jwt.issue(&user)?;
    Ok(AuthSession {
        user: user.into(),
        token,
    })
}

pub async fn current_user(pool: &SqlitePool, user_id: i64) -> Result<UserView, AppError> {
    user_repo::load_user(pool, user_id)
        .await?
        .map(UserView::from)
        .ok_or(AppError::NotFound("user"))
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<UserView>, AppError> {
    let rows = user_repo::list_users(pool).await?;
    Ok(rows.into_iter().map(UserView::from).collect())
}

pub async fn delete_user(pool: &SqlitePool, admin_id: i64, user_id: i64) -> Result<(), AppError> {
    if admin_id == user_id {
        return Err(AppError::Validation("cannot delete your own account".into()));
    }
    if user_repo::delete_user(pool, user_id).await? == 0 {
        return Err(AppError::NotFound("user"));
    }
    Ok(())
}
