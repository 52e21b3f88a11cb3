use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::info;

use crate::database::{business_repo, review_repo};
use crate::error::AppError;
use crate::models::{BusinessRow, BusinessView, ReviewWithUserRow};
use crate::services::search_service;
use crate::state::ModerationPolicy;
use crate::web::middleware::auth::AuthenticatedUser;

/// Body for both create and update; create enforces the required fields,
/// update treats every absent field as "keep current value".
#[derive(Debug, Deserialize, Default)]
pub struct BusinessInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub hours: Option<Value>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
}

pub struct BusinessDetail {
    pub business: BusinessView,
    pub reviews: Vec<ReviewWithUserRow>,
    pub average_rating: Option<f64>,
}

pub async fn create_business(
    pool: &SqlitePool,
    user: &AuthenticatedUser,
    input: &BusinessInput,
) -> Result<BusinessView, AppError> {
    let name = require(input.name.as_deref(), "name")?;
    let category = require(input.category.as_deref(), "category")?;
    let address = require(input.address.as_deref(), "address")?;
    let city = require(input.city.as_deref(), "city")?;
    search_service::validate_coordinate_pair(input.latitude, input.longitude)?;
    let hours = hours_to_json(&input.hours)?;

    let id = business_repo::insert_business(
        pool,
        business_repo::NewBusiness {
            owner_email: &user.email,
            name,
            category,
            description: trimmed(input.description.as_deref()),
            address,
            city,
            state: trimmed(input.state.as_deref()),
            zip_code: trimmed(input.zip_code.as_deref()),
            phone: trimmed(input.phone.as_deref()),
            email: trimmed(input.email.as_deref()),
            website: trimmed(input.website.as_deref()),
            hours: hours.as_deref(),
            latitude: input.latitude,
            longitude: input.longitude,
            image_url: trimmed(input.image_url.as_deref()),
        },
    )
    .await?;
    info!(business_id = id, owner = %user.email, "listing submitted");

    load_view(pool, id).await
}

pub async fn get_business(
    pool: &SqlitePool,
    policy: ModerationPolicy,
    id: i64,
) -> Result<BusinessDetail, AppError> {
    let row = business_repo::load_business(pool, id)
        .await?
        .ok_or(AppError::NotFound("business"))?;
    if policy.approved_only() && row.approved == 0 {
        return Err(AppError::NotFound("business"));
    }

    let reviews = review_repo::list_for_business(pool, id).await?;
    let average_rating = average_rating(&reviews);

    Ok(BusinessDetail {
        business: row.into(),
        reviews,
        average_rating,
    })
}

pub async fn update_business(
    pool: &SqlitePool,
    user: &AuthenticatedUser,
    id: i64,
    input: &BusinessInput,
) -> Result<BusinessView, AppError> {
    let row = business_repo::load_business(pool, id)
        .await?
        .ok_or(AppError::NotFound("business"))?;
    authorize_owner(user, &row)?;
    search_service::validate_coordinate_pair(input.latitude, input.longitude)?;
    let hours = hours_to_json(&input.hours)?;

    business_repo::update_business(
        pool,
        id,
        business_repo::BusinessChanges {
            name: trimmed(input.name.as_deref()),
            category: trimmed(input.category.as_deref()),
            description: trimmed(input.description.as_deref()),
            address: trimmed(input.address.as_deref()),
            city: trimmed(input.city.as_deref()),
            state: trimmed(input.state.as_deref()),
            zip_code: trimmed(input.zip_code.as_deref()),
            phone: trimmed(input.phone.as_deref()),
            email: trimmed(input.email.as_deref()),
            website: trimmed(input.website.as_deref()),
            hours: hours.as_deref(),
            latitude: input.latitude,
            longitude: input.longitude,
            image_url: trimmed(input.image_url.as_deref()),
        },
    )
    .await?;

    load_view(pool, id).await
}

pub async fn delete_business(
    pool: &SqlitePool,
    user: &AuthenticatedUser,
    id: i64,
) -> Result<(), AppError> {
    let row = business_repo::load_business(pool, id)
        .await?
        .ok_or(AppError::NotFound("business"))?;
    authorize_owner(user, &row)?;

    business_repo::delete_business(pool, id).await?;
    info!(business_id = id, "listing deleted");
    Ok(())
}

/// Admin view: includes unapproved listings.
pub async fn admin_list_businesses(pool: &SqlitePool) -> Result<Vec<BusinessView>, AppError> {
    let rows = business_repo::list_all(pool).await?;
    Ok(rows.into_iter().map(BusinessView::from).collect())
}

pub async fn approve_business(pool: &SqlitePool, id: i64) -> Result<BusinessView, AppError> {
    if business_repo::approve_business(pool, id).await? == 0 {
        return Err(AppError::NotFound("business"));
    }
    info!(business_id = id, "listing approved");
    load_view(pool, id).await
}

async fn load_view(pool: &SqlitePool, id: i64) -> Result<BusinessView, AppError> {
    business_repo::load_business(pool, id)
        .await?
        .map(BusinessView::from)
        .ok_or(AppError::NotFound("business"))
}

fn authorize_owner(user: &AuthenticatedUser, row: &BusinessRow) -> Result<(), AppError> {
    if user.is_admin || row.owner_email.as_deref() == Some(user.email.as_str()) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "only the owner or an admin can modify a listing",
        ))
    }
}

fn require<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn hours_to_json(hours: &Option<Value>) -> Result<Option<String>, AppError> {
    match hours {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Object(_)) => Ok(Some(value.to_string())),
        Some(_) => Err(AppError::Validation(
            "hours must be an object mapping day ranges to time ranges".into(),
        )),
    }
}

fn average_rating(reviews: &[ReviewWithUserRow]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: i64 = reviews.iter().map(|r| r.rating).sum();
    Some(((sum as f64 / reviews.len() as f64) * 10.0).round() / 10.0)
}
