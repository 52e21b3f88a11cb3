use serde::Deserialize;
use sqlx::SqlitePool;

use crate::database::business_repo::{self, SearchParams};
use crate::error::AppError;
use crate::models::{BusinessRow, BusinessView};
use crate::state::ModerationPolicy;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_RADIUS_KM: f64 = 50.0;
pub const DEFAULT_LIMIT: i64 = 50;
pub const DEFAULT_FEATURED_LIMIT: i64 = 3;

/// Raw query parameters as they arrive on the wire. Every field is optional;
/// non-numeric values for the numeric fields are rejected by typed
/// deserialization at the HTTP boundary and never coerced to zero.
#[derive(Debug, Deserialize, Default)]
pub struct BusinessSearchQuery {
    #[serde(alias = "search")]
    pub q: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius_km: Option<f64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub struct GeoFilter {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
}

/// Validated filter criteria. All filters are conjunctive; the geo filter is
/// only active when both coordinates were supplied.
#[derive(Debug, Default)]
pub struct ListingFilter {
    pub text: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub geo: Option<GeoFilter>,
    pub limit: i64,
    pub offset: i64,
}

impl ListingFilter {
    pub fn from_query(query: &BusinessSearchQuery) -> Result<Self, AppError> {
        let geo = match (query.lat, query.lon) {
            (Some(lat), Some(lon)) => {
                check_latitude(lat)?;
                check_longitude(lon)?;
                let radius_km = query.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
                if !radius_km.is_finite() || radius_km <= 0.0 {
                    return Err(AppError::Validation(
                        "radius_km must be a positive number".into(),
                    ));
                }
                Some(GeoFilter {
                    lat,
                    lon,
                    radius_km,
                })
            }
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "lat and lon must be supplied together".into(),
                ))
            }
        };

        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        if limit <= 0 {
            return Err(AppError::Validation("limit must be positive".into()));
        }
        let offset = query.offset.unwrap_or(0);
        if offset < 0 {
            return Err(AppError::Validation("offset must not be negative".into()));
        }

        Ok(ListingFilter {
            text: normalize(query.q.as_deref()),
            category: normalize(query.category.as_deref()),
            city: normalize(query.city.as_deref()),
            geo,
            limit,
            offset,
        })
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn check_latitude(lat: f64) -> Result<(), AppError> {
    if !lat.is_finite() || lat.abs() > 90.0 {
        return Err(AppError::Validation(
            "latitude must be between -90 and 90".into(),
        ));
    }
    Ok(())
}

fn check_longitude(lon: f64) -> Result<(), AppError> {
    if !lon.is_finite() || lon.abs() > 180.0 {
        return Err(AppError::Validation(
            "longitude must be between -180 and 180".into(),
        ));
    }
    Ok(())
}

/// Listing create/update rule: a coordinate is both halves or neither.
pub fn validate_coordinate_pair(lat: Option<f64>, lon: Option<f64>) -> Result<(), AppError> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => {
            check_latitude(lat)?;
            check_longitude(lon)
        }
        (None, None) => Ok(()),
        _ => Err(AppError::Validation(
            "latitude and longitude must be supplied together".into(),
        )),
    }
}

pub struct SearchResults {
    pub businesses: Vec<BusinessView>,
    pub count: usize,
}

pub async fn search_businesses(
    pool: &SqlitePool,
    policy: ModerationPolicy,
    query: &BusinessSearchQuery,
) -> Result<SearchResults, AppError> {
    let filter = ListingFilter::from_query(query)?;

    let businesses = match filter.geo {
        Some(geo) => geo_search(pool, policy, &filter, geo).await?,
        None => recency_search(pool, policy, &filter).await?,
    };

    let count = businesses.len();
    Ok(SearchResults { businesses, count })
}

/// No reference point: newest first, paged in SQL.
async fn recency_search(
    pool: &SqlitePool,
    policy: ModerationPolicy,
    filter: &ListingFilter,
) -> Result<Vec<BusinessView>, AppError> {
    let rows = business_repo::search_listings(
        pool,
        SearchParams {
            approved_only: policy.approved_only(),
            text: filter.text.as_deref(),
            category: filter.category.as_deref(),
            city: filter.city.as_deref(),
            bbox: None,
            page: Some((filter.limit, filter.offset)),
        },
    )
    .await?;

    Ok(rows.into_iter().map(BusinessView::from).collect())
}

/// Reference point supplied: a bounding box narrows the candidates in SQL,
/// exact Haversine distances decide inclusion and rank, and only then is the
/// page cut. Rows without coordinates are never eligible here.
async fn geo_search(
    pool: &SqlitePool,
    policy: ModerationPolicy,
    filter: &ListingFilter,
    geo: GeoFilter,
) -> Result<Vec<BusinessView>, AppError> {
    let bbox = bounding_box(geo.lat, geo.lon, geo.radius_km);
    let rows = business_repo::search_listings(
        pool,
        SearchParams {
            approved_only: policy.approved_only(),
            text: filter.text.as_deref(),
            category: filter.category.as_deref(),
            city: filter.city.as_deref(),
            bbox: Some(bbox),
            page: None,
        },
    )
    .await?;

    let mut hits: Vec<(f64, BusinessRow)> = Vec::new();
    for row in rows {
        let (Some(lat), Some(lon)) = (row.latitude, row.longitude) else {
            continue;
        };
        let distance = haversine_km(geo.lat, geo.lon, lat, lon);
        if distance <= geo.radius_km {
            hits.push((distance, row));
        }
    }

    hits.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));

    Ok(hits
        .into_iter()
        .skip(filter.offset as usize)
        .take(filter.limit as usize)
        .map(|(distance, row)| BusinessView::from(row).with_distance(distance))
        .collect())
}

pub async fn featured_businesses(
    pool: &SqlitePool,
    policy: ModerationPolicy,
    limit: Option<i64>,
) -> Result<Vec<BusinessView>, AppError> {
    let limit = limit.unwrap_or(DEFAULT_FEATURED_LIMIT);
    if limit <= 0 {
        return Err(AppError::Validation("limit must be positive".into()));
    }
    let rows = business_repo::sample_random(pool, policy.approved_only(), limit).await?;
    Ok(rows.into_iter().map(BusinessView::from).collect())
}

/// Great-circle distance in km. The half-angle (asin) formulation keeps the
/// result stable for near-identical points, where the plain acos form can
/// wander outside its domain and produce NaN; the sqrt argument is still
/// clamped against tiny floating-point overshoot.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

/// Coarse degree box around the reference point, for the SQL pre-filter only.
/// The longitude bounds may leave [-180, 180] when the box crosses the
/// antimeridian; the store layer wraps the range. Near the poles the span
/// blows up toward the whole circle, which just means more candidates for
/// the exact distance check.
pub fn bounding_box(lat: f64, lon: f64, radius_km: f64) -> (f64, f64, f64, f64) {
    let lat_change = radius_km / 111.0;
    let lon_change = (radius_km / 111.0) / lat.to_radians().cos().abs();

    (
        lat - lat_change,
        lat + lat_change,
        lon - lon_change,
        lon + lon_change,
    )
}
