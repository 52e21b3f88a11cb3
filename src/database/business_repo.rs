use sqlx::{sqlite::SqliteArguments, Arguments, SqlitePool};

use crate::models::BusinessRow;

pub const SQL_SEARCH_BASE: &str = r#"
SELECT
    id, owner_email, name, category, description, address, city, state, zip_code,
    phone, email, website, hours, latitude, longitude, image_url, approved,
    created_at, updated_at
FROM businesses
WHERE 1 = 1
"#;

pub const SQL_LOAD_BUSINESS: &str = r#"
SELECT
    id, owner_email, name, category, description, address, city, state, zip_code,
    phone, email, website, hours, latitude, longitude, image_url, approved,
    created_at, updated_at
FROM businesses
WHERE id = ?1
"#;

pub const SQL_LIST_ALL: &str = r#"
SELECT
    id, owner_email, name, category, description, address, city, state, zip_code,
    phone, email, website, hours, latitude, longitude, image_url, approved,
    created_at, updated_at
FROM businesses
ORDER BY created_at DESC, id DESC
"#;

pub const SQL_INSERT_BUSINESS: &str = r#"
INSERT INTO businesses (
  owner_email, name, category, description, address, city, state, zip_code,
  phone, email, website, hours, latitude, longitude, image_url
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const SQL_UPDATE_BUSINESS: &str = r#"
UPDATE businesses SET
  name = COALESCE(?, name),
  category = COALESCE(?, category),
  description = COALESCE(?, description),
  address = COALESCE(?, address),
  city = COALESCE(?, city),
  state = COALESCE(?, state),
  zip_code = COALESCE(?, zip_code),
  phone = COALESCE(?, phone),
  email = COALESCE(?, email),
  website = COALESCE(?, website),
  hours = COALESCE(?, hours),
  latitude = COALESCE(?, latitude),
  longitude = COALESCE(?, longitude),
  image_url = COALESCE(?, image_url),
  updated_at = CURRENT_TIMESTAMP
WHERE id = ?
"#;

pub const SQL_APPROVE_BUSINESS: &str = r#"
UPDATE businesses SET approved = 1, updated_at = CURRENT_TIMESTAMP WHERE id = ?1
"#;

pub const SQL_DELETE_BUSINESS: &str = "DELETE FROM businesses WHERE id = ?1";

pub struct SearchParams<'a> {
    pub approved_only: bool,
    pub text: Option<&'a str>,
    pub category: Option<&'a str>,
    pub city: Option<&'a str>,
    pub bbox: Option<(f64, f64, f64, f64)>,
    /// (limit, offset). Only set on the recency path; the geo path orders and
    /// pages in memory after exact distances are known, so the SQL must not
    /// cut candidates early.
    pub page: Option<(i64, i64)>,
}

pub async fn search_listings(
    pool: &SqlitePool,
    params: SearchParams<'_>,
) -> sqlx::Result<Vec<BusinessRow>> {
    let mut sql = String::from(SQL_SEARCH_BASE);
    let mut args = SqliteArguments::default();

    if params.approved_only {
        sql.push_str(" AND approved = 1");
    }

    if let Some(text) = params.text {
        // SQLite LIKE is case-insensitive for ASCII.
        sql.push_str(" AND (name LIKE ? OR description LIKE ?)");
        let pattern = format!("%{}%", text);
        args.add(pattern.clone());
        args.add(pattern);
    }

    if let Some(category) = params.category {
        sql.push_str(" AND category = ?");
        args.add(category);
    }

    if let Some(city) = params.city {
        sql.push_str(" AND city LIKE ?");
        args.add(format!("%{}%", city));
    }

    if let Some((min_lat, max_lat, min_lon, max_lon)) = params.bbox {
        // NULL comparisons are false throughout: rows without coordinates
        // fall out of every branch.
        sql.push_str(" AND latitude BETWEEN ? AND ?");
        args.add(min_lat);
        args.add(max_lat);
        if max_lon - min_lon >= 360.0 {
            // Near-polar box spans every longitude; latitude alone narrows
            // the candidates.
            sql.push_str(" AND longitude IS NOT NULL");
        } else if min_lon < -180.0 || max_lon > 180.0 {
            // Box crosses the antimeridian: the longitude range wraps.
            sql.push_str(" AND (longitude >= ? OR longitude <= ?)");
            args.add(wrap_longitude(min_lon));
            args.add(wrap_longitude(max_lon));
        } else {
            sql.push_str(" AND longitude BETWEEN ? AND ?");
            args.add(min_lon);
            args.add(max_lon);
        }
    }

    if let Some((limit, offset)) = params.page {
        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");
        args.add(limit);
        args.add(offset);
    }

    sqlx::query_as_with::<_, BusinessRow, _>(&sql, args)
        .fetch_all(pool)
        .await
}

fn wrap_longitude(lon: f64) -> f64 {
    if lon < -180.0 {
        lon + 360.0
    } else if lon > 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

/// Uniform random sample, re-drawn on every call.
pub async fn sample_random(
    pool: &SqlitePool,
    approved_only: bool,
    limit: i64,
) -> sqlx::Result<Vec<BusinessRow>> {
    let mut sql = String::from(SQL_SEARCH_BASE);
    let mut args = SqliteArguments::default();

    if approved_only {
        sql.push_str(" AND approved = 1");
    }
    sql.push_str(" ORDER BY RANDOM() LIMIT ?");
    args.add(limit);

    sqlx::query_as_with::<_, BusinessRow, _>(&sql, args)
        .fetch_all(pool)
        .await
}

pub async fn load_business(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<BusinessRow>> {
    sqlx::query_as::<_, BusinessRow>(SQL_LOAD_BUSINESS)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<BusinessRow>> {
    sqlx::query_as::<_, BusinessRow>(SQL_LIST_ALL)
        .fetch_all(pool)
        .await
}

pub struct NewBusiness<'a> {
    pub owner_email: &'a str,
    pub name: &'a str,
    pub category: &'a str,
    pub description: Option<&'a str>,
    pub address: &'a str,
    pub city: &'a str,
    pub state: Option<&'a str>,
    pub zip_code: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub website: Option<&'a str>,
    pub hours: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<&'a str>,
}

pub async fn insert_business(pool: &SqlitePool, b: NewBusiness<'_>) -> sqlx::Result<i64> {
    let res = sqlx::query(SQL_INSERT_BUSINESS)
        .bind(b.owner_email)
        .bind(b.name)
        .bind(b.category)
        .bind(b.description)
        .bind(b.address)
        .bind(b.city)
        .bind(b.state)
        .bind(b.zip_code)
        .bind(b.phone)
        .bind(b.email)
        .bind(b.website)
        .bind(b.hours)
        .bind(b.latitude)
        .bind(b.longitude)
        .bind(b.image_url)
        .execute(pool)
        .await?;
    Ok(res.last_insert_rowid())
}

/// Partial update; absent fields keep their current value.
#[derive(Default)]
pub struct BusinessChanges<'a> {
    pub name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub description: Option<&'a str>,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip_code: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub website: Option<&'a str>,
    pub hours: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<&'a str>,
}

pub async fn update_business(
    pool: &SqlitePool,
    id: i64,
    c: BusinessChanges<'_>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_BUSINESS)
        .bind(c.name)
        .bind(c.category)
        .bind(c.description)
        .bind(c.address)
        .bind(c.city)
        .bind(c.state)
        .bind(c.zip_code)
        .bind(c.phone)
        .bind(c.email)
        .bind(c.website)
        .bind(c.hours)
        .bind(c.latitude)
        .bind(c.longitude)
        .bind(c.image_url)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn approve_business(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_APPROVE_BUSINESS)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_business(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_BUSINESS)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
