use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BusinessRow {
    pub id: i64,
    pub owner_email: Option<String>,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub hours: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub approved: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// JSON shape of a listing. `hours` round-trips as an object (or null when
/// unknown); `distance_km` is only present when the search carried a
/// reference coordinate.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessView {
    pub id: i64,
    pub owner_email: Option<String>,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub hours: Option<Value>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub approved: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl From<BusinessRow> for BusinessView {
    fn from(row: BusinessRow) -> Self {
        let hours = row
            .hours
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok());
        BusinessView {
            id: row.id,
            owner_email: row.owner_email,
            name: row.name,
            category: row.category,
            description: row.description,
            address: row.address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            phone: row.phone,
            email: row.email,
            website: row.website,
            hours,
            latitude: row.latitude,
            longitude: row.longitude,
            image_url: row.image_url,
            approved: row.approved != 0,
            created_at: row.created_at,
            updated_at: row.updated_at,
            distance_km: None,
        }
    }
}

impl BusinessView {
    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = Some(distance_km);
        self
    }
}
