use serde::{Deserialize, Serialize};

/// Row of the `favourite_cities` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteCity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: String,
    pub city_name: String,
    #[serde(rename = "latitude")]
    pub lat: f64,
    #[serde(rename = "longitude")]
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl FavoriteCity {
    /// New, unsaved row; the database assigns `id` and `created_at`.
    pub fn new(
        user_id: impl Into<String>,
        city_name: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            city_name: city_name.into(),
            lat,
            lon,
            created_at: None,
        }
    }

    pub fn matches_city(&self, name: &str) -> bool {
        self.city_name.to_lowercase() == name.to_lowercase()
    }
}
