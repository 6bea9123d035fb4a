use async_trait::async_trait;
use serde::de::IgnoredAny;

use crate::{
    model::FavoriteCity,
    network::{ApiRequest, NetworkError, NetworkService},
};

use super::DatabaseService;

const FAVORITES_PATH: &str = "/rest/v1/favourite_cities";

/// PostgREST access to the `favourite_cities` table. Row-level security keys
/// off the user's bearer token, so every call carries it.
#[derive(Debug, Clone)]
pub struct SupabaseDatabaseService {
    network: NetworkService,
}

impl SupabaseDatabaseService {
    pub fn new(network: NetworkService) -> Self {
        Self { network }
    }
}

#[async_trait]
impl DatabaseService for SupabaseDatabaseService {
    async fn save_favorite_city(
        &self,
        city: &FavoriteCity,
        token: &str,
    ) -> Result<(), NetworkError> {
        let request = ApiRequest::post(FAVORITES_PATH)
            .bearer_auth(token)
            .header("Prefer", "return=representation")
            .json(city);

        let _: Vec<FavoriteCity> = self.network.request(request).await?;
        Ok(())
    }

    async fn favorite_cities(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<Vec<FavoriteCity>, NetworkError> {
        let request = ApiRequest::get(FAVORITES_PATH)
            .bearer_auth(token)
            .query("user_id", format!("eq.{user_id}"))
            .query("select", "*");

        self.network.request(request).await
    }

    async fn delete_favorite_city(&self, id: i64, token: &str) -> Result<(), NetworkError> {
        let request = ApiRequest::delete(FAVORITES_PATH)
            .bearer_auth(token)
            .query("id", format!("eq.{id}"));

        let _: IgnoredAny = self.network.request(request).await?;
        Ok(())
    }
}
