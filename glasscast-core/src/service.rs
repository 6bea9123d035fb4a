use crate::{
    Config,
    config::BackendId,
    model::{AuthResponse, FavoriteCity, SignUpOutcome, WeatherResponse},
    network::{NetworkError, NetworkService},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod auth;
pub mod database;
pub mod weather;

pub use auth::SupabaseAuthService;
pub use database::SupabaseDatabaseService;
pub use weather::WeatherApiService;

#[async_trait]
pub trait AuthService: Send + Sync + Debug {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, NetworkError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, NetworkError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), NetworkError>;
}

#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherResponse, NetworkError>;

    /// Current conditions plus `days` of daily forecast.
    async fn forecast(&self, city: &str, days: u8) -> Result<WeatherResponse, NetworkError>;
}

#[async_trait]
pub trait DatabaseService: Send + Sync + Debug {
    async fn save_favorite_city(
        &self,
        city: &FavoriteCity,
        token: &str,
    ) -> Result<(), NetworkError>;

    async fn favorite_cities(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<Vec<FavoriteCity>, NetworkError>;

    async fn delete_favorite_city(&self, id: i64, token: &str) -> Result<(), NetworkError>;
}

/// Weather adapter for the configured API key.
pub fn weather_service_from_config(config: &Config) -> anyhow::Result<WeatherApiService> {
    let api_key = config.weather_api_key().ok_or_else(|| missing_backend(BackendId::WeatherApi))?;
    let network = NetworkService::new(config.weather_endpoint());

    Ok(WeatherApiService::new(network, api_key))
}

/// Pipeline bound to the configured Supabase project; shared by auth and favorites.
pub fn supabase_network_from_config(config: &Config) -> anyhow::Result<NetworkService> {
    let endpoint = config.supabase_endpoint().ok_or_else(|| missing_backend(BackendId::Supabase))?;
    Ok(NetworkService::new(endpoint))
}

fn missing_backend(id: BackendId) -> anyhow::Error {
    anyhow::anyhow!(
        "No credentials configured for backend '{id}'.\n\
         Hint: run `glasscast configure {id}` and enter them."
    )
}
