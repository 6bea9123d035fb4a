use tokio::sync::watch;

use crate::{
    model::{FavoriteCity, WeatherResponse},
    service::{DatabaseService, WeatherService},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeState {
    pub weather: Option<WeatherResponse>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub favorites: Vec<FavoriteCity>,
    /// Set after a successful save, for the confirmation message.
    pub last_saved_city: Option<String>,
}

impl HomeState {
    /// Case-insensitive name match of the loaded city against the favorites.
    pub fn is_current_city_favorited(&self) -> bool {
        let Some(weather) = &self.weather else {
            return false;
        };

        self.favorites.iter().any(|fav| fav.matches_city(&weather.location.name))
    }
}

/// Weather and favorites for the home screen.
#[derive(Debug)]
pub struct HomeStore<W, D> {
    weather_service: W,
    database: D,
    state: watch::Sender<HomeState>,
}

impl<W: WeatherService, D: DatabaseService> HomeStore<W, D> {
    pub fn new(weather_service: W, database: D) -> Self {
        let (state, _) = watch::channel(HomeState::default());
        Self { weather_service, database, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<HomeState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> HomeState {
        self.state.borrow().clone()
    }

    pub fn is_current_city_favorited(&self) -> bool {
        self.state.borrow().is_current_city_favorited()
    }

    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|state| state.error_message.take().is_some());
    }

    /// Drops everything loaded for the previous session.
    pub fn reset(&self) {
        self.state.send_replace(HomeState::default());
    }

    /// Replaces the loaded weather; on failure the previous weather stays.
    pub async fn load_weather(&self, city: &str) {
        self.begin_loading();
        let result = self.weather_service.current_weather(city).await;
        self.finish_weather(city, result);
    }

    pub async fn load_forecast(&self, city: &str, days: u8) {
        self.begin_loading();
        let result = self.weather_service.forecast(city, days).await;
        self.finish_weather(city, result);
    }

    /// Saves the loaded city. Does nothing when no weather is loaded.
    pub async fn save_to_favorites(&self, user_id: &str, token: &str) {
        let favorite = {
            let state = self.state.borrow();
            let Some(weather) = &state.weather else {
                return;
            };
            let location = &weather.location;
            FavoriteCity::new(user_id, location.name.as_str(), location.lat, location.lon)
        };

        match self.database.save_favorite_city(&favorite, token).await {
            Ok(()) => {
                tracing::info!(city = %favorite.city_name, "saved favorite");
                self.state.send_modify(|state| state.last_saved_city = Some(favorite.city_name));
                self.refresh_after_save(user_id, token).await;
            }
            Err(err) => {
                self.state.send_modify(|state| {
                    state.error_message = Some(format!("Failed to save favorite: {err}"));
                });
            }
        }
    }

    /// Replaces the favorites list; on failure the current list is kept.
    pub async fn fetch_favorites(&self, user_id: &str, token: &str) {
        match self.database.favorite_cities(user_id, token).await {
            Ok(favorites) => self.state.send_modify(|state| state.favorites = favorites),
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch favorites");
                self.state.send_modify(|state| {
                    state.error_message = Some(format!("Failed to load favorites: {err}"));
                });
            }
        }
    }

    pub async fn remove_favorite(&self, id: i64, user_id: &str, token: &str) {
        match self.database.delete_favorite_city(id, token).await {
            Ok(()) => {
                self.state.send_modify(|state| state.favorites.retain(|fav| fav.id != Some(id)));
                self.fetch_favorites(user_id, token).await;
            }
            Err(err) => {
                self.state.send_modify(|state| {
                    state.error_message = Some(format!("Failed to remove favorite: {err}"));
                });
            }
        }
    }

    /// The save already succeeded, so a failed refresh is only logged.
    async fn refresh_after_save(&self, user_id: &str, token: &str) {
        match self.database.favorite_cities(user_id, token).await {
            Ok(favorites) => self.state.send_modify(|state| state.favorites = favorites),
            Err(err) => tracing::warn!(error = %err, "failed to refresh favorites after save"),
        }
    }

    fn begin_loading(&self) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error_message = None;
        });
    }

    fn finish_weather(&self, city: &str, result: Result<WeatherResponse, crate::NetworkError>) {
        self.state.send_modify(|state| {
            match result {
                Ok(weather) => state.weather = Some(weather),
                Err(err) => {
                    tracing::warn!(error = %err, city, "failed to load weather");
                    state.error_message = Some(err.to_string());
                }
            }
            state.is_loading = false;
        });
    }
}
