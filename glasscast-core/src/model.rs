//! Wire models exchanged with the weather API and the Supabase backend.

pub mod auth;
pub mod favorite;
pub mod weather;

pub use auth::{AuthRequest, AuthResponse, SignUpOutcome, User};
pub use favorite::FavoriteCity;
pub use weather::{
    Condition, Current, Day, Forecast, ForecastDay, Location, TemperatureUnit, WeatherResponse,
};
