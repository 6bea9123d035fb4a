//! Core library for the `glasscast` weather client.
//!
//! This crate defines:
//! - A typed HTTP request pipeline with a classified error taxonomy
//! - Adapters for weatherapi.com and a Supabase auth/REST backend
//! - Configuration, credentials and user preference handling
//! - Observable state holders for the front-end
//!
//! It is used by `glasscast-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod model;
pub mod network;
pub mod service;
pub mod settings;
pub mod state;

pub use config::{BackendId, Config, SupabaseConfig, WeatherApiConfig};
pub use model::{AuthResponse, FavoriteCity, SignUpOutcome, TemperatureUnit, WeatherResponse};
pub use network::{ApiRequest, EndpointConfig, HttpMethod, NetworkError, NetworkService, Transport};
pub use service::{AuthService, DatabaseService, WeatherService};
pub use settings::{SettingsStore, UserSettings};
pub use state::{AuthMode, AuthStore, HomeStore};
