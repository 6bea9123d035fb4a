//! Observable state holders driving the front-end.
//!
//! Each store owns its state in a `tokio::sync::watch` channel: mutations go
//! through `send_modify`, readers take a `snapshot()` or `subscribe()`.

pub mod auth;
pub mod home;

pub use auth::{AuthMode, AuthState, AuthStore, VERIFY_EMAIL_NOTICE};
pub use home::{HomeState, HomeStore};
