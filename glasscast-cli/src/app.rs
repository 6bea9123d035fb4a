//! Interactive session: sign in, then a menu over the home screen actions.

use std::fmt;

use anyhow::{Context, Result};
use glasscast_core::{
    AuthMode, AuthStore, Config, HomeStore, SettingsStore,
    service::{
        SupabaseAuthService, SupabaseDatabaseService, WeatherApiService,
        supabase_network_from_config, weather_service_from_config,
    },
};
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};

use crate::output;

const DEFAULT_CITY: &str = "Paris";

type Home = HomeStore<WeatherApiService, SupabaseDatabaseService>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Search,
    Forecast,
    SaveCity,
    ListFavorites,
    RemoveFavorite,
    ToggleUnit,
    SignOut,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 8] = [
        MenuItem::Search,
        MenuItem::Forecast,
        MenuItem::SaveCity,
        MenuItem::ListFavorites,
        MenuItem::RemoveFavorite,
        MenuItem::ToggleUnit,
        MenuItem::SignOut,
        MenuItem::Quit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuItem::Search => "Search city",
            MenuItem::Forecast => "3-day forecast",
            MenuItem::SaveCity => "Save current city to favorites",
            MenuItem::ListFavorites => "List favorites",
            MenuItem::RemoveFavorite => "Remove a favorite",
            MenuItem::ToggleUnit => "Toggle °C / °F",
            MenuItem::SignOut => "Sign out",
            MenuItem::Quit => "Quit",
        };
        f.write_str(label)
    }
}

pub async fn run() -> Result<()> {
    let config = Config::load()?;
    let settings = SettingsStore::load()?;
    let supabase = supabase_network_from_config(&config)?;
    let weather = weather_service_from_config(&config)?;
    tracing::debug!(supabase = supabase.config().base_url(), "starting interactive session");

    let auth = AuthStore::new(SupabaseAuthService::new(supabase.clone()));
    let home = HomeStore::new(weather, SupabaseDatabaseService::new(supabase));

    loop {
        if !authenticate(&auth).await? {
            return Ok(());
        }

        let state = auth.snapshot();
        let Some((user_id, token)) = state.credentials() else {
            anyhow::bail!("Signed in without a user id in the session");
        };

        let signed_out = home_loop(&home, &settings, user_id, token).await?;
        if !signed_out {
            return Ok(());
        }

        auth.sign_out().await;
        home.reset();
        if let Some(message) = auth.snapshot().error_message {
            println!("Signed out locally. ({message})");
        } else {
            println!("Signed out.");
        }
    }
}

/// Prompts until a session exists; `false` when the user gives up.
async fn authenticate(auth: &AuthStore<SupabaseAuthService>) -> Result<bool> {
    while !auth.is_authenticated() {
        let mode = Select::new("Welcome to Glasscast", vec!["Sign in", "Create account", "Quit"])
            .prompt()
            .context("Failed to read menu choice")?;

        let mode = match mode {
            "Sign in" => AuthMode::SignIn,
            "Create account" => AuthMode::SignUp,
            _ => return Ok(false),
        };

        let email = Text::new("Email:").prompt().context("Failed to read email")?;
        let mut password =
            Password::new("Password:").with_display_mode(PasswordDisplayMode::Masked);
        if mode == AuthMode::SignIn {
            password = password.without_confirmation();
        }
        let password = password.prompt().context("Failed to read password")?;

        auth.submit(mode, email.trim(), &password).await;

        let state = auth.snapshot();
        if let Some(notice) = state.notice {
            println!("{notice}");
        }
        if let Some(error) = state.error_message {
            println!("Error: {error}");
        }
    }

    Ok(true)
}

/// Runs the menu; `true` when the user chose to sign out.
async fn home_loop(
    home: &Home,
    settings: &SettingsStore,
    user_id: &str,
    token: &str,
) -> Result<bool> {
    home.load_weather(DEFAULT_CITY).await;
    home.fetch_favorites(user_id, token).await;
    show_current(home, settings);

    loop {
        let choice = Select::new("What next?", MenuItem::ALL.to_vec())
            .prompt()
            .context("Failed to read menu choice")?;

        match choice {
            MenuItem::Search => {
                let city = Text::new("City:").prompt().context("Failed to read city")?;
                home.load_weather(city.trim()).await;
                show_current(home, settings);
            }
            MenuItem::Forecast => {
                let Some(city) = home.snapshot().weather.map(|w| w.location.name) else {
                    println!("Search for a city first.");
                    continue;
                };
                home.load_forecast(&city, 3).await;
                show_current(home, settings);
            }
            MenuItem::SaveCity => {
                home.save_to_favorites(user_id, token).await;
                let state = home.snapshot();
                match (state.error_message, state.last_saved_city) {
                    (Some(error), _) => println!("{error}"),
                    (None, Some(city)) => println!("{city} has been added to your favorites."),
                    (None, None) => println!("Search for a city first."),
                }
                home.dismiss_error();
            }
            MenuItem::ListFavorites => {
                home.fetch_favorites(user_id, token).await;
                let state = home.snapshot();
                if let Some(error) = state.error_message {
                    println!("{error}");
                    home.dismiss_error();
                }
                print!("{}", output::render_favorites(&state.favorites));
            }
            MenuItem::RemoveFavorite => remove_favorite(home, user_id, token).await?,
            MenuItem::ToggleUnit => {
                let unit = settings.temperature_unit().toggled();
                settings.set_temperature_unit(unit)?;
                println!("Temperatures now shown in {}", unit.symbol());
                show_current(home, settings);
            }
            MenuItem::SignOut => {
                let confirmed = Confirm::new("Sign out?")
                    .with_default(true)
                    .prompt()
                    .context("Failed to read confirmation")?;
                if confirmed {
                    return Ok(true);
                }
            }
            MenuItem::Quit => return Ok(false),
        }
    }
}

async fn remove_favorite(home: &Home, user_id: &str, token: &str) -> Result<()> {
    let favorites = home.snapshot().favorites;
    let options: Vec<String> = favorites.iter().map(|fav| fav.city_name.clone()).collect();
    if options.is_empty() {
        println!("No favorite cities yet.");
        return Ok(());
    }

    let Some(index) = Select::new("Remove which city?", options)
        .raw_prompt_skippable()
        .context("Failed to read city choice")?
        .map(|choice| choice.index)
    else {
        return Ok(());
    };

    let Some(id) = favorites[index].id else {
        println!("That favorite has not been saved yet.");
        return Ok(());
    };

    home.remove_favorite(id, user_id, token).await;
    if let Some(error) = home.snapshot().error_message {
        println!("{error}");
        home.dismiss_error();
    }
    Ok(())
}

fn show_current(home: &Home, settings: &SettingsStore) {
    let state = home.snapshot();

    if let Some(error) = &state.error_message {
        println!("Error: {error}");
        home.dismiss_error();
    }

    if let Some(weather) = &state.weather {
        print!("{}", output::render_weather(weather, settings.temperature_unit()));
        if state.is_current_city_favorited() {
            println!("  ★ in your favorites");
        }
    }
}
