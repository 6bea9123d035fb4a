//! Human-friendly rendering of weather and favorites.

use std::fmt::Write;

use glasscast_core::{FavoriteCity, TemperatureUnit, WeatherResponse};

pub fn render_weather(weather: &WeatherResponse, unit: TemperatureUnit) -> String {
    let mut out = String::new();
    let location = &weather.location;
    let current = &weather.current;
    let symbol = unit.symbol();

    let _ = writeln!(out, "{}, {} ({})", location.name, location.country, location.localtime);
    let _ = writeln!(
        out,
        "  {:.0}{symbol}  {}  (feels like {:.0}{symbol})",
        current.temperature(unit),
        current.condition.text,
        current.feels_like(unit),
    );
    let _ = writeln!(
        out,
        "  Humidity {}%  Wind {:.0} km/h {}  UV {:.0}",
        current.humidity, current.wind_kph, current.wind_dir, current.uv
    );

    if let Some(forecast) = &weather.forecast {
        for day in &forecast.forecastday {
            let label = day.weekday().unwrap_or_else(|| day.date.clone());
            let _ = writeln!(
                out,
                "  {label:<4} {:>4.0}{symbol} / {:>4.0}{symbol}  {}  rain {}%",
                day.day.max_temperature(unit),
                day.day.min_temperature(unit),
                day.day.condition.text,
                day.day.daily_chance_of_rain,
            );
        }
    }

    out
}

pub fn render_favorites(favorites: &[FavoriteCity]) -> String {
    if favorites.is_empty() {
        return "No favorite cities yet.\n".to_string();
    }

    let mut out = String::new();
    for fav in favorites {
        let _ = writeln!(out, "  {} ({:.2}, {:.2})", fav.city_name, fav.lat, fav.lon);
    }
    out
}
