use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Unit used when presenting temperatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn from_fahrenheit_flag(is_fahrenheit: bool) -> Self {
        if is_fahrenheit { TemperatureUnit::Fahrenheit } else { TemperatureUnit::Celsius }
    }

    pub fn is_fahrenheit(&self) -> bool {
        matches!(self, TemperatureUnit::Fahrenheit)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

/// `current.json` / `forecast.json` payload from weatherapi.com.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub location: Location,
    pub current: Current,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Forecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub tz_id: String,
    pub localtime_epoch: i64,
    pub localtime: String,
}

impl Location {
    /// `localtime` is reported as `YYYY-MM-DD H:MM` in the location's zone.
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.localtime, "%Y-%m-%d %H:%M").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    pub last_updated_epoch: i64,
    pub last_updated: String,
    pub temp_c: f64,
    pub temp_f: f64,
    pub is_day: u8,
    pub condition: Condition,
    pub wind_mph: f64,
    pub wind_kph: f64,
    pub wind_degree: i32,
    pub wind_dir: String,
    pub pressure_mb: f64,
    pub pressure_in: f64,
    pub precip_mm: f64,
    pub precip_in: f64,
    pub humidity: i32,
    pub cloud: i32,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub windchill_c: Option<f64>,
    pub windchill_f: Option<f64>,
    pub heatindex_c: Option<f64>,
    pub heatindex_f: Option<f64>,
    pub dewpoint_c: Option<f64>,
    pub dewpoint_f: Option<f64>,
    pub vis_km: f64,
    pub vis_miles: f64,
    pub uv: f64,
    pub gust_mph: Option<f64>,
    pub gust_kph: Option<f64>,
}

impl Current {
    pub fn temperature(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.temp_c,
            TemperatureUnit::Fahrenheit => self.temp_f,
        }
    }

    pub fn feels_like(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.feelslike_c,
            TemperatureUnit::Fahrenheit => self.feelslike_f,
        }
    }

    pub fn is_daytime(&self) -> bool {
        self.is_day == 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub icon: String,
    pub code: i32,
}

impl Condition {
    /// Symbol name for the condition code; unknown codes fall back to partly cloudy.
    pub fn symbol_name(&self) -> &'static str {
        match self.code {
            1000 => "sun.max.fill",
            1003 => "cloud.sun.fill",
            1006 | 1009 => "cloud.fill",
            1030 | 1135 | 1147 => "cloud.fog.fill",
            1063 | 1180 | 1183 | 1186 | 1189 | 1192 | 1195 | 1240 | 1243 => "cloud.rain.fill",
            1066 | 1114 | 1210 | 1213 | 1216 | 1219 | 1222 | 1225 | 1255 | 1258 => {
                "cloud.snow.fill"
            }
            1069 | 1072 | 1168 | 1171 | 1204 | 1207 | 1237 | 1249 | 1252 | 1261 | 1264 => {
                "cloud.sleet.fill"
            }
            1087 | 1273 | 1276 | 1279 | 1282 => "cloud.bolt.rain.fill",
            _ => "cloud.sun.fill",
        }
    }

    /// Icon URLs come back protocol-relative (`//cdn.weatherapi.com/...`).
    pub fn icon_url(&self) -> String {
        if self.icon.starts_with("//") { format!("https:{}", self.icon) } else { self.icon.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub date_epoch: i64,
    pub day: Day,
}

impl ForecastDay {
    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Abbreviated weekday, e.g. `Mon`.
    pub fn weekday(&self) -> Option<String> {
        self.naive_date().map(|date| date.format("%a").to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
    pub avgtemp_c: f64,
    pub avgtemp_f: f64,
    pub maxwind_mph: f64,
    pub maxwind_kph: f64,
    pub totalprecip_mm: f64,
    pub totalprecip_in: f64,
    pub avgvis_km: f64,
    pub avgvis_miles: f64,
    pub avghumidity: f64,
    pub daily_will_it_rain: i32,
    pub daily_chance_of_rain: i32,
    pub daily_will_it_snow: i32,
    pub daily_chance_of_snow: i32,
    pub condition: Condition,
    pub uv: f64,
}

impl Day {
    pub fn max_temperature(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.maxtemp_c,
            TemperatureUnit::Fahrenheit => self.maxtemp_f,
        }
    }

    pub fn min_temperature(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.mintemp_c,
            TemperatureUnit::Fahrenheit => self.mintemp_f,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_current_without_forecast_or_optional_readings() {
        let parsed: WeatherResponse =
            serde_json::from_value(fixtures::current_weather_json("Paris")).unwrap();

        assert_eq!(parsed.location.name, "Paris");
        assert!(parsed.forecast.is_none());
        assert_eq!(parsed.current.windchill_c, None);
        assert_eq!(parsed.current.gust_kph, Some(23.5));
        assert!(!parsed.current.is_daytime());
        assert_eq!(parsed.current.condition.symbol_name(), "cloud.rain.fill");
    }

    #[test]
    fn temperatures_follow_unit() {
        let parsed: WeatherResponse =
            serde_json::from_value(fixtures::current_weather_json("Paris")).unwrap();

        assert_eq!(parsed.current.temperature(TemperatureUnit::Celsius), 11.0);
        assert_eq!(parsed.current.temperature(TemperatureUnit::Fahrenheit), 51.8);
        assert_eq!(parsed.current.feels_like(TemperatureUnit::Fahrenheit), 48.6);
    }

    #[test]
    fn forecast_day_weekday() {
        let day: ForecastDay =
            serde_json::from_value(fixtures::forecast_day_json("2023-11-13")).unwrap();

        assert_eq!(day.weekday().as_deref(), Some("Mon"));
        assert_eq!(day.day.max_temperature(TemperatureUnit::Celsius), 13.2);
        assert_eq!(day.day.min_temperature(TemperatureUnit::Fahrenheit), 46.6);
    }

    #[test]
    fn unknown_condition_code_falls_back() {
        let condition = Condition { text: "?".into(), icon: "//x/y.png".into(), code: 42 };
        assert_eq!(condition.symbol_name(), "cloud.sun.fill");
        assert_eq!(condition.icon_url(), "https://x/y.png");
    }

    #[test]
    fn local_time_parses() {
        let parsed: WeatherResponse =
            serde_json::from_value(fixtures::current_weather_json("Paris")).unwrap();
        let local = parsed.location.local_time().expect("valid local time");
        assert_eq!(local.format("%H:%M").to_string(), "23:13");
    }

    #[test]
    fn unit_parsing() {
        assert_eq!(TemperatureUnit::try_from("F").unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::try_from("celsius").unwrap(), TemperatureUnit::Celsius);
        assert!(TemperatureUnit::try_from("kelvin").is_err());
        assert_eq!(TemperatureUnit::Celsius.toggled(), TemperatureUnit::Fahrenheit);
    }
}
