//! Market rates, weather data and the advisor persona
//!
//! The datasets here stand in for a live mandi/weather feed; they are also
//! serialized into the system instruction so the model grounds its answers
//! in them.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::i18n::{Language, translations};

/// Price movement direction
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// One commodity quote
#[derive(Debug, Clone, Serialize)]
pub struct MarketRate {
    pub crop: &'static str,
    pub price: &'static str,
    pub trend: Trend,
    pub location: &'static str,
}

/// Weather alert category
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Rain,
    Heat,
    Wind,
}

/// Alert severity
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Active weather warning
#[derive(Debug, Clone, Serialize)]
pub struct WeatherAlert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: &'static str,
    pub severity: Severity,
}

/// Sky condition for a forecast day
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Sunny,
    Cloudy,
    PartlyCloudy,
    Rain,
    Storm,
}

/// One day of the forecast; `day_offset` 0 = today, 1 = tomorrow...
#[derive(Debug, Clone, Serialize)]
pub struct WeatherForecast {
    pub day_offset: u8,
    pub temp_max: i8,
    pub temp_min: i8,
    pub condition: Condition,
    pub humidity: u8,
    pub wind_speed: u8,
}

pub const MARKET_RATES: &[MarketRate] = &[
    MarketRate {
        crop: "Wheat (Gandum)",
        price: "PKR 4,200 / 40kg",
        trend: Trend::Up,
        location: "Lahore Mandi",
    },
    MarketRate {
        crop: "Cotton (Kapas)",
        price: "PKR 8,500 / 40kg",
        trend: Trend::Down,
        location: "Multan Mandi",
    },
    MarketRate {
        crop: "Rice (Basmati)",
        price: "PKR 3,800 / 40kg",
        trend: Trend::Stable,
        location: "Gujranwala",
    },
    MarketRate {
        crop: "Sugarcane",
        price: "PKR 450 / 40kg",
        trend: Trend::Up,
        location: "Rahim Yar Khan",
    },
];

pub const WEATHER_ALERTS: &[WeatherAlert] = &[
    WeatherAlert {
        kind: AlertKind::Rain,
        message: "Heavy rainfall expected in Punjab region over next 48 hours.",
        severity: Severity::High,
    },
    WeatherAlert {
        kind: AlertKind::Heat,
        message: "High temperature warning for Sindh belt. Irrigate crops at night.",
        severity: Severity::Medium,
    },
];

pub const WEATHER_FORECAST: &[WeatherForecast] = &[
    WeatherForecast {
        day_offset: 0,
        temp_max: 34,
        temp_min: 26,
        condition: Condition::Sunny,
        humidity: 45,
        wind_speed: 12,
    },
    WeatherForecast {
        day_offset: 1,
        temp_max: 32,
        temp_min: 25,
        condition: Condition::PartlyCloudy,
        humidity: 50,
        wind_speed: 15,
    },
    WeatherForecast {
        day_offset: 2,
        temp_max: 29,
        temp_min: 23,
        condition: Condition::Rain,
        humidity: 78,
        wind_speed: 18,
    },
    WeatherForecast {
        day_offset: 3,
        temp_max: 28,
        temp_min: 22,
        condition: Condition::Rain,
        humidity: 82,
        wind_speed: 14,
    },
    WeatherForecast {
        day_offset: 4,
        temp_max: 31,
        temp_min: 24,
        condition: Condition::Cloudy,
        humidity: 60,
        wind_speed: 10,
    },
];

/// System instruction for the advisor: persona rules plus the grounding
/// datasets serialized as JSON.
pub fn system_instruction() -> String {
    let market = serde_json::to_string(MARKET_RATES).unwrap_or_default();
    let alerts = serde_json::to_string(WEATHER_ALERTS).unwrap_or_default();

    format!(
        "\
You are Kissan Dost, a Master-Level Agriculture AI Advisor for farmers in Pakistan.
Your goal is to provide accurate, actionable, and low-literacy friendly advice.

Core Rules:
1. ALWAYS reply in the language the user is currently using or explicitly requested.
2. Be concise, encouraging, and respectful. Use \"Brother farmer\" (Kissan bhai) often.
3. Simplify scientific terms. Instead of \"Nitrogen deficiency\", say \"Lack of growth power (Urea needed)\".
4. Provide step-by-step instructions for remedies.
5. Include estimated costs in PKR if possible based on general knowledge.

Context Data (Use this to ground your answers):
{market}
{alerts}"
    )
}

/// Label for a forecast day relative to `base`: today, tomorrow, then the
/// short weekday name.
pub fn day_label_from(base: NaiveDate, offset: u8, lang: Language) -> String {
    let t = translations(lang);
    match offset {
        0 => t.today.to_string(),
        1 => t.tomorrow.to_string(),
        _ => {
            let date = base + Duration::days(offset as i64);
            date.weekday().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_embeds_context() {
        let instruction = system_instruction();
        assert!(instruction.contains("Kissan Dost"));
        assert!(instruction.contains("Lahore Mandi"));
        assert!(instruction.contains("\"trend\":\"up\""));
        assert!(instruction.contains("\"type\":\"rain\""));
        assert!(instruction.contains("\"severity\":\"high\""));
    }

    #[test]
    fn test_forecast_covers_five_days() {
        assert_eq!(WEATHER_FORECAST.len(), 5);
        for (i, day) in WEATHER_FORECAST.iter().enumerate() {
            assert_eq!(day.day_offset as usize, i);
            assert!(day.temp_max >= day.temp_min);
        }
    }

    #[test]
    fn test_day_labels() {
        let base = NaiveDate::from_ymd_opt(2024, 11, 4).unwrap(); // a Monday
        assert_eq!(day_label_from(base, 0, Language::English), "Today");
        assert_eq!(day_label_from(base, 1, Language::Urdu), "کل");
        assert_eq!(day_label_from(base, 2, Language::English), "Wed");
    }
}
