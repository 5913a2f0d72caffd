use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{EstimatorError, Result};

/// How the travelers reach the temple.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TravelMode {
    #[default]
    Flight,
    Train,
    Car,
    /// Any value outside the known modes, kept verbatim for the prompt
    Other(String),
}

impl From<String> for TravelMode {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "flight" => TravelMode::Flight,
            "train" => TravelMode::Train,
            "car" => TravelMode::Car,
            _ => TravelMode::Other(value),
        }
    }
}

impl From<&str> for TravelMode {
    fn from(value: &str) -> Self {
        TravelMode::from(value.to_string())
    }
}

impl From<TravelMode> for String {
    fn from(mode: TravelMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TravelMode::Flight => f.write_str("flight"),
            TravelMode::Train => f.write_str("train"),
            TravelMode::Car => f.write_str("car"),
            TravelMode::Other(raw) if raw.trim().is_empty() => f.write_str("unspecified"),
            TravelMode::Other(raw) => f.write_str(raw),
        }
    }
}

/// Spending tier the traveler is aiming for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BudgetLevel {
    Budget,
    #[default]
    Medium,
    Luxury,
    /// Any value outside the known tiers, kept verbatim for the prompt
    Other(String),
}

impl From<String> for BudgetLevel {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "budget" => BudgetLevel::Budget,
            "medium" | "" => BudgetLevel::Medium,
            "luxury" => BudgetLevel::Luxury,
            _ => BudgetLevel::Other(value),
        }
    }
}

impl From<&str> for BudgetLevel {
    fn from(value: &str) -> Self {
        BudgetLevel::from(value.to_string())
    }
}

impl From<BudgetLevel> for String {
    fn from(level: BudgetLevel) -> Self {
        level.to_string()
    }
}

impl fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetLevel::Budget => f.write_str("budget"),
            BudgetLevel::Medium => f.write_str("medium"),
            BudgetLevel::Luxury => f.write_str("luxury"),
            BudgetLevel::Other(raw) => f.write_str(raw),
        }
    }
}

/// A single trip to estimate.
///
/// Deserialization is lenient: counts may arrive as numbers or strings and
/// anything unusable collapses to `1`, while the field names of the mobile
/// form (`from`, `toTemple`, `duration`, `travelers`) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    /// Starting city or location
    #[serde(default, alias = "from")]
    pub origin: String,
    /// Temple or town being visited
    #[serde(default, alias = "toTemple")]
    pub destination: String,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub travel_mode: TravelMode,
    /// Length of the stay in days, at least 1
    #[serde(
        default = "default_count",
        alias = "duration",
        deserialize_with = "deserialize_count"
    )]
    pub duration_days: u32,
    /// Free-form travel date as entered by the user
    #[serde(default)]
    pub travel_date: String,
    /// Number of people travelling, at least 1
    #[serde(
        default = "default_count",
        alias = "travelers",
        deserialize_with = "deserialize_count"
    )]
    pub traveler_count: u32,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub budget_level: BudgetLevel,
}

impl TripRequest {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            travel_mode: TravelMode::default(),
            duration_days: 1,
            travel_date: String::new(),
            traveler_count: 1,
            budget_level: BudgetLevel::default(),
        }
    }

    pub fn with_travel_mode(mut self, mode: impl Into<TravelMode>) -> Self {
        self.travel_mode = mode.into();
        self
    }

    /// Zero is treated like a missing value and becomes 1.
    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = days.max(1);
        self
    }

    pub fn with_travel_date(mut self, date: impl Into<String>) -> Self {
        self.travel_date = date.into();
        self
    }

    /// Zero is treated like a missing value and becomes 1.
    pub fn with_traveler_count(mut self, travelers: u32) -> Self {
        self.traveler_count = travelers.max(1);
        self
    }

    pub fn with_budget_level(mut self, level: impl Into<BudgetLevel>) -> Self {
        self.budget_level = level.into();
        self
    }

    /// Effective traveler count, never below 1.
    pub fn travelers(&self) -> u32 {
        self.traveler_count.max(1)
    }

    /// Effective duration in days, never below 1.
    pub fn days(&self) -> u32 {
        self.duration_days.max(1)
    }

    /// Checks the fields a trip plan cannot be made without.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.origin.trim().is_empty() {
            missing.push("origin");
        }
        if self.destination.trim().is_empty() {
            missing.push("destination");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(EstimatorError::Validation(format!(
                "missing required trip fields: {}",
                missing.join(", ")
            )))
        }
    }
}

fn default_count() -> u32 {
    1
}

fn deserialize_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(parse_count).unwrap_or(1))
}

/// Null behaves like a missing key; numbers and booleans are kept as text so
/// they land in the `Other` variant.
fn deserialize_lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + From<String>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => T::default(),
        Some(Value::String(text)) => T::from(text),
        Some(other) => T::from(other.to_string()),
    })
}

/// Reads a positive count out of loosely typed input.
///
/// Strings are read by their leading digits (`"3 days"` is 3), fractional
/// numbers are truncated, and anything that ends up below 1 becomes 1.
pub fn parse_count(value: &Value) -> u32 {
    let parsed = match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n >= 1.0).map(|n| n as u64)),
        Value::String(text) => {
            let trimmed = text.trim_start();
            let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u64>().ok()
        }
        _ => None,
    };

    parsed
        .filter(|count| *count >= 1)
        .map(|count| u32::try_from(count).unwrap_or(u32::MAX))
        .unwrap_or(1)
}
