use serde::{Deserialize, Serialize};

pub const DEFAULT_DESTINATION: &str = "Paris";
pub const DEFAULT_DAYS: u32 = 7;
pub const DEFAULT_BUDGET: &str = "$5000";
pub const DEFAULT_FAMILY_SIZE: u32 = 2;

/// Coarse classification of a user message. Getaway outranks itinerary when
/// a message matches both keyword sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Getaway,
    Itinerary,
    Unknown,
}

/// Normalized trip request. Constructed once per request from model output
/// (or direct API fields) and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripParameters {
    pub destination: Vec<String>,
    pub number_of_days: u32,
    pub budget: String,
    pub family_size: u32,
    pub preferred_activities: Option<Vec<String>>,
    pub ages: Option<Vec<u32>>,
    pub travel_dates: Option<String>,
    pub climate_preferences: Option<String>,
    pub geography_scenery: Option<String>,
}

impl TripParameters {
    /// The fixed fallback record used whenever extraction fails. A travel
    /// bot must always produce something.
    pub fn default_record() -> Self {
        Self {
            destination: vec![DEFAULT_DESTINATION.to_string()],
            number_of_days: DEFAULT_DAYS,
            budget: DEFAULT_BUDGET.to_string(),
            family_size: DEFAULT_FAMILY_SIZE,
            preferred_activities: None,
            ages: None,
            travel_dates: None,
            climate_preferences: None,
            geography_scenery: None,
        }
    }
}

/// A scalar-or-list field as the model may return it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Raw extraction output before normalization. Every field is nullable and
/// numbers may arrive as floats ("10.0") so parsing stays permissive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTripParameters {
    #[serde(default)]
    pub destination: Option<OneOrMany<Option<String>>>,
    #[serde(default)]
    pub number_of_days: Option<f64>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub preferred_activities: Option<OneOrMany<Option<String>>>,
    #[serde(default)]
    pub family_size: Option<f64>,
    #[serde(default)]
    pub ages: Option<Vec<u32>>,
    #[serde(default)]
    pub travel_dates: Option<String>,
    #[serde(default)]
    pub climate_preferences: Option<String>,
    #[serde(default)]
    pub geography_scenery: Option<String>,
}

impl RawTripParameters {
    /// Applies the normalization rules unconditionally:
    /// scalar destinations become single-element lists, null/empty entries
    /// are dropped, an empty destination list falls back to the configured
    /// default, and missing counts/budget get their defaults. Positive
    /// integer invariants hold on every path.
    pub fn normalize(self) -> TripParameters {
        let mut destinations: Vec<String> = self
            .destination
            .map(|d| d.into_vec())
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        if destinations.is_empty() {
            destinations.push(DEFAULT_DESTINATION.to_string());
        }

        let activities: Vec<String> = self
            .preferred_activities
            .map(|a| a.into_vec())
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        let ages: Vec<u32> = self
            .ages
            .unwrap_or_default()
            .into_iter()
            .filter(|a| *a > 0)
            .collect();

        TripParameters {
            destination: destinations,
            number_of_days: positive_count(self.number_of_days, DEFAULT_DAYS),
            budget: self.budget.unwrap_or_else(|| DEFAULT_BUDGET.to_string()),
            family_size: positive_count(self.family_size, DEFAULT_FAMILY_SIZE),
            preferred_activities: if activities.is_empty() {
                None
            } else {
                Some(activities)
            },
            ages: if ages.is_empty() { None } else { Some(ages) },
            travel_dates: none_if_blank(self.travel_dates),
            climate_preferences: none_if_blank(self.climate_preferences),
            geography_scenery: none_if_blank(self.geography_scenery),
        }
    }
}

fn positive_count(value: Option<f64>, default: u32) -> u32 {
    match value {
        Some(v) if v >= 1.0 && v.is_finite() => v as u32,
        _ => default,
    }
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
