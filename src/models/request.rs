use serde::Deserialize;

use super::trip::{OneOrMany, RawTripParameters};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

/// Body of the direct `/api/itinerary` and `/api/getaway` endpoints: either
/// a free-text message (re-enters the extractor) or explicit fields.
#[derive(Debug, Default, Deserialize)]
pub struct TripRequest {
    pub message: Option<String>,
    pub destination: Option<OneOrMany<Option<String>>>,
    pub days: Option<f64>,
    pub budget: Option<String>,
    pub family_size: Option<f64>,
    pub activities: Option<Vec<String>>,
    pub ages: Option<Vec<u32>>,
    pub dates: Option<String>,
    pub climate: Option<String>,
    pub scenery: Option<String>,
}

impl TripRequest {
    pub fn has_explicit_fields(&self) -> bool {
        self.destination.is_some()
            || self.days.is_some()
            || self.budget.is_some()
            || self.family_size.is_some()
            || self.activities.is_some()
            || self.ages.is_some()
            || self.dates.is_some()
            || self.climate.is_some()
            || self.scenery.is_some()
    }

    /// Maps the explicit fields onto the extraction record shape so both
    /// entry paths share one normalization.
    pub fn to_raw(&self) -> RawTripParameters {
        RawTripParameters {
            destination: self.destination.clone(),
            number_of_days: self.days,
            budget: self.budget.clone(),
            preferred_activities: self
                .activities
                .clone()
                .map(|a| OneOrMany::Many(a.into_iter().map(Some).collect())),
            family_size: self.family_size,
            ages: self.ages.clone(),
            travel_dates: self.dates.clone(),
            climate_preferences: self.climate.clone(),
            geography_scenery: self.scenery.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_fields_normalize_like_extraction_output() {
        let req: TripRequest = serde_json::from_str(
            r#"{"destination": "Bali", "days": 4, "family_size": 2, "activities": ["diving"]}"#,
        )
        .unwrap();
        assert!(req.has_explicit_fields());
        let params = req.to_raw().normalize();
        assert_eq!(params.destination, vec!["Bali"]);
        assert_eq!(params.number_of_days, 4);
        assert_eq!(params.preferred_activities, Some(vec!["diving".to_string()]));
    }

    #[test]
    fn message_only_request_has_no_explicit_fields() {
        let req: TripRequest =
            serde_json::from_str(r#"{"message": "plan me something"}"#).unwrap();
        assert!(!req.has_explicit_fields());
    }
}
