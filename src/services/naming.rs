use chrono::Utc;

use crate::models::trip::{Intent, TripParameters};

const DESCRIPTOR_CAP: usize = 30;

/// Builds the download filename for a finished document, stamped with the
/// current UTC time.
pub fn generate_filename(params: &TripParameters, intent: Intent) -> String {
    filename_with_timestamp(params, intent, &Utc::now().format("%Y%m%d-%H%M%S").to_string())
}

/// Timestamp-injected core so tests stay deterministic.
pub(crate) fn filename_with_timestamp(
    params: &TripParameters,
    intent: Intent,
    timestamp: &str,
) -> String {
    match intent {
        Intent::Getaway => format!(
            "getaway-{}day-{}ppl-{}-{}.pdf",
            params.number_of_days,
            params.family_size,
            slugify(&getaway_descriptor(params)),
            timestamp,
        ),
        _ => format!(
            "itinerary-{}-{}.pdf",
            slugify(&params.destination.join("-")),
            timestamp,
        ),
    }
}

/// Picks the most specific trait the caller gave us: activities, then
/// climate, then scenery, then a generic tag.
fn getaway_descriptor(params: &TripParameters) -> String {
    if let Some(activities) = &params.preferred_activities {
        let head: Vec<&str> = activities.iter().take(2).map(String::as_str).collect();
        if !head.is_empty() {
            return head.join("-");
        }
    }
    if let Some(climate) = &params.climate_preferences {
        return climate.clone();
    }
    if let Some(scenery) = &params.geography_scenery {
        return scenery.clone();
    }
    "luxury".to_string()
}

/// Keeps alphanumerics, dots and hyphens; whitespace runs collapse to a
/// single hyphen; everything else is dropped. Capped so generated names
/// stay filesystem-friendly.
fn slugify(raw: &str) -> String {
    let mut out = String::new();
    let mut pending_sep = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            pending_sep = !out.is_empty();
        } else if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
            if pending_sep {
                out.push('-');
                pending_sep = false;
            }
            out.push(ch);
        }
    }
    out.truncate(DESCRIPTOR_CAP);
    if out.is_empty() {
        out.push_str("travel");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "20260823-120000";

    #[test]
    fn getaway_filename_uses_activities_first() {
        let params = TripParameters {
            preferred_activities: Some(vec![
                "skiing".to_string(),
                "spa days".to_string(),
                "hiking".to_string(),
            ]),
            climate_preferences: Some("cold".to_string()),
            ..TripParameters::default_record()
        };
        assert_eq!(
            filename_with_timestamp(&params, Intent::Getaway, TS),
            "getaway-7day-2ppl-skiing-spa-days-20260823-120000.pdf"
        );
    }

    #[test]
    fn getaway_filename_falls_back_through_climate_to_generic() {
        let climate_only = TripParameters {
            climate_preferences: Some("tropical".to_string()),
            ..TripParameters::default_record()
        };
        assert_eq!(
            filename_with_timestamp(&climate_only, Intent::Getaway, TS),
            "getaway-7day-2ppl-tropical-20260823-120000.pdf"
        );

        let bare = TripParameters::default_record();
        assert_eq!(
            filename_with_timestamp(&bare, Intent::Getaway, TS),
            "getaway-7day-2ppl-luxury-20260823-120000.pdf"
        );
    }

    #[test]
    fn itinerary_filename_joins_destinations() {
        let params = TripParameters {
            destination: vec!["New York".to_string(), "Boston".to_string()],
            ..TripParameters::default_record()
        };
        assert_eq!(
            filename_with_timestamp(&params, Intent::Itinerary, TS),
            "itinerary-New-York-Boston-20260823-120000.pdf"
        );
    }

    #[test]
    fn descriptor_is_capped_and_sanitized() {
        let params = TripParameters {
            destination: vec!["São Paulo / Rio de Janeiro & the entire coast".to_string()],
            ..TripParameters::default_record()
        };
        let name = filename_with_timestamp(&params, Intent::Itinerary, TS);
        let middle = name
            .strip_prefix("itinerary-")
            .and_then(|s| s.strip_suffix("-20260823-120000.pdf"))
            .unwrap();
        assert!(middle.len() <= 30, "descriptor too long: {}", middle);
        assert!(middle.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-'));
    }

    #[test]
    fn empty_descriptor_gets_a_placeholder() {
        let params = TripParameters {
            destination: vec!["!!!".to_string()],
            ..TripParameters::default_record()
        };
        assert_eq!(
            filename_with_timestamp(&params, Intent::Itinerary, TS),
            "itinerary-travel-20260823-120000.pdf"
        );
    }
}
