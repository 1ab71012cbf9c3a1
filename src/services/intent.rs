use crate::models::trip::Intent;

/// Getaway keywords outrank itinerary keywords: a getaway is the more
/// specific intent, so a message matching both sets routes to getaway.
const GETAWAY_KEYWORDS: [&str; 4] = ["getaway", "vacation", "escape", "weekend"];
const ITINERARY_KEYWORDS: [&str; 5] = ["itinerary", "plan", "trip", "schedule", "day-by-day"];

/// Pure keyword containment check against the lower-cased message. No model
/// call: small talk should not burn API spend.
pub fn route(message: &str) -> Intent {
    let message = message.to_lowercase();
    if GETAWAY_KEYWORDS.iter().any(|k| message.contains(k)) {
        Intent::Getaway
    } else if ITINERARY_KEYWORDS.iter().any(|k| message.contains(k)) {
        Intent::Itinerary
    } else {
        Intent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getaway_keywords_route_to_getaway() {
        assert_eq!(route("I need a weekend escape"), Intent::Getaway);
        assert_eq!(route("Suggest a VACATION somewhere warm"), Intent::Getaway);
    }

    #[test]
    fn itinerary_keywords_route_to_itinerary() {
        assert_eq!(route("Plan a trip to Rome"), Intent::Itinerary);
        assert_eq!(route("day-by-day schedule please"), Intent::Itinerary);
    }

    #[test]
    fn getaway_outranks_itinerary_when_both_match() {
        assert_eq!(route("plan a weekend getaway trip"), Intent::Getaway);
        assert_eq!(route("itinerary for my vacation"), Intent::Getaway);
    }

    #[test]
    fn smalltalk_routes_to_unknown() {
        assert_eq!(route("hello there"), Intent::Unknown);
        assert_eq!(route("what can you do?"), Intent::Unknown);
        assert_eq!(route(""), Intent::Unknown);
    }
}
