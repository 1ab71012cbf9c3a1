use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, error};

use crate::catalog::{Catalog, BRAND_NAME};
use crate::models::trip::{Intent, TripParameters};
use crate::services::openai::{OpenAiClient, OpenAiError};

const ITINERARY_MAX_TOKENS: u32 = 3000;
const GETAWAY_MAX_TOKENS: u32 = 2500;
const GENERATION_TEMPERATURE: f32 = 0.7;
const GENERATION_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug)]
pub enum GenerationError {
    OpenAi(OpenAiError),
    UnroutableIntent,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::OpenAi(err) => write!(f, "generation call failed: {}", err),
            GenerationError::UnroutableIntent => {
                write!(f, "cannot generate content for an unknown intent")
            }
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<OpenAiError> for GenerationError {
    fn from(err: OpenAiError) -> Self {
        GenerationError::OpenAi(err)
    }
}

/// Builds the per-intent prompt and returns the raw generated text. Unlike
/// extraction there is no safe fallback content, so failures surface to the
/// caller. Responses are memoized best-effort per intent and destination;
/// entries are never invalidated.
pub struct ContentGenerator {
    openai: OpenAiClient,
    catalog: Arc<Catalog>,
    cache: Mutex<HashMap<String, String>>,
}

impl ContentGenerator {
    pub fn new(openai: OpenAiClient, catalog: Arc<Catalog>) -> Self {
        Self {
            openai,
            catalog,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn generate(
        &self,
        params: &TripParameters,
        intent: Intent,
    ) -> Result<String, GenerationError> {
        let key = cache_key(params, intent);
        if let Some(hit) = self
            .cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(&key).cloned())
        {
            debug!("Generation cache hit for '{}'", key);
            return Ok(hit);
        }

        let (prompt, max_tokens) = match intent {
            Intent::Itinerary => (build_itinerary_prompt(params), ITINERARY_MAX_TOKENS),
            Intent::Getaway => (
                build_getaway_prompt(params, &self.catalog),
                GETAWAY_MAX_TOKENS,
            ),
            Intent::Unknown => return Err(GenerationError::UnroutableIntent),
        };

        let text = self
            .openai
            .complete(&prompt, max_tokens, GENERATION_TEMPERATURE, GENERATION_TIMEOUT)
            .await
            .map_err(|e| {
                error!("Content generation failed: {}", e);
                e
            })?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, text.clone());
        }
        Ok(text)
    }
}

fn cache_key(params: &TripParameters, intent: Intent) -> String {
    let destinations = params
        .destination
        .iter()
        .map(|d| d.to_lowercase())
        .collect::<Vec<_>>()
        .join(",");
    format!("{:?}:{}:{}", intent, params.number_of_days, destinations)
}

pub(crate) fn build_itinerary_prompt(params: &TripParameters) -> String {
    let mut prompt = format!(
        "Create detailed luxury itinerary for {}:\n\n\
         Destination: {}\n\
         Days: {}\n\
         Budget: {}\n\
         Travelers: {}\n",
        BRAND_NAME,
        params.destination.join(", "),
        params.number_of_days,
        params.budget,
        params.family_size,
    );

    // Omit a line entirely rather than emit "Activities: null".
    if let Some(activities) = &params.preferred_activities {
        prompt.push_str(&format!("Activities: {}\n", activities.join(", ")));
    }
    if let Some(climate) = &params.climate_preferences {
        prompt.push_str(&format!("Climate: {}\n", climate));
    }
    if let Some(dates) = &params.travel_dates {
        prompt.push_str(&format!("Travel dates: {}\n", dates));
    }

    prompt.push_str(
        "\nInclude:\n\
         - Day-by-day breakdown with specific times\n\
         - Luxury eco-friendly hotels with exact prices\n\
         - Sustainable fine dining (breakfast/lunch/dinner) with restaurant names\n\
         - Exclusive eco-conscious activities\n\
         - Green transportation options\n\
         - Daily cost estimates\n\
         - Sustainability tips\n\n\
         Be specific with hotel names, restaurant names, and actual prices.",
    );
    prompt
}

/// The getaway prompt injects the full catalog region list as a closed set.
/// Without that constraint the generated destinations would rarely resolve
/// against the affiliate catalog.
pub(crate) fn build_getaway_prompt(params: &TripParameters, catalog: &Catalog) -> String {
    let mut prompt = format!(
        "Suggest 3 eco-friendly luxury getaways for {}:\n\n\
         Budget: {}\n\
         Travelers: {} people",
        BRAND_NAME, params.budget, params.family_size,
    );

    if let Some(activities) = &params.preferred_activities {
        prompt.push_str(&format!("\nActivities: {}", activities.join(", ")));
    }
    if let Some(climate) = &params.climate_preferences {
        prompt.push_str(&format!("\nClimate: {}", climate));
    }
    if let Some(scenery) = &params.geography_scenery {
        prompt.push_str(&format!("\nScenery: {}", scenery));
    }

    prompt.push_str(&format!(
        "\n\nIMPORTANT: Select destinations ONLY from this list (we have affiliate partnerships):\n\
         {}\n\n\
         Match destinations to the requested activities and preferences. For example:\n\
         - Skiing/snowboarding -> Switzerland, Norway, Japan\n\
         - Beach/tropical -> Maldives, Bali, Hawaii, Thailand\n\
         - Culture/city -> France, England, Dubai\n\n\
         For each destination:\n\
         **Option X: [Destination Name] - [Catchy Title]**\n\n\
         **Destination Description:**\n\
         [Detailed description focusing on eco-friendly aspects and matching the requested activities]\n\n\
         **Family Activities:** (if travelers > 2)\n\
         [Activities suitable for families]\n\n\
         **Scenery Preference:** [Type]\n\
         **Climate Preference:** [Type]\n\
         **Estimated Cost:** [Amount]\n\n\
         [Compelling closing paragraph about sustainability]\n\n\
         Use destinations from the affiliate list only. Format exactly like this with clear sections.",
        catalog.region_names().join(", "),
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_with_activities() -> TripParameters {
        TripParameters {
            preferred_activities: Some(vec!["skiing".to_string(), "spa".to_string()]),
            climate_preferences: Some("cold".to_string()),
            ..TripParameters::default_record()
        }
    }

    #[test]
    fn itinerary_prompt_omits_absent_parameter_lines() {
        let prompt = build_itinerary_prompt(&TripParameters::default_record());
        assert!(prompt.contains("Destination: Paris"));
        assert!(prompt.contains("Days: 7"));
        assert!(!prompt.contains("Activities:"));
        assert!(!prompt.contains("Climate:"));
        assert!(!prompt.contains("null"));
    }

    #[test]
    fn itinerary_prompt_includes_present_parameter_lines() {
        let prompt = build_itinerary_prompt(&params_with_activities());
        assert!(prompt.contains("Activities: skiing, spa"));
        assert!(prompt.contains("Climate: cold"));
    }

    #[test]
    fn getaway_prompt_injects_region_list_as_closed_set() {
        let catalog = Catalog::load().unwrap();
        let prompt = build_getaway_prompt(&params_with_activities(), &catalog);
        for region in catalog.region_names() {
            assert!(prompt.contains(region), "missing region {}", region);
        }
        assert!(prompt.contains("ONLY from this list"));
        assert!(prompt.contains("Option X:"));
    }

    #[test]
    fn cache_key_distinguishes_intent_and_destination() {
        let params = TripParameters::default_record();
        let a = cache_key(&params, Intent::Getaway);
        let b = cache_key(&params, Intent::Itinerary);
        assert_ne!(a, b);

        let other = TripParameters {
            destination: vec!["Tokyo".to_string()],
            ..TripParameters::default_record()
        };
        assert_ne!(a, cache_key(&other, Intent::Getaway));
    }
}
