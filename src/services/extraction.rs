use std::fmt;
use std::time::Duration;

use log::{debug, error};

use crate::models::trip::{RawTripParameters, TripParameters};
use crate::services::openai::{OpenAiClient, OpenAiError};

const EXTRACTION_MAX_TOKENS: u32 = 500;
const EXTRACTION_TEMPERATURE: f32 = 0.3;
const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
enum ExtractionError {
    OpenAi(OpenAiError),
    NoJsonObject,
    Parse(serde_json::Error),
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::OpenAi(err) => write!(f, "model call failed: {}", err),
            ExtractionError::NoJsonObject => write!(f, "no JSON object in model reply"),
            ExtractionError::Parse(err) => write!(f, "invalid parameter JSON: {}", err),
        }
    }
}

/// Turns a free-text message into a normalized `TripParameters` record with
/// one low-temperature model call. Extraction failure is never fatal: every
/// failure path degrades to the fixed default record.
#[derive(Clone)]
pub struct ParameterExtractor {
    openai: OpenAiClient,
}

impl ParameterExtractor {
    pub fn new(openai: OpenAiClient) -> Self {
        Self { openai }
    }

    pub async fn extract(&self, message: &str) -> TripParameters {
        match self.try_extract(message).await {
            Ok(params) => params,
            Err(e) => {
                error!("Parameter extraction failed, using defaults: {}", e);
                TripParameters::default_record()
            }
        }
    }

    async fn try_extract(&self, message: &str) -> Result<TripParameters, ExtractionError> {
        let reply = self
            .openai
            .complete(
                &build_extraction_prompt(message),
                EXTRACTION_MAX_TOKENS,
                EXTRACTION_TEMPERATURE,
                EXTRACTION_TIMEOUT,
            )
            .await
            .map_err(ExtractionError::OpenAi)?;

        let json = first_json_object(&reply).ok_or(ExtractionError::NoJsonObject)?;
        let raw: RawTripParameters =
            serde_json::from_str(json).map_err(ExtractionError::Parse)?;

        let params = raw.normalize();
        debug!("Extracted parameters: {:?}", params);
        Ok(params)
    }
}

fn build_extraction_prompt(message: &str) -> String {
    format!(
        r#"Extract travel parameters from: "{message}"

Return JSON with these fields (null if not mentioned):
{{
  "destination": ["string"],          // Extract mentioned destinations, or null if none mentioned
  "number_of_days": number,           // Extract number of days
  "budget": "string",                 // Extract budget with currency
  "preferred_activities": ["string"], // Extract ALL activities (skiing, snowboarding, hiking, etc)
  "family_size": number,              // Number of people traveling
  "ages": [number],                   // Ages if mentioned
  "travel_dates": "string",           // Dates or season (e.g., "winter", "December")
  "climate_preferences": "string",    // Weather preference (cold, warm, tropical, etc)
  "geography_scenery": "string"       // Type of scenery (mountains, beach, desert, etc)
}}

Examples:
"7-day Paris trip for 2, $5000" ->
{{"destination":["Paris"],"number_of_days":7,"family_size":2,"budget":"$5000","preferred_activities":null,"ages":null,"travel_dates":null,"climate_preferences":null,"geography_scenery":null}}

"Winter ski vacation for family of 4, love snowboarding" ->
{{"destination":null,"number_of_days":null,"family_size":4,"budget":null,"preferred_activities":["skiing","snowboarding"],"ages":null,"travel_dates":"winter","climate_preferences":"cold","geography_scenery":"mountains"}}

Extract ALL activities mentioned, and infer geography from activities (skiing=mountains, beach activities=beach, etc)."#
    )
}

/// Returns the first top-level `{...}` object in `text`. The model may wrap
/// its JSON in prose, so this brace-matches rather than parsing the whole
/// reply. String literals are tracked so braces inside values don't count.
fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::{DEFAULT_BUDGET, DEFAULT_DAYS, DEFAULT_FAMILY_SIZE};

    #[test]
    fn finds_json_wrapped_in_prose() {
        let reply = r#"Sure! Here are the parameters:
{"destination":["Bali"],"number_of_days":3} Hope that helps."#;
        assert_eq!(
            first_json_object(reply),
            Some(r#"{"destination":["Bali"],"number_of_days":3}"#)
        );
    }

    #[test]
    fn brace_matching_ignores_braces_inside_strings() {
        let reply = r#"{"budget":"{flexible}","number_of_days":2}"#;
        assert_eq!(first_json_object(reply), Some(reply));
    }

    #[test]
    fn no_object_yields_none() {
        assert_eq!(first_json_object("no json here"), None);
        assert_eq!(first_json_object("{unterminated"), None);
    }

    #[test]
    fn prompt_embeds_the_message_and_worked_examples() {
        let prompt = build_extraction_prompt("ski trip for 4");
        assert!(prompt.contains(r#"Extract travel parameters from: "ski trip for 4""#));
        assert!(prompt.contains("7-day Paris trip for 2"));
        assert!(prompt.contains("Winter ski vacation for family of 4"));
    }

    #[actix_web::test]
    async fn network_failure_degrades_to_default_record() {
        // Port 1 is never listening; the call fails immediately.
        let client = OpenAiClient::new("test-key").with_endpoint("http://127.0.0.1:1/v1/chat");
        let extractor = ParameterExtractor::new(client);

        let params = extractor.extract("Plan a trip").await;
        assert_eq!(params, TripParameters::default_record());
        assert_eq!(params.destination, vec!["Paris"]);
        assert_eq!(params.number_of_days, DEFAULT_DAYS);
        assert_eq!(params.family_size, DEFAULT_FAMILY_SIZE);
        assert_eq!(params.budget, DEFAULT_BUDGET);
    }
}
