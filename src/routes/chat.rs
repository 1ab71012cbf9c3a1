use actix_web::{web, HttpResponse, Responder};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;

use crate::catalog::BANNER_ADS;
use crate::models::request::{ChatRequest, TripRequest};
use crate::models::trip::{Intent, TripParameters};
use crate::services::{assembly, intent, naming, resolver};
use crate::state::AppState;

const CAPABILITY_MESSAGE: &str = "Hi! I'm Dave from Eco Friendly Luxury Travels. I can:\n\n\
    \u{1F4C5} Create detailed sustainable travel itineraries\n\
    \u{1F3D6}\u{FE0F} Suggest eco-friendly luxury getaways\n\n\
    What would you like to explore?";

#[derive(Serialize)]
struct ChatResponse {
    response: String,
    parameters: TripParameters,
    intent: Intent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pdf_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pdf_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_error: Option<String>,
}

/// Main conversational endpoint: extract, route, generate, render.
pub async fn chat(state: web::Data<AppState>, body: web::Json<ChatRequest>) -> impl Responder {
    let message = match body.message.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => m,
        _ => return HttpResponse::BadRequest().json(json!({"error": "Message required"})),
    };

    info!("Chat: {}", message);
    let parameters = state.extractor.extract(message).await;

    match intent::route(message) {
        Intent::Unknown => HttpResponse::Ok().json(ChatResponse {
            response: CAPABILITY_MESSAGE.to_string(),
            parameters,
            intent: Intent::Unknown,
            pdf_url: None,
            pdf_filename: None,
            storage_url: None,
            storage_error: None,
        }),
        routed => run_pipeline(&state, parameters, routed).await,
    }
}

/// Direct itinerary endpoint; skips keyword routing. Explicit fields win
/// over a free-text message.
pub async fn itinerary(state: web::Data<AppState>, body: web::Json<TripRequest>) -> impl Responder {
    let parameters = resolve_parameters(&state, &body).await;
    run_pipeline(&state, parameters, Intent::Itinerary).await
}

pub async fn getaway(state: web::Data<AppState>, body: web::Json<TripRequest>) -> impl Responder {
    let parameters = resolve_parameters(&state, &body).await;
    run_pipeline(&state, parameters, Intent::Getaway).await
}

async fn resolve_parameters(state: &web::Data<AppState>, body: &TripRequest) -> TripParameters {
    if body.has_explicit_fields() {
        return body.to_raw().normalize();
    }
    match body.message.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => state.extractor.extract(m).await,
        _ => TripParameters::default_record(),
    }
}

async fn run_pipeline(
    state: &web::Data<AppState>,
    parameters: TripParameters,
    intent: Intent,
) -> HttpResponse {
    let content = match state.generator.generate(&parameters, intent).await {
        Ok(content) => content,
        Err(e) => {
            error!("Generation failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(json!({"error": "Failed to generate content"}));
        }
    };

    let links = resolver::resolve(&content, &state.catalog);
    let document = assembly::assemble(
        &content,
        &parameters,
        intent,
        &links,
        &BANNER_ADS,
        &state.catalog,
    );

    let mut response = ChatResponse {
        response: content,
        parameters,
        intent,
        pdf_url: None,
        pdf_filename: None,
        storage_url: None,
        storage_error: None,
    };

    let filename = naming::generate_filename(&response.parameters, intent);
    match state.renderer.render(&document, &state.store.path_for(&filename)) {
        Ok(()) => {
            response.pdf_url = Some(format!("/download/{}", filename));
            response.pdf_filename = Some(filename.clone());

            // A mirror failure never fails the request; the local copy is
            // still downloadable.
            match state.store.mirror_to_gcs(&filename).await {
                Ok(Some(url)) => response.storage_url = Some(url),
                Ok(None) => {}
                Err(e) => {
                    warn!("GCS mirror failed for {}: {}", filename, e);
                    response.storage_error = Some(e.to_string());
                }
            }
        }
        Err(e) => {
            // The text response is still useful without a document.
            error!("PDF render failed for {}: {}", filename, e);
        }
    }

    HttpResponse::Ok().json(response)
}
