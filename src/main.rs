use std::env;
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

mod catalog;
mod models;
mod routes;
mod services;
mod state;

use catalog::{Catalog, BRAND_NAME};
use services::extraction::ParameterExtractor;
use services::generation::ContentGenerator;
use services::openai::OpenAiClient;
use services::pdf::PdfRenderer;
use services::storage::DocumentStore;
use state::AppState;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);
const DOCUMENT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Development runs chatty by default; everything else starts at info.
/// `RUST_LOG` still overrides either way.
fn default_log_filter(environment: &str) -> &'static str {
    if environment == "development" {
        "debug"
    } else {
        "info"
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let environment = env::var("ENV").unwrap_or_else(|_| "development".to_string());
    env_logger::init_from_env(Env::default().default_filter_or(default_log_filter(&environment)));

    let host = env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let api_key = match env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            error!("OPENAI_API_KEY must be set");
            exit(1);
        }
    };

    let catalog = match Catalog::load() {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            error!("Failed to load affiliate catalog: {}", e);
            exit(1);
        }
    };

    let storage_dir = env::var("STORAGE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir().join("travel-pdfs"));
    let bucket = env::var("PDF_BUCKET").ok().filter(|b| !b.is_empty());
    if bucket.is_none() {
        warn!("PDF_BUCKET not set; documents are served from local disk only");
    }

    let store = match DocumentStore::new(storage_dir, bucket) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to prepare document storage: {}", e);
            exit(1);
        }
    };

    let openai = OpenAiClient::new(api_key);
    let app_state = web::Data::new(AppState {
        catalog: catalog.clone(),
        extractor: ParameterExtractor::new(openai.clone()),
        generator: ContentGenerator::new(openai, catalog),
        renderer: PdfRenderer::new(),
        store,
    });

    // Hourly sweep keeps the document directory from growing unbounded.
    let sweep_state = app_state.clone();
    actix_web::rt::spawn(async move {
        let mut timer = actix_web::rt::time::interval(SWEEP_INTERVAL);
        loop {
            timer.tick().await;
            sweep_state.store.sweep(DOCUMENT_TTL);
        }
    });

    info!(
        "Starting {} API v{} on {}:{}",
        BRAND_NAME,
        env!("CARGO_PKG_VERSION"),
        host,
        port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(app_state.clone())
            .route("/health", web::get().to(routes::health::health_check))
            .route("/version", web::get().to(routes::health::version))
            .route(
                "/download/{filename}",
                web::get().to(routes::download::download_pdf),
            )
            .service(
                web::scope("/api")
                    .route("/chat", web::post().to(routes::chat::chat))
                    .route("/itinerary", web::post().to(routes::chat::itinerary))
                    .route("/getaway", web::post().to(routes::chat::getaway)),
            )
    })
    .bind((host, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::default_log_filter;

    #[test]
    fn development_environment_defaults_to_debug() {
        assert_eq!(default_log_filter("development"), "debug");
    }

    #[test]
    fn other_environments_default_to_info() {
        assert_eq!(default_log_filter("production"), "info");
        assert_eq!(default_log_filter("staging"), "info");
        assert_eq!(default_log_filter(""), "info");
    }
}
