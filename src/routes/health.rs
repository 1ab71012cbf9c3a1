use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let openai_result = check_openai_config();
    health
        .services
        .insert("openai".to_string(), openai_result.clone());

    let storage_result = check_storage(&state);
    health
        .services
        .insert("storage".to_string(), storage_result.clone());

    if openai_result.status != "ok" || storage_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

pub async fn version() -> impl Responder {
    HttpResponse::Ok().body(env!("CARGO_PKG_VERSION"))
}

// Validates key existence only; a live API call on every probe would burn
// quota.
fn check_openai_config() -> ServiceStatus {
    match env::var("OPENAI_API_KEY") {
        Ok(key) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("OpenAI API key configured ({})", mask_key(&key))),
        },
        Err(_) => ServiceStatus {
            status: "error".to_string(),
            details: Some("OPENAI_API_KEY not configured".to_string()),
        },
    }
}

// Char-based so a key with multi-byte characters cannot split a boundary.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    } else {
        "***".to_string()
    }
}

fn check_storage(state: &web::Data<AppState>) -> ServiceStatus {
    let dir = state.store.dir();
    if dir.is_dir() {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Document directory '{}' accessible", dir.display())),
        }
    } else {
        ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("Document directory '{}' missing", dir.display())),
        }
    }
}
