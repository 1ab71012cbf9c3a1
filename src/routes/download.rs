use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::error;
use serde_json::json;

use crate::state::AppState;

// Generated filenames only ever contain these characters; anything else is
// a traversal attempt or a typo.
fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name.ends_with(".pdf")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && !name.contains("..")
}

pub async fn download_pdf(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let filename = path.into_inner();
    if !is_safe_filename(&filename) {
        return HttpResponse::NotFound().json(json!({"error": "File not found"}));
    }

    match NamedFile::open(state.store.path_for(&filename)) {
        Ok(file) => file
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            })
            .into_response(&req),
        Err(e) => {
            error!("Download error for {}: {}", filename, e);
            HttpResponse::NotFound().json(json!({"error": "File not found"}))
        }
    }
}
