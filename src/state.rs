use std::sync::Arc;

use crate::catalog::Catalog;
use crate::services::extraction::ParameterExtractor;
use crate::services::generation::ContentGenerator;
use crate::services::pdf::PdfRenderer;
use crate::services::storage::DocumentStore;

/// Shared per-process state handed to every handler through `web::Data`.
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub extractor: ParameterExtractor,
    pub generator: ContentGenerator,
    pub renderer: PdfRenderer,
    pub store: DocumentStore,
}
