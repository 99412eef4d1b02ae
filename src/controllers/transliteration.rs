use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::transliteration::{
        TransliterationQuery, TransliterationResponse, TransliterationService,
    },
    error::AppResult,
};

pub struct TransliterationController {
    service: Arc<TransliterationService>,
}

impl TransliterationController {
    pub fn new(service: Arc<TransliterationService>) -> Self {
        Self { service }
    }

    /// GET /api/transliterate?text=... - Romanized text to Telugu script
    pub async fn transliterate(
        State(controller): State<Arc<TransliterationController>>,
        Query(query): Query<TransliterationQuery>,
    ) -> AppResult<Json<TransliterationResponse>> {
        let text = query.text.unwrap_or_default();
        let result = controller.service.transliterate(&text).await?;

        Ok(Json(TransliterationResponse { result }))
    }
}
