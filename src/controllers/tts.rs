use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::tts::{TtsRequest, TtsResponse, TtsService, TtsServiceApi},
    error::{AppError, AppResult},
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
    shutdown: CancellationToken,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>, shutdown: CancellationToken) -> Self {
        Self {
            tts_service,
            shutdown,
        }
    }

    /// POST /api/tts - Convert text to speech
    ///
    /// If the client disconnects the server drops this future, which drops
    /// the poll loop with it. Shutdown cancels through the child token.
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        payload: Result<Json<TtsRequest>, JsonRejection>,
    ) -> AppResult<Json<TtsResponse>> {
        let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
        let cancel = controller.shutdown.child_token();

        let payload = controller
            .tts_service
            .synthesize(request.text, cancel)
            .await
            .map_err(AppError::from)?;

        Ok(Json(TtsResponse::from(&payload)))
    }
}
