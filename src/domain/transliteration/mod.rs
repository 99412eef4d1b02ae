pub mod error;
pub mod service;

use serde::{Deserialize, Serialize};

pub use error::TransliterationError;
pub use service::TransliterationService;

/// Query for GET /api/transliterate
#[derive(Debug, Serialize, Deserialize)]
pub struct TransliterationQuery {
    #[serde(default)]
    pub text: Option<String>,
}

/// Response for GET /api/transliterate
#[derive(Debug, Serialize, Deserialize)]
pub struct TransliterationResponse {
    pub result: String,
}
