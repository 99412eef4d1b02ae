use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TransliterationError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("transliteration lookup failed: {0}")]
    Dependency(String),
}

impl From<TransliterationError> for AppError {
    fn from(err: TransliterationError) -> Self {
        match err {
            TransliterationError::Invalid(msg) => AppError::BadRequest(msg),
            TransliterationError::Dependency(msg) => AppError::BadGateway {
                message: "Transliteration lookup failed".to_string(),
                details: Some(msg),
            },
        }
    }
}
