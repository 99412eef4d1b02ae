pub mod dto;
pub mod error;
pub mod job;
pub mod normalize;
pub mod payload;
pub mod service;

pub use dto::{TtsRequest, TtsResponse};
pub use error::TtsServiceError;
pub use job::{JobStatus, ProviderJob, ProviderResponse};
pub use normalize::{normalize, AudioSource};
pub use payload::AudioPayload;
pub use service::{TtsService, TtsServiceApi};
