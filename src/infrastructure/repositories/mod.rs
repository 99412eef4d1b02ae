pub mod runpod_job_poller;
pub mod runpod_tts_repository;
pub mod transliteration_repository;
pub mod tts_repository;

pub use runpod_job_poller::{PollSettings, RunpodJobPoller};
pub use runpod_tts_repository::{RunpodSettings, RunpodTtsRepository};
pub use transliteration_repository::{GoogleInputToolsRepository, TransliterationRepository};
pub use tts_repository::TtsRepository;
