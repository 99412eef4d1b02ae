pub mod health;
pub mod transliteration;
pub mod tts;
