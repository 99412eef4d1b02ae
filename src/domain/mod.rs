pub mod transliteration;
pub mod tts;
