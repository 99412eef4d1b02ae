// End-to-end integration tests for the Telugu TTS relay
//
// Every test starts its own mock inference provider on an ephemeral port and
// wires a fresh app instance against it. Nothing is shared between tests, so
// they run in parallel.
//
// Architecture:
// - MockProvider serves runsync/run/status, a remote audio file and the
//   transliteration lookup, with replies scripted per route
// - TestContext builds the app with the same wiring as `main`
// - test_polling drives the provider repository directly for exact poll counts

mod helpers;
mod test_health;
mod test_transliteration;
