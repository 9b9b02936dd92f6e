//! Speech-to-text and text-to-speech clients for voice interaction.
//!
//! Both directions are thin REST clients behind traits, with deterministic
//! mocks for tests. Audio capture and playback are left to the caller; this
//! crate deals in WAV bytes in and encoded audio bytes out.

pub mod stt;
pub mod tts;
pub mod wav;

pub use stt::{DeepgramStt, MockTranscription, TranscriptionService};
pub use tts::{DeepgramTts, MockSynthesis, SpeechSynthesis};
pub use wav::{bound_samples, duration_secs, encode_wav};
