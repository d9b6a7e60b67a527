//! # narrate-rs
//!
//! A Rust library for sequential text-to-speech narration.
//!
//! Callers submit an ordered list of text segments (a recipe's title,
//! ingredient lines, instruction steps) and the [`Sequencer`] speaks them one
//! at a time through a pluggable [`SpeechBackend`], advancing automatically
//! as each utterance completes.
//!
//! ## Features
//!
//! - **Sequential playback**: one utterance in flight at a time, strict
//!   submission order, automatic advance on completion
//! - **Playback controls**: pause, resume, stop, plus voice/rate/pitch/volume
//!   adjustment applied from the next segment onward
//! - **Pluggable backends**: `espeak-ng` out of the box, inert fallback for
//!   platforms without a speech capability
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! narrate-rs = "2026.8"
//! ```
//!
//! ```no_run
//! use std::sync::mpsc;
//! use narrate_rs::{backends::espeak::EspeakBackend, Sequencer};
//!
//! let (sink, events) = mpsc::channel();
//! let backend = EspeakBackend::new(sink);
//! let mut narrator = Sequencer::new(backend, events);
//!
//! if narrator.is_supported() {
//!     narrator.speak(vec![
//!         "Step 1: Dice the onion.".to_string(),
//!         "Step 2: Saute until translucent.".to_string(),
//!     ]);
//!     narrator.block_until_idle();
//! }
//! ```

pub mod backends;
pub mod script;
pub mod sequencer;

pub use sequencer::{PlaybackState, Sequencer};

use serde::{Deserialize, Serialize};

/// Descriptor for one voice offered by a speech backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    /// Backend-specific identifier, passed back via [`SpeechOptions`].
    pub id: String,
    /// Human-readable name for voice pickers.
    pub name: String,
    /// Language tag (e.g. `"en-gb"`).
    pub language: String,
}

/// Voice configuration applied to utterances.
///
/// Mutable at any time; the sequencer snapshots it into each [`Utterance`]
/// when that segment starts, so changes never retroactively alter audio
/// already in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechOptions {
    /// Selected voice. `None` lets the backend use its default.
    pub voice: Option<Voice>,
    /// Speed multiplier. Range: 0.1–10.0, default 1.0.
    pub rate: f32,
    /// Pitch. Range: 0.0–2.0, default 1.0.
    pub pitch: f32,
    /// Volume. Range: 0.0–1.0, default 1.0.
    pub volume: f32,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            voice: None,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Identifier assigned by the sequencer to each utterance it hands a backend.
///
/// Completion events echo the id, so a completion belonging to a cancelled or
/// superseded utterance can be recognized and dropped instead of advancing
/// the wrong queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub u64);

/// One synthesis request: a single text segment plus the voice parameters in
/// effect when it was started.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub voice: Option<Voice>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Notifications a backend delivers to the sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// The utterance with the given id finished playing.
    UtteranceFinished(UtteranceId),
    /// The backend's voice catalog changed; callers should re-query
    /// [`SpeechBackend::voices`]. An initial query before the catalog loads
    /// legitimately returns an empty list.
    VoicesChanged,
}

/// Sending half of a backend's event channel.
///
/// Backends are constructed with one of these; the [`Sequencer`] owns the
/// matching receiver. Cloneable, so a backend may hand it to watcher threads.
pub type EventSink = std::sync::mpsc::Sender<BackendEvent>;

/// Common interface for speech backends.
///
/// A backend binds the sequencer to one platform speech capability: it speaks
/// exactly one utterance per [`speak`](SpeechBackend::speak) call and reports
/// completion asynchronously through its [`EventSink`]. The sequencer is the
/// only caller and guarantees at most one utterance in flight.
pub trait SpeechBackend {
    /// True if the platform speech capability is present. When false, the
    /// sequencer turns every operation into a silent no-op.
    fn is_supported(&self) -> bool;

    /// List available voices. May be empty before the backend finishes
    /// loading its catalog; [`BackendEvent::VoicesChanged`] signals when to
    /// re-query.
    fn voices(&self) -> Vec<Voice>;

    /// Start speaking one utterance and return immediately. Completion is
    /// reported as [`BackendEvent::UtteranceFinished`] with the utterance's
    /// id.
    fn speak(&mut self, utterance: &Utterance) -> Result<(), Box<dyn std::error::Error>>;

    /// Suspend output. Backends that cannot suspend an utterance in flight
    /// may accept this as a no-op; the sequencer then holds at the next
    /// segment boundary instead.
    fn pause(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Resume output suspended by [`pause`](SpeechBackend::pause).
    fn resume(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Cancel the in-flight utterance, if any. A completion event the
    /// backend emits for a cancelled utterance is dropped by the sequencer's
    /// id check, so backends need not suppress it.
    fn cancel(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
