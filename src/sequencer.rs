//! Sequential playback of text segments over a speech backend.
//!
//! The platform speech primitive speaks one utterance at a time, so the
//! sequencer re-invokes it on every completion event to chain segments,
//! while the caller only thinks in terms of "narrate this whole list".

use std::sync::mpsc::Receiver;

use crate::{BackendEvent, SpeechBackend, SpeechOptions, Utterance, UtteranceId, Voice};

/// Current playback state of a [`Sequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No active queue. The resting state, re-enterable indefinitely.
    Idle,
    /// A non-empty queue with an utterance in flight.
    Speaking,
    /// Queue and cursor retained, output suspended.
    Paused,
}

/// Drives sequential narration of a list of text segments.
///
/// One utterance is in flight at a time; segments are spoken strictly in
/// submission order, and a new [`speak`](Sequencer::speak) call supersedes
/// any prior queue. Completion notifications arrive on the event channel the
/// backend was constructed with; callers drive them through
/// [`poll`](Sequencer::poll), [`handle_event`](Sequencer::handle_event), or
/// [`block_until_idle`](Sequencer::block_until_idle).
///
/// When the backend reports the speech capability as unsupported, every
/// operation is a silent no-op. Callers are expected to branch on
/// [`is_supported`](Sequencer::is_supported) once and hide playback controls
/// rather than handle per-call failures.
pub struct Sequencer<B> {
    backend: B,
    events: Receiver<BackendEvent>,
    queue: Vec<String>,
    cursor: usize,
    state: PlaybackState,
    options: SpeechOptions,
    /// Id of the in-flight utterance. Completions carrying any other id are
    /// stale (cancelled or superseded) and dropped.
    current: Option<UtteranceId>,
    /// Set when a paused playback's utterance finished at a segment
    /// boundary; `resume` then starts the next segment instead of resuming
    /// backend output.
    parked: bool,
    next_id: u64,
}

impl<B: SpeechBackend> Sequencer<B> {
    /// Create a sequencer around an injected backend and the receiving end
    /// of its event channel.
    ///
    /// If the backend already offers voices, the first one becomes the
    /// default selection; otherwise a default is adopted when the backend
    /// fires [`BackendEvent::VoicesChanged`].
    pub fn new(backend: B, events: Receiver<BackendEvent>) -> Self {
        let mut seq = Self {
            backend,
            events,
            queue: Vec::new(),
            cursor: 0,
            state: PlaybackState::Idle,
            options: SpeechOptions::default(),
            current: None,
            parked: false,
            next_id: 0,
        };
        seq.adopt_default_voice();
        seq
    }

    /// True if the platform speech capability is present.
    pub fn is_supported(&self) -> bool {
        self.backend.is_supported()
    }

    /// Available voices, as reported by the backend right now.
    ///
    /// May be empty before the backend finishes loading its catalog;
    /// re-query after a [`BackendEvent::VoicesChanged`] has been handled.
    pub fn voices(&self) -> Vec<Voice> {
        self.backend.voices()
    }

    /// The voice configuration applied to the next segment spoken.
    pub fn options(&self) -> &SpeechOptions {
        &self.options
    }

    /// Select the voice used from the next segment onward.
    pub fn set_voice(&mut self, voice: Voice) {
        self.options.voice = Some(voice);
    }

    /// Set the speed multiplier, clamped to 0.1–10.0.
    pub fn set_rate(&mut self, rate: f32) {
        self.options.rate = rate.clamp(0.1, 10.0);
    }

    /// Set the pitch, clamped to 0.0–2.0.
    pub fn set_pitch(&mut self, pitch: f32) {
        self.options.pitch = pitch.clamp(0.0, 2.0);
    }

    /// Set the volume, clamped to 0.0–1.0.
    pub fn set_volume(&mut self, volume: f32) {
        self.options.volume = volume.clamp(0.0, 1.0);
    }

    /// Replace any current playback with `segments` and begin speaking the
    /// first one. No-op if the capability is unsupported or `segments` is
    /// empty.
    pub fn speak(&mut self, segments: Vec<String>) {
        if !self.is_supported() || segments.is_empty() {
            return;
        }

        self.stop();
        self.queue = segments;
        self.cursor = 0;
        self.speak_current();
    }

    /// Suspend output. No-op unless currently speaking.
    ///
    /// Backends that can suspend mid-utterance do so; backends that cannot
    /// finish the current utterance, after which the sequencer holds at the
    /// segment boundary until [`resume`](Sequencer::resume).
    pub fn pause(&mut self) {
        if !self.is_supported() || self.state != PlaybackState::Speaking {
            return;
        }
        if let Err(e) = self.backend.pause() {
            log::warn!("backend pause failed: {e}");
        }
        self.state = PlaybackState::Paused;
    }

    /// Resume suspended output. No-op unless paused.
    pub fn resume(&mut self) {
        if !self.is_supported() || self.state != PlaybackState::Paused {
            return;
        }
        self.state = PlaybackState::Speaking;
        if self.parked {
            self.parked = false;
            self.speak_current();
        } else if let Err(e) = self.backend.resume() {
            log::warn!("backend resume failed: {e}");
        }
    }

    /// Cancel any in-flight or queued speech and return to [`Idle`].
    ///
    /// Safe to call in any state. [`is_playing`](Sequencer::is_playing)
    /// reflects [`Idle`] immediately, even though backend audio teardown may
    /// lag.
    ///
    /// [`Idle`]: PlaybackState::Idle
    pub fn stop(&mut self) {
        if !self.is_supported() {
            return;
        }
        if let Err(e) = self.backend.cancel() {
            log::warn!("backend cancel failed: {e}");
        }
        self.reset();
    }

    /// True only while speaking (not while paused).
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Speaking
    }

    /// True while output is suspended.
    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// The segment currently being spoken (or held paused), if any.
    pub fn current_segment(&self) -> Option<&str> {
        if self.state == PlaybackState::Idle {
            return None;
        }
        self.queue.get(self.cursor).map(String::as_str)
    }

    /// React to one backend event.
    pub fn handle_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::UtteranceFinished(id) => self.on_utterance_finished(id),
            BackendEvent::VoicesChanged => self.adopt_default_voice(),
        }
    }

    /// Drain pending backend events without blocking.
    pub fn poll(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
        }
    }

    /// Drive backend events until playback returns to idle.
    ///
    /// Blocks the calling thread; intended for non-interactive callers such
    /// as command-line narration. Returns early if the backend's event
    /// channel disconnects or if playback is paused with no event pending
    /// that could ever un-pause it.
    pub fn block_until_idle(&mut self) {
        while self.state == PlaybackState::Speaking {
            match self.events.recv() {
                Ok(event) => self.handle_event(event),
                Err(_) => break,
            }
        }
    }

    fn on_utterance_finished(&mut self, id: UtteranceId) {
        if self.current != Some(id) {
            log::debug!("dropping stale completion for {id:?}");
            return;
        }
        self.current = None;

        if self.cursor + 1 < self.queue.len() {
            self.cursor += 1;
            match self.state {
                PlaybackState::Speaking => self.speak_current(),
                PlaybackState::Paused => self.parked = true,
                PlaybackState::Idle => {}
            }
        } else {
            // Queue exhausted, also when the last utterance ran out while
            // paused and there is nothing left to resume into.
            self.reset();
        }
    }

    /// Hand the segment under the cursor to the backend as a fresh
    /// utterance, snapshotting the current voice configuration.
    fn speak_current(&mut self) {
        let Some(text) = self.queue.get(self.cursor).cloned() else {
            return;
        };

        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        let utterance = Utterance {
            id,
            text,
            voice: self.options.voice.clone(),
            rate: self.options.rate,
            pitch: self.options.pitch,
            volume: self.options.volume,
        };

        log::debug!(
            "speaking segment {}/{}",
            self.cursor + 1,
            self.queue.len()
        );

        match self.backend.speak(&utterance) {
            Ok(()) => {
                self.current = Some(id);
                self.state = PlaybackState::Speaking;
            }
            Err(e) => {
                log::warn!("backend speak failed, stopping playback: {e}");
                self.reset();
            }
        }
    }

    fn adopt_default_voice(&mut self) {
        if self.options.voice.is_some() {
            return;
        }
        if let Some(voice) = self.backend.voices().into_iter().next() {
            log::debug!("using default voice {}", voice.name);
            self.options.voice = Some(voice);
        }
    }

    fn reset(&mut self) {
        self.queue.clear();
        self.cursor = 0;
        self.current = None;
        self.parked = false;
        self.state = PlaybackState::Idle;
    }
}
