//! Inert backend for platforms without a speech capability.

use crate::{SpeechBackend, Utterance, Voice};

/// Backend that reports the speech capability as absent.
///
/// Every operation is an accepting no-op and no events are ever emitted, so
/// a [`Sequencer`](crate::Sequencer) built on it stays idle forever. Use it
/// where a sequencer instance is required but the host has no speech output.
#[derive(Debug, Default)]
pub struct NullBackend;

impl NullBackend {
    pub fn new() -> Self {
        Self
    }
}

impl SpeechBackend for NullBackend {
    fn is_supported(&self) -> bool {
        false
    }

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&mut self, _utterance: &Utterance) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn pause(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn resume(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}
