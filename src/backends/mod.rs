//! Speech backends.
//!
//! This module contains implementations of the [`SpeechBackend`] trait.
//!
//! # Available Backends
//!
//! - [`espeak`] - speaks through the `espeak-ng` command-line synthesizer
//! - [`null`] - inert fallback for platforms without a speech capability
//!
//! [`SpeechBackend`]: crate::SpeechBackend

pub mod espeak;
pub mod null;
