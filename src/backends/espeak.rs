//! Backend speaking through the `espeak-ng` command-line synthesizer.
//!
//! One `espeak-ng` process is spawned per utterance, with the text piped
//! through stdin. A watcher thread reaps the child and reports completion on
//! the backend's event sink.
//!
//! # System Requirements
//!
//! **espeak-ng** must be installed on your system:
//! - **Linux**: `sudo apt-get install espeak-ng`
//! - **macOS**: `brew install espeak-ng`
//! - **Windows**: Download installer from <https://espeak-ng.org/download>
//!
//! When the binary is missing, [`EspeakBackend::is_supported`] returns false
//! and the sequencer degrades to inert.
//!
//! # Pause Granularity
//!
//! espeak-ng cannot suspend an utterance in flight, so `pause`/`resume` are
//! accepted no-ops here; the sequencer supplies pause semantics by holding at
//! the next segment boundary.

use std::cell::OnceCell;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::{BackendEvent, EventSink, SpeechBackend, Utterance, UtteranceId, Voice};

/// espeak-ng's default speaking rate; a rate multiplier of 1.0 maps here.
const BASE_WPM: f32 = 175.0;

/// Interval at which the watcher thread checks the child process.
const REAP_INTERVAL: Duration = Duration::from_millis(25);

#[derive(thiserror::Error, Debug)]
pub enum EspeakError {
    #[error(
        "espeak-ng not found. Install: Linux: `sudo apt-get install espeak-ng`, \
         macOS: `brew install espeak-ng`, Windows: https://espeak-ng.org/download"
    )]
    EspeakNotFound,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Process-based [`SpeechBackend`] using the `espeak-ng` binary.
///
/// # Quick Start
///
/// ```rust,no_run
/// use std::sync::mpsc;
/// use narrate_rs::{backends::espeak::EspeakBackend, Sequencer};
///
/// let (sink, events) = mpsc::channel();
/// let backend = EspeakBackend::new(sink);
/// let mut narrator = Sequencer::new(backend, events);
/// ```
///
/// # Bundled espeak-ng
///
/// ```rust,no_run
/// use std::path::PathBuf;
/// use std::sync::mpsc;
/// use narrate_rs::backends::espeak::EspeakBackend;
///
/// let (sink, _events) = mpsc::channel();
/// let backend = EspeakBackend::with_binary(
///     PathBuf::from("/app/resources/espeak-ng/espeak-ng"),
///     sink,
/// );
/// ```
pub struct EspeakBackend {
    sink: EventSink,
    bin_path: PathBuf,
    /// When set, synthesized audio is written here (`espeak-ng -w`) instead
    /// of the audio device. Each utterance overwrites the file.
    capture_path: Option<PathBuf>,
    child: Option<Arc<Mutex<Child>>>,
    supported: OnceCell<bool>,
}

impl EspeakBackend {
    /// Create a backend that uses `espeak-ng` from PATH, delivering events
    /// on `sink`.
    pub fn new(sink: EventSink) -> Self {
        Self::with_binary(PathBuf::from("espeak-ng"), sink)
    }

    /// Create a backend with an explicit espeak-ng binary path.
    ///
    /// Use this when bundling espeak-ng with your application.
    pub fn with_binary(bin_path: PathBuf, sink: EventSink) -> Self {
        Self {
            sink,
            bin_path,
            capture_path: None,
            child: None,
            supported: OnceCell::new(),
        }
    }

    /// Write synthesized audio to a WAV file instead of the audio device.
    ///
    /// Each utterance overwrites the file. Useful for exporting narration
    /// and for running on machines without audio output.
    pub fn capture_to(&mut self, path: impl Into<PathBuf>) {
        self.capture_path = Some(path.into());
    }

    fn kill_child(&mut self) {
        if let Some(child) = self.child.take() {
            if let Ok(mut guard) = child.lock() {
                // Already-exited children report InvalidInput here.
                let _ = guard.kill();
            }
        }
    }
}

impl Drop for EspeakBackend {
    fn drop(&mut self) {
        self.kill_child();
    }
}

impl SpeechBackend for EspeakBackend {
    fn is_supported(&self) -> bool {
        *self.supported.get_or_init(|| {
            Command::new(&self.bin_path)
                .arg("--version")
                .output()
                .is_ok()
        })
    }

    fn voices(&self) -> Vec<Voice> {
        if !self.is_supported() {
            return Vec::new();
        }
        let output = match Command::new(&self.bin_path).arg("--voices").output() {
            Ok(output) => output,
            Err(e) => {
                log::warn!("espeak-ng --voices failed: {e}");
                return Vec::new();
            }
        };
        parse_voices(&String::from_utf8_lossy(&output.stdout))
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), Box<dyn std::error::Error>> {
        if !self.is_supported() {
            return Err(EspeakError::EspeakNotFound.into());
        }
        self.kill_child();

        let wpm = (BASE_WPM * utterance.rate).clamp(80.0, 450.0) as u32;
        let pitch = (utterance.pitch * 50.0).clamp(0.0, 99.0) as u32;
        let amplitude = (utterance.volume * 100.0).clamp(0.0, 200.0) as u32;

        let mut cmd = Command::new(&self.bin_path);
        cmd.arg("-s")
            .arg(wpm.to_string())
            .arg("-p")
            .arg(pitch.to_string())
            .arg("-a")
            .arg(amplitude.to_string())
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if let Some(voice) = &utterance.voice {
            cmd.arg("-v").arg(&voice.id);
        }
        if let Some(path) = &self.capture_path {
            cmd.arg("-w").arg(path);
        }

        let mut child = cmd.spawn().map_err(EspeakError::Io)?;
        if let Some(mut stdin) = child.stdin.take() {
            // A trailing newline keeps espeak-ng from truncating the final
            // token on some builds; dropping stdin closes the pipe.
            let mut payload = utterance.text.clone();
            if !payload.ends_with('\n') {
                payload.push('\n');
            }
            if let Err(e) = stdin.write_all(payload.as_bytes()) {
                let _ = child.kill();
                return Err(EspeakError::Io(e).into());
            }
        }

        let child = Arc::new(Mutex::new(child));
        self.child = Some(Arc::clone(&child));

        let sink = self.sink.clone();
        let id = utterance.id;
        thread::spawn(move || watch_child(child, sink, id));

        Ok(())
    }

    /// Accepted no-op: espeak-ng cannot suspend an utterance in flight.
    fn pause(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    /// Accepted no-op, matching [`pause`](Self::pause).
    fn resume(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.kill_child();
        Ok(())
    }
}

/// Reap the child process and report completion.
///
/// A killed child still produces a completion event; the sequencer's id
/// check discards it.
fn watch_child(child: Arc<Mutex<Child>>, sink: EventSink, id: UtteranceId) {
    loop {
        let status = match child.lock() {
            Ok(mut guard) => guard.try_wait(),
            Err(_) => break,
        };
        match status {
            Ok(Some(status)) => {
                if !status.success() {
                    log::debug!("espeak-ng exited with {status} for {id:?}");
                }
                break;
            }
            Ok(None) => thread::sleep(REAP_INTERVAL),
            Err(e) => {
                log::warn!("failed to wait on espeak-ng: {e}");
                break;
            }
        }
    }
    let _ = sink.send(BackendEvent::UtteranceFinished(id));
}

/// Parse `espeak-ng --voices` table output.
///
/// Rows look like:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af             --/M      Afrikaans          gmw/af
///  5  en-gb          --/M      English (Great Britain) gmw/en
/// ```
///
/// The voice name may contain spaces; the file column is the first token
/// after it containing a `/`.
fn parse_voices(output: &str) -> Vec<Voice> {
    let mut voices = Vec::new();
    for line in output.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }
        let language = fields[1];
        let name_end = fields
            .iter()
            .skip(3)
            .position(|f| f.contains('/'))
            .map(|i| i + 3)
            .unwrap_or(fields.len());
        let name = fields[3..name_end].join(" ");
        if name.is_empty() {
            continue;
        }
        voices.push(Voice {
            // `-v` accepts the language code, which is unique per row.
            id: language.to_string(),
            name,
            language: language.to_string(),
        });
    }
    voices
}
