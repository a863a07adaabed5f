//! Profile picture capture.
//!
//! # Responsibility
//! - Abstract the platform file picker behind `ImagePicker`.
//! - Read a picked file off the caller's thread and encode it as a base64
//!   `data:image/...` URI.
//!
//! # Invariants
//! - Every task delivers exactly one outcome.
//! - Dropping a task abandons its result; the worker finishes harmlessly.
//! - Only image payloads are encoded; the MIME type comes from content first.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// Platform facility that lets the user choose one image file.
pub trait ImagePicker {
    /// Returns the chosen file, or `None` when the user dismissed the picker.
    fn pick_image(&mut self) -> Option<PathBuf>;
}

/// Picker that always yields a fixed path. Used by non-interactive front ends.
#[derive(Debug, Clone, Default)]
pub struct FixedPathPicker {
    path: Option<PathBuf>,
}

impl FixedPathPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn dismissed() -> Self {
        Self { path: None }
    }
}

impl ImagePicker for FixedPathPicker {
    fn pick_image(&mut self) -> Option<PathBuf> {
        self.path.take()
    }
}

#[derive(Debug)]
pub enum CaptureError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    EmptyFile(PathBuf),
    NotAnImage(PathBuf),
    /// The worker exited without delivering an outcome.
    WorkerLost,
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read image `{}`: {source}", path.display())
            }
            Self::EmptyFile(path) => write!(f, "image file `{}` is empty", path.display()),
            Self::NotAnImage(path) => write!(f, "`{}` is not a supported image", path.display()),
            Self::WorkerLost => write!(f, "image capture worker exited without a result"),
        }
    }
}

impl Error for CaptureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Detects an image MIME type from magic bytes, falling back to the extension.
pub fn sniff_image_mime(bytes: &[u8], path: &Path) -> Option<&'static str> {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"BM", "image/bmp"),
    ];

    if let Some((_, mime)) = SIGNATURES.iter().find(|(magic, _)| bytes.starts_with(magic)) {
        return Some(*mime);
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Encodes `bytes` as a `data:<mime>;base64,...` URI.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Reads `path` and returns it as an image data URI.
pub fn read_image_as_data_uri(path: &Path) -> Result<String, CaptureError> {
    let bytes = std::fs::read(path).map_err(|source| CaptureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(CaptureError::EmptyFile(path.to_path_buf()));
    }
    let mime =
        sniff_image_mime(&bytes, path).ok_or_else(|| CaptureError::NotAnImage(path.to_path_buf()))?;
    debug!(
        "event=image_capture module=capture status=encoded mime={} bytes={}",
        mime,
        bytes.len()
    );
    Ok(encode_data_uri(mime, &bytes))
}

/// Single-shot background read+encode, tagged with the owner's generation.
#[derive(Debug)]
pub struct ImageCaptureTask {
    generation: u64,
    receiver: Receiver<Result<String, CaptureError>>,
}

impl ImageCaptureTask {
    /// Starts reading `path` on a worker thread.
    pub fn spawn(path: PathBuf, generation: u64) -> Self {
        let (sender, receiver) = mpsc::channel();
        let worker_sender = sender.clone();
        let spawned = std::thread::Builder::new()
            .name("image-capture".to_string())
            .spawn(move || {
                // The receiver may already be gone if the form was closed.
                let _ = worker_sender.send(read_image_as_data_uri(&path));
            });

        if let Err(err) = spawned {
            warn!(
                "event=image_capture module=capture status=error error_code=spawn_failed error={}",
                err
            );
            let _ = sender.send(Err(CaptureError::WorkerLost));
        }

        Self {
            generation,
            receiver,
        }
    }

    /// Generation of the form draft this task was started for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the outcome if the worker has finished.
    pub fn try_take(&self) -> Option<Result<String, CaptureError>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CaptureError::WorkerLost)),
        }
    }

    /// Blocks until the worker delivers its outcome.
    pub fn wait(self) -> Result<String, CaptureError> {
        self.receiver
            .recv()
            .unwrap_or(Err(CaptureError::WorkerLost))
    }
}
