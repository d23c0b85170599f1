use std::path::PathBuf;

use thiserror::Error;

/// Result type for audio setup
pub type Result<T> = std::result::Result<T, AudioError>;

/// Failures while bringing up audio output. Once players exist, commands
/// to them never fail.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Built without the `audio` feature
    #[error("audio output not compiled in (rebuild with --features audio)")]
    Unavailable,

    #[error("no audio output device found")]
    DeviceNotFound,

    #[error("audio device error: {0}")]
    Device(String),

    #[error("failed to build output stream: {0}")]
    StreamBuild(String),

    #[error("failed to start output stream: {0}")]
    Play(String),

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("resampling failed: {0}")]
    Resample(String),

    #[error("audio thread exited before the stream was ready")]
    ThreadGone,
}

#[cfg(feature = "audio")]
impl From<cpal::BuildStreamError> for AudioError {
    fn from(err: cpal::BuildStreamError) -> Self {
        AudioError::StreamBuild(err.to_string())
    }
}

#[cfg(feature = "audio")]
impl From<cpal::PlayStreamError> for AudioError {
    fn from(err: cpal::PlayStreamError) -> Self {
        AudioError::Play(err.to_string())
    }
}

#[cfg(feature = "audio")]
impl From<cpal::DefaultStreamConfigError> for AudioError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        AudioError::Device(err.to_string())
    }
}
