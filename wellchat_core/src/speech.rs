//! Collaborator traits for prompt capture and spoken output.

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced while capturing a prompt.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No speech detected")]
    RecognitionTimeout,

    #[error("Could not request results: {0}")]
    RecognitionServiceError(String),

    #[error("Input closed")]
    InputClosed,
}

/// Produces one prompt per call, from the keyboard or a recognizer.
///
/// `Ok(None)` means nothing usable was captured this round.
#[async_trait]
pub trait InputSource: Send {
    async fn capture(&mut self) -> Result<Option<String>, CaptureError>;
}

/// Renders text audibly, returning once playback has finished.
#[async_trait]
pub trait SpeechSink: Send + Sync {
    async fn render(&self, text: &str) -> anyhow::Result<()>;
}
