use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use wellchat_core::{CaptureError, InputSource};

use crate::command_runner::{CommandSpec, build_command, shell_command};

/// Speech input through an external recognizer command.
///
/// The command must listen for a single phrase and print its transcript on
/// stdout. Silence is reported as an empty transcript.
pub struct CommandRecognizer {
    spec: CommandSpec,
    listen_timeout: Duration,
}

impl CommandRecognizer {
    #[must_use]
    pub fn new(command: &str, listen_timeout: Duration) -> Self {
        Self {
            spec: shell_command(command),
            listen_timeout,
        }
    }
}

#[async_trait]
impl InputSource for CommandRecognizer {
    async fn capture(&mut self) -> Result<Option<String>, CaptureError> {
        println!("Listening...");

        let result =
            tokio::time::timeout(self.listen_timeout, build_command(&self.spec).output()).await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("Failed to start recognizer: {e}");
                return Err(CaptureError::RecognitionServiceError(e.to_string()));
            }
            Err(_) => {
                warn!(
                    "Recognizer produced nothing within {}s",
                    self.listen_timeout.as_secs()
                );
                return Err(CaptureError::RecognitionTimeout);
            }
        };

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Recognizer exited with code {code}");
            return Err(CaptureError::RecognitionServiceError(format!(
                "exit code {code}: {}",
                stderr.trim()
            )));
        }

        let prompt = String::from_utf8_lossy(&output.stdout).trim().to_lowercase();
        if prompt.is_empty() {
            debug!("Recognizer returned an empty transcript");
            return Err(CaptureError::RecognitionTimeout);
        }

        info!("Speech input captured ({} chars)", prompt.len());
        println!("Speech input: {prompt}");
        Ok(Some(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sleep_command(seconds: u64) -> String {
        if cfg!(target_os = "windows") {
            format!("Start-Sleep -Seconds {seconds}")
        } else {
            format!("sleep {seconds}")
        }
    }

    #[tokio::test]
    async fn test_transcript_is_lowercased() {
        let mut recognizer = CommandRecognizer::new("echo Hello There", Duration::from_secs(5));
        let prompt = recognizer.capture().await.unwrap();
        assert_eq!(prompt.as_deref(), Some("hello there"));
    }

    #[tokio::test]
    async fn test_empty_transcript_is_timeout() {
        let mut recognizer = CommandRecognizer::new("echo", Duration::from_secs(5));
        let result = recognizer.capture().await;
        assert!(matches!(result, Err(CaptureError::RecognitionTimeout)));
    }

    #[tokio::test]
    async fn test_slow_recognizer_times_out() {
        let mut recognizer = CommandRecognizer::new(&sleep_command(10), Duration::from_secs(1));
        let result = recognizer.capture().await;
        assert!(matches!(result, Err(CaptureError::RecognitionTimeout)));
    }

    #[tokio::test]
    async fn test_failing_recognizer_is_service_error() {
        let mut recognizer = CommandRecognizer::new("exit 3", Duration::from_secs(5));
        let result = recognizer.capture().await;
        match result {
            Err(CaptureError::RecognitionServiceError(msg)) => assert!(msg.contains("exit code 3")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
