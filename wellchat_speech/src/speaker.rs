use async_trait::async_trait;
use tracing::{debug, info};
use wellchat_core::SpeechSink;

use crate::command_runner::{CommandSpec, build_command};

/// Speaks through a text-to-speech program such as `espeak` or `say`.
///
/// The text is passed as the last argument, after a `--` so that replies
/// starting with `-` are not read as options. `render` returns when the
/// program exits, which is when playback has finished.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    #[must_use]
    pub const fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }

    fn spec_for(&self, text: &str) -> CommandSpec {
        CommandSpec::new(self.program.clone(), self.args.clone())
            .with_arg("--")
            .with_arg(text)
    }
}

#[async_trait]
impl SpeechSink for CommandSpeaker {
    async fn render(&self, text: &str) -> anyhow::Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        debug!("Speaking {} chars with {}", text.len(), self.program);
        let output = build_command(&self.spec_for(text))
            .output()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run {}: {e}", self.program))?;

        if !output.status.success() {
            anyhow::bail!(
                "{} exited with code {}: {}",
                self.program,
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

/// Discards speech; used when output is muted.
#[derive(Debug, Default, Clone, Copy)]
pub struct MutedSpeaker;

#[async_trait]
impl SpeechSink for MutedSpeaker {
    async fn render(&self, text: &str) -> anyhow::Result<()> {
        if !text.is_empty() {
            info!("Speech muted, skipping {} chars", text.len());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_text_is_noop() {
        let speaker = CommandSpeaker::new("definitely-not-a-real-tts-binary".to_string(), vec![]);
        assert!(speaker.render("").await.is_ok());
        assert!(speaker.render("   ").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_program_is_error() {
        let speaker = CommandSpeaker::new("definitely-not-a-real-tts-binary".to_string(), vec![]);
        let err = speaker.render("hello").await.unwrap_err();
        assert!(err.to_string().contains("definitely-not-a-real-tts-binary"));
    }

    #[tokio::test]
    async fn test_successful_program() {
        if cfg!(target_os = "windows") {
            return;
        }
        let speaker = CommandSpeaker::new("echo".to_string(), vec!["-n".to_string()]);
        assert!(speaker.render("hello").await.is_ok());
    }

    #[test]
    fn test_text_is_last_argument() {
        let speaker = CommandSpeaker::new(
            "espeak".to_string(),
            vec!["-s".to_string(), "140".to_string()],
        );
        let spec = speaker.spec_for("are you okay?");
        assert_eq!(spec.program, "espeak");
        assert_eq!(spec.args, vec!["-s", "140", "--", "are you okay?"]);
    }

    #[test]
    fn test_leading_dash_text_follows_separator() {
        let speaker = CommandSpeaker::new("espeak".to_string(), vec![]);
        let spec = speaker.spec_for("-5 degrees today");
        assert_eq!(spec.args, vec!["--", "-5 degrees today"]);
    }

    #[tokio::test]
    async fn test_muted_speaker_accepts_anything() {
        assert!(MutedSpeaker.render("hello").await.is_ok());
        assert!(MutedSpeaker.render("").await.is_ok());
    }
}
