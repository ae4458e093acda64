use tracing::info;

use super::{build_recognizer, build_speaker, init_common_components, start_session};

/// Input parameters for the Voice command strategy.
#[derive(Debug, Clone)]
pub struct VoiceInput {
    /// Optional model override
    pub model: Option<String>,
    /// Skip speech output
    pub mute: bool,
}

/// Strategy for spoken conversation.
///
/// Same session handling as `chat`, with prompts captured by the configured
/// recognizer command instead of the keyboard. Ctrl-C ends the session.
#[derive(Debug, Clone, Copy)]
pub struct VoiceStrategy;

impl super::CommandStrategy for VoiceStrategy {
    type Input = VoiceInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;
        let mut recognizer = build_recognizer(&common.config)?;

        let (config, mut manager) = start_session(common, input.model).await?;
        let speaker = build_speaker(&config, input.mute);

        let turns = manager
            .run_interactive(&mut recognizer, speaker.as_ref())
            .await?;
        info!("Voice chat finished after {turns} turns");

        manager.finish()?;
        Ok(())
    }
}
