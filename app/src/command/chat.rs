//! Typed conversation, interactive or single-message.

use tracing::{info, warn};
use wellchat_core::SpeechSink;
use wellchat_speech::TextInput;

use super::{build_speaker, init_common_components, start_session};

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Optional model override
    pub model: Option<String>,
    /// Skip speech output
    pub mute: bool,
}

/// Strategy for executing the Chat command.
///
/// Primes a session, then either sends one message or reads prompts from
/// the keyboard until `exit`, end of input or Ctrl-C. The transcript is
/// written when the session ends, whichever way it ends.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;
        let (config, mut manager) = start_session(common, input.model).await?;
        let speaker = build_speaker(&config, input.mute);

        if let Some(msg) = input.message {
            if let Some(response) = manager.submit_turn(Some(msg.trim())).await? {
                println!("{response}");
                if let Err(e) = speaker.render(&response).await {
                    warn!("Speech output failed: {e}");
                }
            }
        } else {
            let mut text_input = TextInput::stdin();
            let turns = manager
                .run_interactive(&mut text_input, speaker.as_ref())
                .await?;
            info!("Interactive chat finished after {turns} turns");
        }

        manager.finish()?;
        Ok(())
    }
}
