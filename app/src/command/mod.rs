//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use std::time::Duration;

use tracing::info;
use uuid::Uuid;
use wellchat_config::Config;
use wellchat_conversation::{
    ConversationConfig, ConversationManager, EvictionPolicy, TranscriptLog,
};
use wellchat_core::SpeechSink;
use wellchat_providers::OpenAiProvider;
use wellchat_speech::{CommandRecognizer, CommandSpeaker, MutedSpeaker};

mod chat;
mod info;
mod init;
mod version;
mod voice;
mod wellbeing;

pub use chat::{ChatInput, ChatStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;
pub use voice::{VoiceInput, VoiceStrategy};
pub use wellbeing::{WellbeingInput, WellbeingStrategy};

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type via the associated type, so
/// adding a command only requires a new implementation of this trait.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Everything a conversation command needs before priming the session.
struct CommonComponents {
    config: Config,
    provider: OpenAiProvider,
}

fn init_common_components() -> anyhow::Result<CommonComponents> {
    let config = Config::load()?;
    info!("Loaded config from {}", Config::config_path()?.display());

    let mut provider = OpenAiProvider::new(config.api_key()?);
    if let Some(base_url) = &config.providers.openai.base_url {
        provider = provider.with_base_url(base_url.clone());
    }

    Ok(CommonComponents { config, provider })
}

fn build_conversation_config(config: &Config, model: Option<String>) -> ConversationConfig {
    let assistant = &config.assistant;
    ConversationConfig::default()
        .with_session_id(Uuid::now_v7())
        .with_model(model.unwrap_or_else(|| assistant.model.clone()))
        .with_priming(
            assistant.system_prompt.clone(),
            assistant.priming_prompt.clone(),
        )
        .with_max_response_tokens(assistant.max_response_tokens)
        .with_eviction(EvictionPolicy::new(
            assistant.token_limit,
            assistant.clear_pairs,
        ))
        .with_wellbeing(
            assistant.wellbeing_prompt.clone(),
            assistant.wellbeing_phrase.clone(),
        )
}

fn build_speaker(config: &Config, mute: bool) -> Box<dyn SpeechSink> {
    if mute {
        Box::new(MutedSpeaker)
    } else {
        Box::new(CommandSpeaker::new(
            config.speech.tts_program.clone(),
            config.speech.tts_args.clone(),
        ))
    }
}

fn build_recognizer(config: &Config) -> anyhow::Result<CommandRecognizer> {
    let command = config
        .speech
        .recognizer_command
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "speech.recognizer_command is not set in {}",
                Config::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "config.json".to_string())
            )
        })?;

    Ok(CommandRecognizer::new(
        command,
        Duration::from_secs(config.speech.listen_timeout_secs),
    ))
}

/// Prime a session; the returned manager writes its transcript when dropped.
async fn start_session(
    common: CommonComponents,
    model: Option<String>,
) -> anyhow::Result<(Config, ConversationManager<OpenAiProvider>)> {
    let CommonComponents { config, provider } = common;
    let conversation_config = build_conversation_config(&config, model);
    let transcript = TranscriptLog::new(config.transcript.path());

    info!(
        "Starting conversation session: {} (model: {})",
        conversation_config.session_id, conversation_config.model
    );

    let manager = ConversationManager::initialize(provider, conversation_config, transcript).await?;
    println!("Assistant initialised.");
    Ok((config, manager))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config::from_json(
            r#"{
                "assistant": {"model": "gpt-4o-mini", "max_response_tokens": 64, "token_limit": 1500, "clear_pairs": 4},
                "providers": {"openai": {"api_key": "sk-test"}},
                "speech": {"recognizer_command": "   "}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_conversation_config_from_file() {
        let conversation = build_conversation_config(&sample_config(), None);
        assert_eq!(conversation.model, "gpt-4o-mini");
        assert_eq!(conversation.max_response_tokens, 64);
        assert_eq!(conversation.eviction, EvictionPolicy::new(1500, 4));
        assert_eq!(
            conversation.wellbeing_prompt,
            "Ask me the question: Are you okay?"
        );
    }

    #[test]
    fn test_model_override() {
        let conversation = build_conversation_config(&sample_config(), Some("other".to_string()));
        assert_eq!(conversation.model, "other");
    }

    #[test]
    fn test_blank_recognizer_command_is_rejected() {
        assert!(build_recognizer(&sample_config()).is_err());
    }
}
