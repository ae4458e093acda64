use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use wellchat_core::prompts::{
    DEFAULT_PRIMING_PROMPT, DEFAULT_SYSTEM_PROMPT, WELLBEING_PHRASE, WELLBEING_PROMPT,
};

const CONFIG_DIR_NAME: &str = "wellchat";
const CONFIG_FILE_NAME: &str = "config.json";
const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantConfig,
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub transcript: TranscriptConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssistantConfig {
    #[serde(default = "AssistantConfig::default_model")]
    pub model: String,
    /// Cap on generated reply length.
    #[serde(default = "AssistantConfig::default_max_response_tokens")]
    pub max_response_tokens: u32,
    /// Reported total above which old turns are evicted.
    #[serde(default = "AssistantConfig::default_token_limit")]
    pub token_limit: u32,
    /// User/assistant pairs removed per eviction.
    #[serde(default = "AssistantConfig::default_clear_pairs")]
    pub clear_pairs: usize,
    #[serde(default = "AssistantConfig::default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "AssistantConfig::default_priming_prompt")]
    pub priming_prompt: String,
    #[serde(default = "AssistantConfig::default_wellbeing_prompt")]
    pub wellbeing_prompt: String,
    #[serde(default = "AssistantConfig::default_wellbeing_phrase")]
    pub wellbeing_phrase: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
            max_response_tokens: Self::default_max_response_tokens(),
            token_limit: Self::default_token_limit(),
            clear_pairs: Self::default_clear_pairs(),
            system_prompt: Self::default_system_prompt(),
            priming_prompt: Self::default_priming_prompt(),
            wellbeing_prompt: Self::default_wellbeing_prompt(),
            wellbeing_phrase: Self::default_wellbeing_phrase(),
        }
    }
}

impl AssistantConfig {
    fn default_model() -> String {
        "gpt-3.5-turbo".to_string()
    }

    const fn default_max_response_tokens() -> u32 {
        100
    }

    const fn default_token_limit() -> u32 {
        3000
    }

    const fn default_clear_pairs() -> usize {
        10
    }

    fn default_system_prompt() -> String {
        DEFAULT_SYSTEM_PROMPT.to_string()
    }

    fn default_priming_prompt() -> String {
        DEFAULT_PRIMING_PROMPT.to_string()
    }

    fn default_wellbeing_prompt() -> String {
        WELLBEING_PROMPT.to_string()
    }

    fn default_wellbeing_phrase() -> String {
        WELLBEING_PHRASE.to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub openai: ProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TranscriptConfig {
    /// Must already exist; it is never created.
    #[serde(default = "TranscriptConfig::default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "TranscriptConfig::default_file_name")]
    pub file_name: String,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            log_dir: Self::default_log_dir(),
            file_name: Self::default_file_name(),
        }
    }
}

impl TranscriptConfig {
    fn default_log_dir() -> PathBuf {
        PathBuf::from("conversation_log")
    }

    fn default_file_name() -> String {
        "conversation.txt".to_string()
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.log_dir.join(&self.file_name)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SpeechConfig {
    #[serde(default = "SpeechConfig::default_tts_program")]
    pub tts_program: String,
    #[serde(default)]
    pub tts_args: Vec<String>,
    /// Shell command that listens once and prints the transcript on stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognizer_command: Option<String>,
    #[serde(default = "SpeechConfig::default_listen_timeout_secs")]
    pub listen_timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            tts_program: Self::default_tts_program(),
            tts_args: Vec::new(),
            recognizer_command: None,
            listen_timeout_secs: Self::default_listen_timeout_secs(),
        }
    }
}

impl SpeechConfig {
    fn default_tts_program() -> String {
        "espeak".to_string()
    }

    const fn default_listen_timeout_secs() -> u64 {
        30
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR_NAME))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'wellchat init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.assistant.max_response_tokens == 0 {
            anyhow::bail!("assistant.max_response_tokens must be greater than 0");
        }
        if self.assistant.clear_pairs == 0 {
            anyhow::bail!("assistant.clear_pairs must be greater than 0");
        }
        if self.speech.listen_timeout_secs == 0 {
            anyhow::bail!("speech.listen_timeout_secs must be greater than 0");
        }
        Ok(())
    }

    /// API key from the config file, falling back to `OPENAI_API_KEY`.
    pub fn api_key(&self) -> anyhow::Result<String> {
        let key = self.providers.openai.api_key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("No API key: set providers.openai.api_key or {API_KEY_ENV}")
            })
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, Self::template()?)?;

        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Next steps:");
        println!("   1. Add your API key (or export {API_KEY_ENV})");
        println!("   2. Create the transcript directory: mkdir conversation_log");
        println!("   3. Run 'wellchat chat' to start a conversation");
        println!();
        println!("Configuration options:");
        println!("   - max_response_tokens: cap on each reply");
        println!("   - token_limit / clear_pairs: when and how much history is dropped");
        println!("   - speech.recognizer_command: command used by 'wellchat voice'");
        println!();
        Ok(())
    }

    /// Default config document written by `wellchat init`.
    pub fn template() -> anyhow::Result<String> {
        let config = Self {
            assistant: AssistantConfig::default(),
            providers: ProvidersConfig {
                openai: ProviderConfig {
                    api_key: "your-openai-api-key-here".to_string(),
                    base_url: Some("https://api.openai.com/v1".to_string()),
                },
            },
            transcript: TranscriptConfig::default(),
            speech: SpeechConfig::default(),
        };
        Ok(serde_json::to_string_pretty(&config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_json(r#"{"providers": {"openai": {"api_key": "sk-test"}}}"#)
            .unwrap();

        assert_eq!(config.assistant.model, "gpt-3.5-turbo");
        assert_eq!(config.assistant.max_response_tokens, 100);
        assert_eq!(config.assistant.token_limit, 3000);
        assert_eq!(config.assistant.clear_pairs, 10);
        assert_eq!(config.assistant.wellbeing_prompt, WELLBEING_PROMPT);
        assert_eq!(
            config.transcript.path(),
            PathBuf::from("conversation_log").join("conversation.txt")
        );
        assert_eq!(config.speech.tts_program, "espeak");
        assert!(config.speech.recognizer_command.is_none());
    }

    #[test]
    fn template_round_trips_through_loader() {
        let template = Config::template().unwrap();
        let config = Config::from_json(&template).unwrap();
        assert_eq!(config.providers.openai.api_key, "your-openai-api-key-here");
        assert_eq!(
            config.providers.openai.base_url.as_deref(),
            Some("https://api.openai.com/v1")
        );
    }

    #[test]
    fn zero_response_cap_is_rejected() {
        let result = Config::from_json(
            r#"{"assistant": {"max_response_tokens": 0}, "providers": {"openai": {}}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_clear_pairs_is_rejected() {
        let result =
            Config::from_json(r#"{"assistant": {"clear_pairs": 0}, "providers": {"openai": {}}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn configured_api_key_wins() {
        let config =
            Config::from_json(r#"{"providers": {"openai": {"api_key": "  sk-file  "}}}"#).unwrap();
        assert_eq!(config.api_key().unwrap(), "sk-file");
    }
}
