use wellchat_config::Config;

/// Strategy for displaying configuration information.
///
/// Prints the effective configuration with the API key masked, and whether
/// the transcript directory exists.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== wellchat Configuration ===\n");

        println!("Provider:");
        match config.api_key() {
            Ok(key) => println!("  API Key: {}", mask_api_key(&key)),
            Err(e) => println!("  API Key: missing ({e})"),
        }
        println!(
            "  Base URL: {}",
            config
                .providers
                .openai
                .base_url
                .as_deref()
                .unwrap_or(wellchat_providers::DEFAULT_BASE_URL)
        );
        println!();

        let assistant = &config.assistant;
        println!("Assistant:");
        println!("  Model: {}", assistant.model);
        println!("  Max Response Tokens: {}", assistant.max_response_tokens);
        println!("  Token Limit: {}", assistant.token_limit);
        println!("  Clear Pairs: {}", assistant.clear_pairs);
        println!("  Well-being Phrase: {}", assistant.wellbeing_phrase);
        println!();

        let transcript_path = config.transcript.path();
        println!("Transcript:");
        println!("  Path: {}", transcript_path.display());
        if config.transcript.log_dir.is_dir() {
            println!("  Directory: present");
        } else {
            println!("  Directory: missing (create it before chatting)");
        }
        println!();

        println!("Speech:");
        println!(
            "  TTS: {} {}",
            config.speech.tts_program,
            config.speech.tts_args.join(" ")
        );
        println!(
            "  Recognizer: {}",
            config
                .speech
                .recognizer_command
                .as_deref()
                .unwrap_or("(not set, voice mode disabled)")
        );
        println!("  Listen Timeout: {}s", config.speech.listen_timeout_secs);

        Ok(())
    }
}

fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}
