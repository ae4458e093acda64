//! Conversation manager for a primed, token-bounded session.
//!
//! The `ConversationManager` is the main entry point: it owns the session
//! history, mediates every backend call, and writes the transcript exactly
//! once when it is finished or dropped.

use std::ops::ControlFlow;

use crate::history::{EvictionPolicy, HistoryStats};
use crate::session::ConversationSession;
use crate::transcript::TranscriptLog;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use wellchat_core::prompts::{
    DEFAULT_PRIMING_PROMPT, DEFAULT_SYSTEM_PROMPT, WELLBEING_PHRASE, WELLBEING_PROMPT,
};
use wellchat_core::{CaptureError, InputSource, LLMProvider, LLMResponse, Role, SpeechSink};

const EXIT_WORDS: [&str; 4] = ["exit", "quit", "q", "goodbye"];

/// Configuration for conversation management.
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    /// Session identifier, used in logs
    pub session_id: Uuid,
    /// Model to use for completions
    pub model: String,
    /// First priming message (system role)
    pub system_prompt: String,
    /// Second priming message (user role)
    pub priming_prompt: String,
    /// Cap on generated reply length
    pub max_response_tokens: u32,
    pub eviction: EvictionPolicy,
    /// Synthetic prompt sent by the well-being check
    pub wellbeing_prompt: String,
    /// Input that triggers the well-being check in `run_interactive`
    pub wellbeing_phrase: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            session_id: Uuid::now_v7(),
            model: "gpt-3.5-turbo".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            priming_prompt: DEFAULT_PRIMING_PROMPT.to_string(),
            max_response_tokens: 100,
            eviction: EvictionPolicy::default(),
            wellbeing_prompt: WELLBEING_PROMPT.to_string(),
            wellbeing_phrase: WELLBEING_PHRASE.to_string(),
        }
    }
}

impl ConversationConfig {
    #[must_use]
    pub const fn with_session_id(mut self, id: Uuid) -> Self {
        self.session_id = id;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Set both priming messages.
    #[must_use]
    pub fn with_priming(mut self, system_prompt: String, priming_prompt: String) -> Self {
        self.system_prompt = system_prompt;
        self.priming_prompt = priming_prompt;
        self
    }

    #[must_use]
    pub const fn with_max_response_tokens(mut self, cap: u32) -> Self {
        self.max_response_tokens = cap;
        self
    }

    #[must_use]
    pub const fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = eviction;
        self
    }

    #[must_use]
    pub fn with_wellbeing(mut self, prompt: String, phrase: String) -> Self {
        self.wellbeing_prompt = prompt;
        self.wellbeing_phrase = phrase;
        self
    }
}

/// Errors that can occur during conversation management.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("Completion backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Transcript write failed: {0}")]
    Transcript(#[from] std::io::Error),
}

/// What a captured prompt asks the interactive loop to do.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Exit,
    Wellbeing,
    Prompt(&'a str),
}

fn classify<'a>(prompt: &'a str, wellbeing_phrase: &str) -> Command<'a> {
    let normalized = prompt
        .trim()
        .trim_end_matches(['.', '!', '?'])
        .to_lowercase();

    if EXIT_WORDS.contains(&normalized.as_str()) {
        Command::Exit
    } else if !wellbeing_phrase.is_empty() && normalized == wellbeing_phrase.trim().to_lowercase()
    {
        Command::Wellbeing
    } else {
        Command::Prompt(prompt)
    }
}

/// Multi-turn conversation manager.
///
/// Holds the priming prefix plus every turn since, evicting the oldest pairs
/// once the backend reports more tokens than the configured limit.
pub struct ConversationManager<P> {
    provider: P,
    config: ConversationConfig,
    session: ConversationSession,
    transcript: TranscriptLog,
    persisted: bool,
    last_total_tokens: Option<u32>,
    turns_completed: usize,
}

impl<P: LLMProvider> ConversationManager<P> {
    /// Prime a new session and send the warm-up request.
    ///
    /// The warm-up reply is logged and discarded; the history stays at the
    /// two priming messages. A backend failure here aborts session start,
    /// though the priming prefix is still written to the transcript.
    pub async fn initialize(
        provider: P,
        config: ConversationConfig,
        transcript: TranscriptLog,
    ) -> Result<Self, ConversationError> {
        if config.max_response_tokens == 0 {
            return Err(ConversationError::InvalidConfig(
                "max_response_tokens must be greater than 0".to_string(),
            ));
        }

        info!(
            "Creating conversation manager for session: {}",
            config.session_id
        );

        let session = ConversationSession::primed(&config.system_prompt, &config.priming_prompt)
            .with_id(config.session_id);

        let mut manager = Self {
            provider,
            config,
            session,
            transcript,
            persisted: false,
            last_total_tokens: None,
            turns_completed: 0,
        };

        let warm_up = manager.request().await?;
        manager.last_total_tokens = Some(warm_up.total_tokens());
        info!("Initial response: {}", warm_up.content);

        Ok(manager)
    }

    /// Process a single conversation turn.
    ///
    /// Returns `Ok(None)` without touching the history when `prompt` is
    /// missing or empty. On backend failure the user message stays appended.
    pub async fn submit_turn(
        &mut self,
        prompt: Option<&str>,
    ) -> Result<Option<String>, ConversationError> {
        let Some(prompt) = prompt.filter(|p| !p.is_empty()) else {
            info!("No prompt given.");
            return Ok(None);
        };

        let turn_number = self.turns_completed + 1;
        info!(
            "Processing turn {turn_number} for session: {}",
            self.session.id
        );

        self.session.add_message(Role::User, prompt);

        let response = self.request().await?;

        if response.usage.is_none() {
            warn!("Backend reported no token usage, assuming 0");
        }
        let total_tokens = response.total_tokens();
        debug!("Total tokens used: {total_tokens}");
        self.last_total_tokens = Some(total_tokens);

        // The overflow measured on this request trims history before the
        // reply lands, so the reply itself always stays.
        if self.config.eviction.should_evict(total_tokens) {
            self.evict(self.config.eviction.clear_pairs);
        }

        self.session
            .add_message(Role::Assistant, response.content.clone());
        self.turns_completed = turn_number;

        debug!("Turn {turn_number} completed successfully");
        Ok(Some(response.content))
    }

    /// Drop up to `pair_count` of the oldest user/assistant pairs after the
    /// priming prefix. Returns the number of messages removed.
    pub fn evict(&mut self, pair_count: usize) -> usize {
        let removed = self.session.evict_pairs(pair_count);
        info!(
            "Evicted {removed} messages ({pair_count} pairs requested), {} remain",
            self.session.message_count()
        );
        removed
    }

    /// Ask the backend to check in on the user and speak the answer.
    pub async fn check_wellbeing<S>(
        &mut self,
        sink: &S,
    ) -> Result<Option<String>, ConversationError>
    where
        S: SpeechSink + ?Sized,
    {
        info!("Running well-being check");
        let prompt = self.config.wellbeing_prompt.clone();
        let response = self.submit_turn(Some(&prompt)).await?;
        if let Some(text) = &response {
            speak(sink, text).await;
        }
        Ok(response)
    }

    /// Run an interactive conversation loop until exit, end of input or
    /// Ctrl-C.
    ///
    /// Prompts come from `input`; replies are printed and rendered through
    /// `sink`. Capture and backend errors are reported and the loop carries
    /// on. Returns the number of completed turns.
    pub async fn run_interactive<I, S>(
        &mut self,
        input: &mut I,
        sink: &S,
    ) -> Result<usize, ConversationError>
    where
        I: InputSource + ?Sized,
        S: SpeechSink + ?Sized,
    {
        self.run_until(input, sink, interrupted()).await
    }

    /// Same as [`Self::run_interactive`], but stops as soon as `shutdown`
    /// resolves. A capture or turn in flight at that point is abandoned.
    pub async fn run_until<I, S, F>(
        &mut self,
        input: &mut I,
        sink: &S,
        shutdown: F,
    ) -> Result<usize, ConversationError>
    where
        I: InputSource + ?Sized,
        S: SpeechSink + ?Sized,
        F: Future<Output = ()>,
    {
        println!("=== Conversation Session: {} ===", self.session.id);
        println!(
            "Say 'exit' to end the session, or '{}' for a well-being check.\n",
            self.config.wellbeing_phrase
        );

        let session_id = self.session.id;
        tokio::pin!(shutdown);
        loop {
            let step = tokio::select! {
                () = &mut shutdown => {
                    info!("Interrupted, ending session {session_id}");
                    break;
                }
                step = self.step(input, sink) => step,
            };
            if step.is_break() {
                break;
            }
        }

        println!("\nSession ended. Total turns: {}", self.turns_completed);
        Ok(self.turns_completed)
    }

    /// Capture one prompt and act on it.
    async fn step<I, S>(&mut self, input: &mut I, sink: &S) -> ControlFlow<()>
    where
        I: InputSource + ?Sized,
        S: SpeechSink + ?Sized,
    {
        let prompt = match input.capture().await {
            Ok(Some(prompt)) => prompt,
            Ok(None) => return ControlFlow::Continue(()),
            Err(CaptureError::InputClosed) => {
                debug!("Input closed, leaving interactive loop");
                return ControlFlow::Break(());
            }
            Err(e) => {
                println!("{e}.");
                return ControlFlow::Continue(());
            }
        };

        match classify(&prompt, &self.config.wellbeing_phrase) {
            Command::Exit => return ControlFlow::Break(()),
            Command::Wellbeing => {
                report(self.check_wellbeing(sink).await);
            }
            Command::Prompt(text) => {
                if let Some(response) = report(self.submit_turn(Some(text)).await) {
                    speak(sink, &response).await;
                }
            }
        }
        ControlFlow::Continue(())
    }

    async fn request(&self) -> Result<LLMResponse, ConversationError> {
        self.provider
            .chat(
                self.session.messages(),
                &self.config.model,
                self.config.max_response_tokens,
            )
            .await
            .map_err(|e| {
                warn!("Completion request failed: {e}");
                ConversationError::BackendUnavailable(e.to_string())
            })
    }
}

impl<P> ConversationManager<P> {
    /// Append the transcript block for this session.
    ///
    /// Only the first call writes; later calls, including the one made on
    /// drop, do nothing.
    pub fn persist(&mut self) -> Result<(), ConversationError> {
        if self.persisted {
            debug!("Transcript for session {} already written", self.session.id);
            return Ok(());
        }
        self.persisted = true;

        if let Err(e) = self.transcript.append(self.session.messages()) {
            error!(
                "Failed to write transcript to {}: {e}",
                self.transcript.path().display()
            );
            return Err(e.into());
        }

        info!(
            "Saved {} messages to {}",
            self.session.message_count(),
            self.transcript.path().display()
        );
        Ok(())
    }

    /// End the session, writing the transcript.
    pub fn finish(mut self) -> Result<(), ConversationError> {
        let stats = self.stats();
        info!(
            "Conversation ended: {} messages ({} user, {} assistant), active {} to {}",
            stats.total_messages,
            stats.user_messages,
            stats.assistant_messages,
            self.session.created_at.to_rfc3339(),
            self.session.updated_at.to_rfc3339()
        );
        self.persist()
    }

    #[must_use]
    pub const fn session(&self) -> &ConversationSession {
        &self.session
    }

    /// Total tokens reported by the most recent completion request.
    #[must_use]
    pub const fn last_total_tokens(&self) -> Option<u32> {
        self.last_total_tokens
    }

    #[must_use]
    pub const fn turns_completed(&self) -> usize {
        self.turns_completed
    }

    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.persisted
    }

    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        HistoryStats::from_messages(self.session.messages())
    }
}

impl<P> Drop for ConversationManager<P> {
    fn drop(&mut self) {
        if self.persisted {
            return;
        }
        if let Err(e) = self.persist() {
            error!("Transcript lost for session {}: {e}", self.session.id);
        }
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

async fn speak<S: SpeechSink + ?Sized>(sink: &S, text: &str) {
    if let Err(e) = sink.render(text).await {
        warn!("Speech output failed: {e}");
    }
}

fn report(result: Result<Option<String>, ConversationError>) -> Option<String> {
    match result {
        Ok(Some(response)) => {
            println!("\nResponse: {response}\n");
            Some(response)
        }
        Ok(None) => None,
        Err(e) => {
            eprintln!("Error: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ConversationConfig::default();
        assert_eq!(config.max_response_tokens, 100);
        assert_eq!(config.eviction, EvictionPolicy::new(3000, 10));
        assert_eq!(config.wellbeing_prompt, "Ask me the question: Are you okay?");
        assert!(!config.model.is_empty());
    }

    #[test]
    fn test_config_builders() {
        let id = Uuid::now_v7();
        let config = ConversationConfig::default()
            .with_session_id(id)
            .with_model("gpt-4o-mini".to_string())
            .with_priming("sys".to_string(), "hi".to_string())
            .with_max_response_tokens(42)
            .with_eviction(EvictionPolicy::new(10, 1));

        assert_eq!(config.session_id, id);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.system_prompt, "sys");
        assert_eq!(config.priming_prompt, "hi");
        assert_eq!(config.max_response_tokens, 42);
        assert_eq!(config.eviction.clear_pairs, 1);
    }

    #[test]
    fn test_classify_exit_words() {
        assert_eq!(classify("exit", "check in"), Command::Exit);
        assert_eq!(classify("Goodbye.", "check in"), Command::Exit);
        assert_eq!(classify("  quit ", "check in"), Command::Exit);
    }

    #[test]
    fn test_classify_wellbeing_phrase() {
        assert_eq!(classify("check in", "check in"), Command::Wellbeing);
        assert_eq!(classify("Check in!", "Check In"), Command::Wellbeing);
        assert_eq!(classify("check in", ""), Command::Prompt("check in"));
    }

    #[test]
    fn test_classify_plain_prompt_is_untouched() {
        assert_eq!(
            classify("what is the weather?", "check in"),
            Command::Prompt("what is the weather?")
        );
    }
}
