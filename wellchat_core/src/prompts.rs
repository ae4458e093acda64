//! Default priming and well-being prompts.

/// System message that sets the assistant's character.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a warm, patient companion for an older person living on their own. Speak plainly, keep every reply to two or three short sentences, and gently ask follow-up questions about how they are feeling.";

/// First user message of every session, sent together with the system prompt.
pub const DEFAULT_PRIMING_PROMPT: &str = "Hello. Please greet me briefly and remember to keep your answers short, because they will be read aloud.";

/// Synthetic prompt used for the well-being check.
pub const WELLBEING_PROMPT: &str = "Ask me the question: Are you okay?";

/// Phrase that triggers the well-being check in an interactive session.
pub const WELLBEING_PHRASE: &str = "check in";
