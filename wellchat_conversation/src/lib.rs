#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Bounded multi-turn conversation with a fixed priming prefix.
//!
//! The `ConversationManager` owns the message history for one session. It
//! appends turns, watches the token total reported by the backend, drops the
//! oldest user/assistant pairs once that total passes the limit, and appends
//! a transcript block to the conversation log when the session ends.

mod history;
mod manager;
mod session;
mod transcript;

pub use history::{EvictionPolicy, HistoryStats};
pub use manager::{ConversationConfig, ConversationError, ConversationManager};
pub use session::{ConversationSession, PRIMING_PREFIX_LEN};
pub use transcript::{TRANSCRIPT_END, TRANSCRIPT_START, TranscriptLog};
