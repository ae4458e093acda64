#![deny(
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

//! Prompt capture and speech output adapters.
//!
//! Both sides shell out to external programs so the conversation core
//! never links an audio stack directly.

pub mod command_runner;
pub mod recognizer;
pub mod speaker;
pub mod text_input;

pub use recognizer::CommandRecognizer;
pub use speaker::{CommandSpeaker, MutedSpeaker};
pub use text_input::TextInput;
