//! Append-only conversation log.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use wellchat_core::ChatMessage;

pub const TRANSCRIPT_START: &str = "Start of Conversation.";
pub const TRANSCRIPT_END: &str = "End of Conversation.";

/// Text file that receives one delimited block per session.
///
/// The file is created on first write. Its directory is not.
#[derive(Debug, Clone)]
pub struct TranscriptLog {
    path: PathBuf,
}

impl TranscriptLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn render_block(messages: &[ChatMessage]) -> String {
        let body: usize = messages.iter().map(|m| m.content.len() + 24).sum();
        let mut block = String::with_capacity(64 + body);
        block.push_str(TRANSCRIPT_START);
        block.push('\n');
        for message in messages {
            block.push_str(&message.to_string());
            block.push('\n');
        }
        block.push_str(TRANSCRIPT_END);
        block.push_str("\n\n");
        block
    }

    pub fn append(&self, messages: &[ChatMessage]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(Self::render_block(messages).as_bytes())?;
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_block() {
        let block = TranscriptLog::render_block(&[
            ChatMessage::system("be kind"),
            ChatMessage::user("hello"),
        ]);

        assert_eq!(
            block,
            "Start of Conversation.\n{role: system, content: be kind}\n{role: user, content: hello}\nEnd of Conversation.\n\n"
        );
    }

    #[test]
    fn test_append_keeps_previous_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let log = TranscriptLog::new(dir.path().join("conversation.txt"));

        log.append(&[ChatMessage::user("first")]).unwrap();
        log.append(&[ChatMessage::user("second")]).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.matches(TRANSCRIPT_START).count(), 2);
        assert!(content.find("first").unwrap() < content.find("second").unwrap());
    }

    #[test]
    fn test_missing_directory_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let log = TranscriptLog::new(dir.path().join("missing").join("conversation.txt"));

        assert!(log.append(&[ChatMessage::user("hello")]).is_err());
        assert!(!dir.path().join("missing").exists());
    }
}
