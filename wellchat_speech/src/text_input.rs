use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::warn;
use wellchat_core::{CaptureError, InputSource};

/// Keyboard input, one line per prompt.
///
/// Reads asynchronously so a pending prompt can be abandoned on Ctrl-C.
pub struct TextInput<R> {
    reader: R,
}

impl TextInput<BufReader<Stdin>> {
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> TextInput<R> {
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> InputSource for TextInput<R> {
    async fn capture(&mut self) -> Result<Option<String>, CaptureError> {
        print!("Prompt: ");
        if let Err(e) = std::io::stdout().flush() {
            warn!("Failed to flush stdout: {e}");
        }

        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line).await {
            Ok(0) => Err(CaptureError::InputClosed),
            Ok(_) => {
                let Ok(line) = String::from_utf8(line) else {
                    warn!("Ignoring prompt that is not valid UTF-8");
                    return Ok(None);
                };
                let prompt = line.trim().to_lowercase();
                Ok((!prompt.is_empty()).then_some(prompt))
            }
            Err(e) => {
                warn!("Failed to read prompt: {e}");
                Err(CaptureError::InputClosed)
            }
        }
    }
}
