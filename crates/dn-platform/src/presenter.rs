//! Terminal rendition of the notification popup.
//!
//! Prints the sender and content, then waits for one line of input. An empty
//! line acknowledges; anything else is sent back as the reply.

use std::io::{BufRead, BufReader, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dn_core::ports::{PresentationOutcome, PresenterError, PresenterPort};
use dn_core::Notification;

type Input = Arc<Mutex<Box<dyn BufRead + Send>>>;
type Output = Arc<Mutex<Box<dyn Write + Send>>>;

pub struct TerminalPresenter {
    input: Input,
    output: Output,
}

impl TerminalPresenter {
    pub fn stdio() -> Self {
        Self::with_io(BufReader::new(std::io::stdin()), std::io::stdout())
    }

    pub fn with_io(input: impl BufRead + Send + 'static, output: impl Write + Send + 'static) -> Self {
        Self {
            input: Arc::new(Mutex::new(Box::new(input))),
            output: Arc::new(Mutex::new(Box::new(output))),
        }
    }
}

fn render(notification: &Notification) -> String {
    let sender = if notification.sender.is_empty() {
        "(unknown sender)"
    } else {
        notification.sender.as_str()
    };
    format!(
        "\n=== New notification from {sender} ===\n{}\nReply (Enter to dismiss): ",
        notification.content
    )
}

fn outcome_from_line(line: &str) -> PresentationOutcome {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        PresentationOutcome::acknowledged()
    } else {
        PresentationOutcome::replied(line)
    }
}

fn unavailable(e: impl std::fmt::Display) -> PresenterError {
    PresenterError::Unavailable(e.to_string())
}

#[async_trait]
impl PresenterPort for TerminalPresenter {
    async fn present(&self, notification: &Notification) -> Result<PresentationOutcome, PresenterError> {
        let prompt = render(notification);
        let input = self.input.clone();
        let output = self.output.clone();

        // Reading the terminal blocks, so it runs off the async workers.
        tokio::task::spawn_blocking(move || {
            {
                let mut out = output.lock().map_err(unavailable)?;
                out.write_all(prompt.as_bytes()).map_err(unavailable)?;
                out.flush().map_err(unavailable)?;
            }

            let mut line = String::new();
            let read = input
                .lock()
                .map_err(unavailable)?
                .read_line(&mut line)
                .map_err(unavailable)?;
            if read == 0 {
                return Err(PresenterError::Unavailable("input closed".to_string()));
            }
            Ok(outcome_from_line(&line))
        })
        .await
        .map_err(unavailable)?
    }
}
