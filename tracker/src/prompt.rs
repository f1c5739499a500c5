use std::collections::VecDeque;
use std::io::{IsTerminal, Write};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented dialogs. Every method blocks the caller until the user
/// answered.
#[async_trait]
pub trait Prompt: Send {
    /// The next raw input line, `None` once input is exhausted.
    async fn next_line(&mut self) -> Option<String>;

    fn show(&mut self, text: &str);

    /// Replace the one-line status (title and elapsed time). Called every
    /// second while the shell is open.
    fn status(&mut self, _text: &str) {}

    /// Ask for a line of text. An empty answer yields `default` (or an empty
    /// string); `None` means the user cancelled.
    async fn ask_line(&mut self, message: &str, default: Option<&str>) -> Option<String> {
        match default {
            Some(default) if !default.is_empty() => {
                self.show(&format!("{} [{}]", message, default))
            }
            _ => self.show(message),
        }

        let line = self.next_line().await?;
        let line = line.trim();
        if line.is_empty() {
            Some(default.unwrap_or_default().to_string())
        } else {
            Some(line.to_string())
        }
    }

    /// Ask for a value that must not be echoed, such as an API token.
    async fn ask_secret(&mut self, message: &str) -> Option<String> {
        self.ask_line(message, None).await
    }

    async fn confirm(&mut self, message: &str) -> bool {
        self.show(&format!("{} [y/N]", message));
        matches!(
            self.next_line().await.as_deref().map(str::trim),
            Some("y" | "Y" | "yes" | "Yes")
        )
    }

    fn alert(&mut self, title: &str, message: &str) {
        self.show(&format!("{}: {}", title, message));
    }
}

/// Prompt on stdin/stdout.
pub struct TerminalPrompt {
    lines: Lines<BufReader<Stdin>>,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prompt for TerminalPrompt {
    async fn next_line(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read from stdin");
                None
            }
        }
    }

    fn show(&mut self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", text);
        let _ = stdout.flush();
    }

    async fn ask_secret(&mut self, message: &str) -> Option<String> {
        if !std::io::stdin().is_terminal() {
            return self.ask_line(message, None).await;
        }

        let message = format!("{}\n> ", message);
        match tokio::task::spawn_blocking(move || rpassword::prompt_password(message)).await {
            Ok(Ok(secret)) => Some(secret.trim().to_string()),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Failed to read hidden input");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Hidden input task failed");
                None
            }
        }
    }

    fn status(&mut self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        if stdout.is_terminal() {
            // Terminal window title, the closest thing to a menu bar title.
            let _ = write!(stdout, "\x1b]0;{}\x07", text);
            let _ = stdout.flush();
        }
    }
}

/// Answers from a fixed script and captures everything shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    shown: Vec<String>,
    secrets: Vec<String>,
    status: Option<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            shown: Vec::new(),
            secrets: Vec::new(),
            status: None,
        }
    }

    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    pub fn saw(&self, needle: &str) -> bool {
        self.shown.iter().any(|line| line.contains(needle))
    }

    /// Whether a question containing `needle` was asked as hidden input.
    pub fn asked_secret(&self, needle: &str) -> bool {
        self.secrets.iter().any(|message| message.contains(needle))
    }

    pub fn last_status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn next_line(&mut self) -> Option<String> {
        self.answers.pop_front()
    }

    async fn ask_secret(&mut self, message: &str) -> Option<String> {
        self.secrets.push(message.to_string());
        self.ask_line(message, None).await
    }

    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }

    fn status(&mut self, text: &str) {
        self.status = Some(text.to_string());
    }
}
