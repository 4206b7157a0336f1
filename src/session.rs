use crate::backend::AskResponse;
use crate::error::BackendError;
use crate::events::{Message, Source};

pub const GREETING: &str = "Hi, I'm HealthDialog. I can help you triage symptoms based on clinical guidelines. \
I do NOT replace a doctor or emergency care. What's going on today?";

pub const ERROR_BANNER: &str =
    "Something went wrong talking to the triage backend. Please try again.";

/// State of one conversation, from launch until exit.
///
/// Owns the message log, the text currently typed into the composer, the
/// pending flag, the last error text and the sources of the latest answer.
/// At most one request is in flight: `begin_submit` refuses while pending.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    messages: Vec<Message>,
    input: String,
    pending: bool,
    error: String,
    sources: Vec<Source>,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationSession {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING, None)],
            input: String::new(),
            pending: false,
            error: String::new(),
            sources: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Mutable access for the composer, which edits the input in place
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn error(&self) -> Option<&str> {
        if self.error.is_empty() {
            None
        } else {
            Some(&self.error)
        }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Whether a submission would currently be accepted
    pub fn can_submit(&self) -> bool {
        !self.pending && !self.input.trim().is_empty()
    }

    /// Start a submission from the current input.
    ///
    /// Returns the trimmed query to send, or `None` without touching any
    /// state when the input is blank or a request is already pending.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }

        let query = self.input.trim().to_string();
        self.error.clear();
        self.input.clear();
        self.messages.push(Message::user(query.clone()));
        self.pending = true;

        Some(query)
    }

    /// Finish the in-flight submission. The pending flag is cleared last.
    pub fn complete(&mut self, outcome: Result<AskResponse, BackendError>) {
        match outcome {
            Ok(response) => {
                tracing::info!(
                    sources = response.sources.len(),
                    confidence = ?response.meta.confidence,
                    "received answer"
                );
                self.messages
                    .push(Message::assistant(response.answer, Some(response.meta)));
                self.sources = response.sources;
            }
            Err(err) => {
                tracing::error!(error = %err, "triage request failed");
                self.error = ERROR_BANNER.to_string();
            }
        }

        self.pending = false;
    }
}
