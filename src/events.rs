use chrono::{DateTime, Utc};
use serde_json::Value;
use std::str::FromStr;
use strum::EnumString;

/// TUI-specific events (keyboard, paste, resize)
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// Key press event
    Key(crossterm::event::KeyEvent),

    /// Paste event
    Paste(String),

    /// Terminal resize
    Resize(u16, u16),
}

impl TuiEvent {
    /// Map a raw crossterm event onto the events the client reacts to
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        match event {
            crossterm::event::Event::Key(key) => Some(TuiEvent::Key(key)),
            crossterm::event::Event::Paste(text) => Some(TuiEvent::Paste(text)),
            crossterm::event::Event::Resize(w, h) => Some(TuiEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Role in conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "HealthDialog",
        }
    }
}

/// Backend-computed estimate of how likely an answer is unsupported
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HallucinationRisk {
    Low,
    Medium,
    High,
    /// Any other label the backend sends, kept verbatim for display
    #[strum(default)]
    Other(String),
}

impl HallucinationRisk {
    /// Parse a risk label; empty labels count as absent
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        HallucinationRisk::from_str(label).ok()
    }

    pub fn label(&self) -> &str {
        match self {
            HallucinationRisk::Low => "low",
            HallucinationRisk::Medium => "medium",
            HallucinationRisk::High => "high",
            HallucinationRisk::Other(label) => label,
        }
    }
}

/// Answer metadata shown as badges under assistant messages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageMeta {
    pub confidence: Option<f64>,
    pub hallucination_risk: Option<HallucinationRisk>,
}

impl MessageMeta {
    /// Confidence as a whole percentage, e.g. `0.8` -> `"80%"`
    pub fn confidence_percent(&self) -> Option<String> {
        self.confidence.map(|c| format!("{:.0}%", (c * 100.0).round()))
    }
}

/// A single entry in the conversation log
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub meta: Option<MessageMeta>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            meta: None,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, meta: Option<MessageMeta>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            meta,
            timestamp: Utc::now(),
        }
    }
}

/// A document cited for the latest answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub url: Option<String>,
}

impl Source {
    /// Build a source from one element of the backend's `sources` array.
    /// Fields that are missing or not strings are left empty.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            title: field("title"),
            snippet: field("snippet"),
            url: field("url"),
        }
    }

    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => "Source",
        }
    }
}
