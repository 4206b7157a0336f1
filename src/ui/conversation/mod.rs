//! Conversation UI components for the triage chat

pub mod banner;
pub mod commands;
pub mod composer;
pub mod history;
pub mod manager;
pub mod sources;

pub use banner::ErrorBanner;
pub use commands::{SlashCommand, get_help_text, parse_slash_command};
pub use composer::{ComposerResult, ConversationComposer};
pub use history::ConversationHistory;
pub use manager::{ConversationAction, ConversationManager};
pub use sources::SourcesPanel;
