//! HealthDialog: terminal chat client for a clinically grounded triage
//! RAG backend.

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod session;
pub mod ui;

pub use backend::{AskResponse, HttpTriageBackend, TriageBackend};
pub use config::Config;
pub use error::BackendError;
pub use session::ConversationSession;
