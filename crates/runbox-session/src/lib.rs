//! Client-resident editor session model: open files, the active
//! selection, per-file language binding, and the orchestration of run,
//! save, and download against the playground backend.

pub mod client;
pub mod format;
pub mod languages;
pub mod session;

pub use client::ApiClient;
pub use languages::{Language, LanguageSpec, validate_catalog};
pub use session::{
    CloseOutcome, Download, EditorSession, ExecutionBackend, RunOutcome, SessionError,
    SessionFile, SnippetBackend,
};
