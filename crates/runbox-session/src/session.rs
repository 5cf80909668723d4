//! The editor session state machine.
//!
//! A session owns an ordered set of open files, exactly one of which is
//! active, plus the language selected for new files, the stdin buffer,
//! and the run gate. All transitions are synchronous and deterministic;
//! only [`EditorSession::run`] and [`EditorSession::save`] suspend, and
//! both go through trait seams so the state machine itself never touches
//! the network.
//!
//! Invariants:
//! - the file set is never empty (closing the last file is refused);
//! - exactly one file is active;
//! - at most one run is in flight per session.

use serde_json::Value;
use thiserror::Error;

use runbox_types::api::{RunRequest, SaveSnippetRequest};

use crate::format::reindent;
use crate::languages::Language;

pub const DEFAULT_LANGUAGE: Language = Language::Python3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a run is already in flight")]
    RunInFlight,
    #[error("sign in to save files")]
    AuthRequired,
    #[error("save failed: {0}")]
    SaveFailed(String),
}

/// One open editing buffer. Unpersisted until exported via save.
#[derive(Debug, Clone)]
pub struct SessionFile {
    id: u64,
    name: String,
    source: String,
    language: Language,
}

impl SessionFile {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

/// What one run produced: the provider's JSON, or the failure that
/// replaced it. Either way it lands in the output pane.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(Value),
    Failed(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// Closing the last remaining file is refused.
    LastFileRefused,
    NotFound,
}

/// A serialized download: target filename plus reindented contents.
#[derive(Debug, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub contents: String,
}

/// Remote execution seam. The production implementation is
/// [`crate::ApiClient`]; tests substitute stubs.
pub trait ExecutionBackend {
    fn execute(
        &self,
        req: &RunRequest,
    ) -> impl std::future::Future<Output = anyhow::Result<Value>> + Send;
}

/// Snippet persistence seam, gated on an authenticated identity.
pub trait SnippetBackend {
    fn authenticated(&self) -> bool;

    fn save(
        &self,
        req: &SaveSnippetRequest,
    ) -> impl std::future::Future<Output = anyhow::Result<i64>> + Send;
}

pub struct EditorSession {
    files: Vec<SessionFile>,
    active: String,
    selected_language: Language,
    stdin: String,
    next_file_id: u64,
    run_in_flight: bool,
    last_outcome: Option<RunOutcome>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// A fresh session: one file seeded from the default language's
    /// template, active, empty stdin, no prior outcome.
    pub fn new() -> Self {
        let spec = DEFAULT_LANGUAGE.spec();
        let first = SessionFile {
            id: 1,
            name: format!("main{}", spec.extension),
            source: spec.template.to_string(),
            language: DEFAULT_LANGUAGE,
        };
        let active = first.name.clone();

        Self {
            files: vec![first],
            active,
            selected_language: DEFAULT_LANGUAGE,
            stdin: String::new(),
            next_file_id: 2,
            run_in_flight: false,
            last_outcome: None,
        }
    }

    // -- Introspection --

    pub fn files(&self) -> &[SessionFile] {
        &self.files
    }

    pub fn active_file(&self) -> &SessionFile {
        self.files
            .iter()
            .find(|f| f.name == self.active)
            .unwrap_or(&self.files[0])
    }

    pub fn selected_language(&self) -> Language {
        self.selected_language
    }

    pub fn stdin(&self) -> &str {
        &self.stdin
    }

    pub fn run_in_flight(&self) -> bool {
        self.run_in_flight
    }

    pub fn last_outcome(&self) -> Option<&RunOutcome> {
        self.last_outcome.as_ref()
    }

    fn active_file_mut(&mut self) -> &mut SessionFile {
        let idx = self
            .files
            .iter()
            .position(|f| f.name == self.active)
            .unwrap_or(0);
        &mut self.files[idx]
    }

    // -- Transitions --

    /// Open a new file seeded with the selected language's template and
    /// make it active. Generated names come from a counter that never
    /// decreases, so they cannot collide with files already open, even
    /// after closes have punched holes in the numbering.
    pub fn create_file(&mut self) -> &SessionFile {
        let spec = self.selected_language.spec();
        let (id, name) = loop {
            let id = self.next_file_id;
            self.next_file_id += 1;
            let name = format!("main{}{}", id, spec.extension);
            if !self.files.iter().any(|f| f.name == name) {
                break (id, name);
            }
        };

        self.files.push(SessionFile {
            id,
            name: name.clone(),
            source: spec.template.to_string(),
            language: self.selected_language,
        });
        self.active = name;
        self.active_file()
    }

    /// Activate the named file. No-op (returns false) if it isn't open.
    pub fn switch_to(&mut self, name: &str) -> bool {
        if self.files.iter().any(|f| f.name == name) {
            self.active = name.to_string();
            true
        } else {
            false
        }
    }

    /// Close the named file. The last remaining file cannot be closed;
    /// closing the active file promotes the first remaining one.
    pub fn close(&mut self, name: &str) -> CloseOutcome {
        if !self.files.iter().any(|f| f.name == name) {
            return CloseOutcome::NotFound;
        }
        if self.files.len() == 1 {
            return CloseOutcome::LastFileRefused;
        }

        self.files.retain(|f| f.name != name);
        if self.active == name {
            self.active = self.files[0].name.clone();
        }
        CloseOutcome::Closed
    }

    /// Replace the active file's source text. Identity and language are
    /// untouched.
    pub fn edit_active(&mut self, source: impl Into<String>) {
        self.active_file_mut().source = source.into();
    }

    /// Retarget the active file's language binding (and with it the
    /// display mode and download extension). The source text stays.
    pub fn set_active_language(&mut self, language: Language) {
        self.active_file_mut().language = language;
    }

    /// Change the language used for files created from here on. Open
    /// files keep whatever binding they have.
    pub fn select_language(&mut self, language: Language) {
        self.selected_language = language;
    }

    pub fn set_stdin(&mut self, stdin: impl Into<String>) {
        self.stdin = stdin.into();
    }

    // -- Run --

    /// Snapshot the active file into a provider-shaped run request and
    /// close the run gate. Refused while a run is in flight.
    pub fn begin_run(&mut self) -> Result<RunRequest, SessionError> {
        if self.run_in_flight {
            return Err(SessionError::RunInFlight);
        }

        let file = self.active_file();
        let spec = file.language.spec();
        let stdin = self.stdin.trim();

        let req = RunRequest {
            language: Some(spec.provider_id.to_string()),
            version_index: Some(spec.version_index.to_string()),
            code: Some(file.source.clone()),
            stdin: (!stdin.is_empty()).then(|| stdin.to_string()),
        };

        self.run_in_flight = true;
        Ok(req)
    }

    /// Record a run's outcome and re-open the gate. Called on success
    /// and failure alike; a hung transport is the only thing that can
    /// keep the gate closed.
    pub fn complete_run(&mut self, outcome: RunOutcome) {
        self.last_outcome = Some(outcome);
        self.run_in_flight = false;
    }

    /// Drive one full run: gate, submit, record. The new outcome
    /// replaces the previous one whether the backend succeeded or not.
    pub async fn run(&mut self, backend: &impl ExecutionBackend) -> Result<RunOutcome, SessionError> {
        let req = self.begin_run()?;

        let outcome = match backend.execute(&req).await {
            Ok(value) => RunOutcome::Completed(value),
            Err(e) => RunOutcome::Failed(e.to_string()),
        };

        self.complete_run(outcome.clone());
        Ok(outcome)
    }

    // -- Save --

    /// The active file as a save payload.
    pub fn save_request(&self) -> SaveSnippetRequest {
        let file = self.active_file();
        SaveSnippetRequest {
            filename: Some(file.name.clone()),
            language: Some(file.language.tag().to_string()),
            code: Some(file.source.clone()),
        }
    }

    /// Export the active file to the snippet store. Requires an
    /// authenticated backend. Save is a one-way export: the buffer stays
    /// an independent, mutable file afterwards.
    pub async fn save(&self, backend: &impl SnippetBackend) -> Result<i64, SessionError> {
        if !backend.authenticated() {
            return Err(SessionError::AuthRequired);
        }

        backend
            .save(&self.save_request())
            .await
            .map_err(|e| SessionError::SaveFailed(e.to_string()))
    }

    // -- Download --

    /// Serialize the active file for download: reindented contents and a
    /// filename that always carries an extension.
    pub fn download_active(&self) -> Download {
        let file = self.active_file();
        let contents = reindent(&file.source, file.language);
        let filename = if file.name.contains('.') {
            file.name.clone()
        } else {
            format!("{}{}", file.name, file.language.spec().extension)
        };

        Download { filename, contents }
    }
}
