//! Request orchestration
//!
//! Single entry point for user actions. Owns the session state (transcript,
//! roster, one [`OperationState`] per operation kind, the selected upload
//! file) and is the only thing that changes it.
//!
//! State changes are pure transitions, [`SessionState::apply`], fed by
//! [`Event`]s. Network work runs as spawned tasks that only *send* events;
//! the owner applies them on its own thread through [`RequestOrchestrator::pump`]
//! or [`RequestOrchestrator::next_event`], so application logic never runs
//! in parallel with itself.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::Backend;
use crate::config::ClientConfig;
use crate::conversation::{ConversationStore, Message};
use crate::query::{self, QueryDispatcher};
use crate::roster::{Agent, AgentRoster};
use crate::upload::{self, UploadPipeline, UploadStatus};

/// The two kinds of user-triggered backend operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Free-text query
    Query,
    /// Document upload
    Upload,
}

impl OperationKind {
    /// Convert the kind to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Upload => "upload",
        }
    }
}

/// Per-kind operation flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationState {
    /// An operation of this kind is in flight
    pub busy: bool,
    /// Short phase label (uploads only); clears itself after a delay
    pub last_status: Option<String>,
}

/// Result of asking the orchestrator to start something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The operation was started
    Accepted,
    /// Nothing to do (empty query, no file, unsupported file type)
    Ignored,
    /// Another operation is in flight
    Rejected,
}

/// A state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A query was dispatched: echo it and mark the query busy
    QueryStarted(String),
    /// The query produced its assistant reply
    QueryReplied(Message),
    /// An upload was dispatched
    UploadStarted,
    /// The upload produced its reply and final status
    UploadReplied {
        /// Assistant message for the transcript
        reply: Message,
        /// Status to show until it expires
        status: UploadStatus,
    },
    /// An operation finished, successfully or not
    Settled(OperationKind),
    /// The upload status timer fired
    UploadStatusExpired,
    /// A file was chosen for upload
    FileSelected(PathBuf),
    /// A roster fetch succeeded
    RosterLoaded(Vec<Agent>),
}

/// Everything the UI renders from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// The transcript
    pub transcript: ConversationStore,
    /// Agents for the sidebar
    pub roster: AgentRoster,
    /// Query operation flags
    pub query: OperationState,
    /// Upload operation flags
    pub upload: OperationState,
    /// File chosen for the next upload
    pub selected_file: Option<PathBuf>,
}

impl SessionState {
    /// Fresh session: greeting only, empty roster, nothing in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any operation is in flight
    pub fn is_busy(&self) -> bool {
        self.query.busy || self.upload.busy
    }

    /// Whether a new query or upload may start (drives the Send and upload affordances)
    pub fn can_dispatch(&self) -> bool {
        !self.is_busy()
    }

    /// Flags for one operation kind
    pub fn operation(&self, kind: OperationKind) -> &OperationState {
        match kind {
            OperationKind::Query => &self.query,
            OperationKind::Upload => &self.upload,
        }
    }

    /// Apply an event, returning the next state
    pub fn apply(mut self, event: Event) -> Self {
        match event {
            Event::QueryStarted(text) => {
                self.transcript.append(Message::user(text));
                self.query.busy = true;
            }
            Event::QueryReplied(reply) => {
                self.transcript.append(reply);
            }
            Event::UploadStarted => {
                self.upload.busy = true;
                self.upload.last_status = Some(UploadStatus::Uploading.label().to_string());
            }
            Event::UploadReplied { reply, status } => {
                self.transcript.append(reply);
                self.upload.last_status = Some(status.label().to_string());
            }
            Event::Settled(OperationKind::Query) => {
                self.query.busy = false;
            }
            Event::Settled(OperationKind::Upload) => {
                self.upload.busy = false;
                self.selected_file = None;
            }
            // Not tied to the upload that scheduled it; a later upload's
            // status can be cleared early.
            Event::UploadStatusExpired => {
                self.upload.last_status = None;
            }
            Event::FileSelected(path) => {
                self.selected_file = Some(path);
            }
            Event::RosterLoaded(agents) => {
                self.roster.replace(agents);
            }
        }
        self
    }
}

/// Delivers events from tasks back to the orchestrator
#[derive(Clone)]
struct EventSink {
    tx: mpsc::UnboundedSender<Event>,
    notify: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl EventSink {
    fn send(&self, event: Event) {
        if self.tx.send(event).is_ok() {
            if let Some(notify) = &self.notify {
                notify();
            }
        }
    }
}

/// Releases an operation's busy flag when the operation task ends
///
/// Dropped on every exit path of the task, panics included, and always
/// after the reply was sent.
struct SettleGuard {
    kind: OperationKind,
    sink: EventSink,
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        self.sink.send(Event::Settled(self.kind));
    }
}

/// Coordinates queries, uploads and roster refreshes
pub struct RequestOrchestrator {
    state: SessionState,
    backend: Arc<dyn Backend>,
    config: ClientConfig,
    runtime: Handle,
    sink: EventSink,
    events: mpsc::UnboundedReceiver<Event>,
}

impl RequestOrchestrator {
    /// Create an orchestrator spawning its operations on `runtime`
    pub fn new(backend: Arc<dyn Backend>, config: ClientConfig, runtime: Handle) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        Self {
            state: SessionState::new(),
            backend,
            config,
            runtime,
            sink: EventSink { tx, notify: None },
            events,
        }
    }

    /// Call `notify` whenever a task delivers an event (e.g. to request a repaint)
    pub fn with_notifier(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        let notify: Arc<dyn Fn() + Send + Sync> = Arc::new(notify);
        self.sink.notify = Some(notify);
        self
    }

    /// Current session state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Configuration in use
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn transition(&mut self, event: Event) {
        self.state = std::mem::take(&mut self.state).apply(event);
    }

    /// Submit user input as a query
    ///
    /// The user message is appended before the request is issued, so it is
    /// in the transcript even if the request fails.
    pub fn submit_query(&mut self, input: &str) -> Dispatch {
        let Some(text) = query::normalize(input) else {
            debug!(operation = "query", "Ignoring empty query");
            return Dispatch::Ignored;
        };
        if self.state.is_busy() {
            debug!(operation = "query", "Rejecting query while busy");
            return Dispatch::Rejected;
        }

        self.transition(Event::QueryStarted(text.clone()));
        debug!(operation = "query", query_len = text.len(), "Query dispatched");

        let guard = SettleGuard {
            kind: OperationKind::Query,
            sink: self.sink.clone(),
        };
        let dispatcher = QueryDispatcher::new(Arc::clone(&self.backend));
        let sink = self.sink.clone();
        self.runtime.spawn(async move {
            let _guard = guard;
            let reply = dispatcher.run(&text).await;
            sink.send(Event::QueryReplied(reply));
        });

        Dispatch::Accepted
    }

    /// Choose the file for the next upload
    pub fn select_file(&mut self, path: impl Into<PathBuf>) -> Dispatch {
        let path = path.into();
        if self.state.is_busy() {
            debug!(operation = "upload", "Rejecting file selection while busy");
            return Dispatch::Rejected;
        }
        if !upload::is_accepted(&path, &self.config.upload.allowed_extensions) {
            debug!(
                operation = "upload",
                path = %path.display(),
                "Ignoring file with unsupported extension"
            );
            return Dispatch::Ignored;
        }

        self.transition(Event::FileSelected(path));
        Dispatch::Accepted
    }

    /// Upload the selected file
    pub fn submit_upload(&mut self) -> Dispatch {
        let Some(path) = self.state.selected_file.clone() else {
            debug!(operation = "upload", "Ignoring upload with no file selected");
            return Dispatch::Ignored;
        };
        if self.state.is_busy() {
            debug!(operation = "upload", "Rejecting upload while busy");
            return Dispatch::Rejected;
        }

        self.transition(Event::UploadStarted);
        debug!(
            operation = "upload",
            filename = %upload::display_name(&path),
            "Upload dispatched"
        );

        let guard = SettleGuard {
            kind: OperationKind::Upload,
            sink: self.sink.clone(),
        };
        let pipeline = UploadPipeline::new(Arc::clone(&self.backend));
        let sink = self.sink.clone();
        self.runtime.spawn(async move {
            let _guard = guard;
            let (reply, status) = pipeline.run(&path).await;
            sink.send(Event::UploadReplied { reply, status });
        });

        Dispatch::Accepted
    }

    /// Select a file and upload it straight away
    pub fn upload(&mut self, path: impl Into<PathBuf>) -> Dispatch {
        match self.select_file(path) {
            Dispatch::Accepted => self.submit_upload(),
            other => other,
        }
    }

    /// Fetch the roster in the background
    ///
    /// Failures leave the roster as it was and never reach the transcript.
    pub fn refresh_roster(&self) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let sink = self.sink.clone();
        self.runtime.spawn(async move {
            if let Some(agents) = AgentRoster::fetch(backend.as_ref()).await {
                sink.send(Event::RosterLoaded(agents));
            }
        })
    }

    /// Apply every event delivered so far without waiting
    ///
    /// Returns the number of events applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next event, apply it and return it
    pub async fn next_event(&mut self) -> Option<Event> {
        let event = self.events.recv().await?;
        self.handle(event.clone());
        Some(event)
    }

    fn handle(&mut self, event: Event) {
        let upload_settled = event == Event::Settled(OperationKind::Upload);
        if let Event::Settled(kind) = &event {
            info!(
                operation = kind.as_str(),
                transcript_len = self.state.transcript.len(),
                "Operation settled"
            );
        }

        self.transition(event);

        if upload_settled {
            self.schedule_status_clear();
        }
    }

    /// Clear the upload status after the configured delay
    ///
    /// Fire-and-forget and never cancelled.
    fn schedule_status_clear(&self) {
        let sink = self.sink.clone();
        let delay = self.config.upload.status_clear_delay;
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            sink.send(Event::UploadStatusExpired);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Role, GREETING};

    #[test]
    fn test_new_session() {
        let state = SessionState::new();
        assert_eq!(state.transcript.len(), 1);
        assert_eq!(state.transcript.messages()[0].content, GREETING);
        assert!(state.can_dispatch());
        assert!(state.roster.is_empty());
        assert!(state.upload.last_status.is_none());
    }

    #[test]
    fn test_query_transitions() {
        let state = SessionState::new().apply(Event::QueryStarted("hello".to_string()));
        assert!(state.query.busy);
        assert!(!state.can_dispatch());
        assert_eq!(state.transcript.last().unwrap().role, Role::User);

        let state = state
            .apply(Event::QueryReplied(Message::assistant("hi")))
            .apply(Event::Settled(OperationKind::Query));
        assert!(!state.operation(OperationKind::Query).busy);
        assert_eq!(state.transcript.len(), 3);
        assert_eq!(state.transcript.last().unwrap().content, "hi");
    }

    #[test]
    fn test_upload_transitions() {
        let state = SessionState::new()
            .apply(Event::FileSelected(PathBuf::from("report.pdf")))
            .apply(Event::UploadStarted);
        assert!(state.upload.busy);
        assert!(!state.can_dispatch());
        assert_eq!(state.upload.last_status.as_deref(), Some("Uploading..."));

        let state = state.apply(Event::UploadReplied {
            reply: Message::assistant("done"),
            status: UploadStatus::Success,
        });
        assert_eq!(state.upload.last_status.as_deref(), Some("Success!"));

        let state = state.apply(Event::Settled(OperationKind::Upload));
        assert!(!state.upload.busy);
        assert!(state.selected_file.is_none());
        assert_eq!(state.upload.last_status.as_deref(), Some("Success!"));

        let state = state.apply(Event::UploadStatusExpired);
        assert!(state.upload.last_status.is_none());
    }

    #[test]
    fn test_status_expiry_clears_newer_status() {
        let state = SessionState::new()
            .apply(Event::UploadStarted)
            .apply(Event::UploadStatusExpired);
        assert!(state.upload.busy);
        assert!(state.upload.last_status.is_none());
    }

    #[test]
    fn test_roster_loaded_replaces() {
        let state = SessionState::new().apply(Event::RosterLoaded(vec![Agent::new("DBAgent")]));
        assert_eq!(state.roster.agents().len(), 1);

        let state = state.apply(Event::RosterLoaded(Vec::new()));
        assert!(state.roster.is_empty());
    }
}
