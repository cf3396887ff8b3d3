//! Medify client library
//!
//! Request/state orchestration for the Medify assistant UI: the transcript,
//! the agent roster, query and document-upload operations, and the
//! coordinator that serialises them. Nothing in here renders anything; the
//! GUI crate drives a [`RequestOrchestrator`] once per frame.

pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
/// Top-level coordination of user actions and operation outcomes
pub mod orchestrator;
pub mod query;
pub mod roster;
pub mod scroll;
pub mod upload;

pub use api::{Backend, HttpBackend};
pub use config::ClientConfig;
pub use conversation::{ConversationStore, Message, Role};
pub use error::ClientError;
pub use orchestrator::{
    Dispatch, Event, OperationKind, OperationState, RequestOrchestrator, SessionState,
};
pub use roster::{Agent, AgentRoster};
pub use scroll::ScrollController;
pub use upload::{UploadFile, UploadStatus};
