//! Agent roster
//!
//! Holds the list of active backend agents shown in the sidebar.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::Backend;
use crate::error::ClientError;

/// Names shown while the roster is empty
///
/// This is a presentation default only; it is never stored in the roster.
pub const FALLBACK_AGENTS: [&str; 3] = ["Weather Agent", "DB Agent", "Meeting Agent"];

/// A backend agent as reported by `GET /agents`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Display name of the agent (empty when the backend omits it)
    #[serde(default)]
    pub name: String,
    /// Short description of what the agent handles
    #[serde(default)]
    pub description: Option<String>,
    /// Routing priority (a number, or a string such as "unknown")
    #[serde(default)]
    pub priority: Option<Value>,
}

impl Agent {
    /// Create an agent with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            priority: None,
        }
    }
}

/// The last successfully fetched list of agents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentRoster {
    agents: Vec<Agent>,
}

impl AgentRoster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roster wholesale (an empty list is a valid roster)
    pub fn replace(&mut self, agents: Vec<Agent>) {
        self.agents = agents;
    }

    /// Agents from the last successful fetch
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Whether no agents are known
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Names for the sidebar, falling back to the built-in placeholders
    pub fn display_names(&self) -> Vec<&str> {
        if self.agents.is_empty() {
            FALLBACK_AGENTS.to_vec()
        } else {
            self.agents.iter().map(|a| a.name.as_str()).collect()
        }
    }

    /// Fetch the current roster from the backend
    ///
    /// Returns `None` on any failure. Failures are logged and go nowhere
    /// else: the sidebar has a safe fallback.
    pub async fn fetch(backend: &dyn Backend) -> Option<Vec<Agent>> {
        match backend.list_agents().await {
            Ok(agents) => {
                debug!(count = agents.len(), "Fetched agent roster");
                Some(agents)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch agent roster");
                None
            }
        }
    }
}

/// Interpret a `GET /agents` body
///
/// Accepts a bare array, `null`, or the `{"total_agents", "agents"}`
/// envelope the backend's orchestrator produces.
pub fn parse_roster(body: Value) -> Result<Vec<Agent>, ClientError> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => Ok(serde_json::from_value(body)?),
        Value::Object(mut map) => match map.remove("agents") {
            Some(agents @ Value::Array(_)) => Ok(serde_json::from_value(agents)?),
            Some(Value::Null) => Ok(Vec::new()),
            _ => Err(ClientError::UnexpectedResponse(
                "agent roster object has no agents list".to_string(),
            )),
        },
        other => Err(ClientError::UnexpectedResponse(format!(
            "agent roster is not a list: {}",
            other
        ))),
    }
}
