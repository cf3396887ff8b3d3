//! Free-text query submission
//!
//! A query is echoed into the transcript before it is sent (see
//! `RequestOrchestrator::submit_query`); this module turns whatever the
//! backend returns into exactly one assistant reply.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::api::Backend;
use crate::conversation::Message;
use crate::error::ClientError;

/// Reply shown when the query round trip fails
pub const QUERY_ERROR_MESSAGE: &str =
    "Sorry, I encountered an error while processing your request.";

/// Reply shown when a response has no text and cannot be rendered either
pub const NO_TEXT_MESSAGE: &str =
    "I processed your request but didn't get a specific text response.";

/// Trim user input, rejecting input with no content
pub fn normalize(input: &str) -> Option<String> {
    let text = input.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Derive the assistant reply for a settled query
pub fn reply_for(outcome: Result<Value, ClientError>) -> Message {
    let body = match outcome {
        Ok(Value::Null) => {
            debug!(operation = "query", "Backend returned a null body");
            return Message::assistant(QUERY_ERROR_MESSAGE);
        }
        Ok(body) => body,
        Err(e) => {
            debug!(operation = "query", error = %e, "Query failed");
            return Message::assistant(QUERY_ERROR_MESSAGE);
        }
    };

    let agent = body.get("agent").and_then(Value::as_str).map(str::to_string);

    let content = match body.get("response") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => {
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| NO_TEXT_MESSAGE.to_string())
        }
        Some(other) => other.to_string(),
    };

    Message::assistant(content).from_agent(agent)
}

/// Runs one query against the backend
#[derive(Clone)]
pub struct QueryDispatcher {
    backend: Arc<dyn Backend>,
}

impl QueryDispatcher {
    /// Create a dispatcher for the given backend
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Send the query and derive the reply; never fails
    pub async fn run(&self, text: &str) -> Message {
        reply_for(self.backend.send_query(text).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use serde_json::json;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  hello  "), Some("hello".to_string()));
        assert_eq!(normalize(""), None);
        assert_eq!(normalize(" \t\n "), None);
    }

    #[test]
    fn test_reply_uses_response_field() {
        let reply = reply_for(Ok(json!({"response": "42"})));
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, "42");
        assert!(reply.origin_agent.is_none());
    }

    #[test]
    fn test_reply_carries_origin_agent() {
        let reply = reply_for(Ok(json!({"response": "3 meetings today", "agent": "DBAgent"})));
        assert_eq!(reply.content, "3 meetings today");
        assert_eq!(reply.origin_agent.as_deref(), Some("DBAgent"));
    }

    #[test]
    fn test_reply_without_response_shows_body() {
        let reply = reply_for(Ok(json!({})));
        assert_eq!(reply.content, serde_json::to_string_pretty(&json!({})).unwrap());
        assert_eq!(reply.content, "{}");

        let body = json!({"success": false, "agent": "WeatherAgent", "error": "no city"});
        let reply = reply_for(Ok(body.clone()));
        assert_eq!(reply.content, serde_json::to_string_pretty(&body).unwrap());
        assert_eq!(reply.origin_agent.as_deref(), Some("WeatherAgent"));
    }

    #[test]
    fn test_reply_null_response_shows_body() {
        let body = json!({"response": null});
        let reply = reply_for(Ok(body.clone()));
        assert_eq!(reply.content, serde_json::to_string_pretty(&body).unwrap());
    }

    #[test]
    fn test_reply_non_string_response() {
        let reply = reply_for(Ok(json!({"response": 42})));
        assert_eq!(reply.content, "42");
    }

    #[test]
    fn test_reply_on_failure() {
        let reply = reply_for(Err(ClientError::UnexpectedResponse("boom".to_string())));
        assert_eq!(reply.content, QUERY_ERROR_MESSAGE);
        assert!(reply.origin_agent.is_none());

        let reply = reply_for(Ok(Value::Null));
        assert_eq!(reply.content, QUERY_ERROR_MESSAGE);
    }
}
