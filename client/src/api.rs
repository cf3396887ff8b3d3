//! Medify backend HTTP client
//!
//! The backend is an opaque service; this module only knows its three
//! endpoints. [`Backend`] is the seam operations are written against so
//! they can run against a scripted backend in tests.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::roster::{parse_roster, Agent};
use crate::upload::UploadFile;

/// Multipart field name the upload endpoint reads the document from
pub const UPLOAD_FIELD: &str = "file";

/// Operations the client needs from the backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /agents`
    async fn list_agents(&self) -> Result<Vec<Agent>, ClientError>;

    /// `POST /query` with `{"query": text}`, returning the raw JSON body
    async fn send_query(&self, query: &str) -> Result<Value, ClientError>;

    /// `POST /document/upload` as multipart, returning the raw JSON body
    async fn upload_document(&self, file: UploadFile) -> Result<Value, ClientError>;
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

/// [`Backend`] over HTTP
///
/// No request timeout is configured: an operation stays in flight until the
/// transport settles.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpBackend {
    /// Create a backend client with a fresh connection pool
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a backend client sharing an existing connection pool
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// Read a response body as JSON
    ///
    /// The status code is logged but not treated as failure: the backend
    /// reports rejected uploads and internal errors in JSON bodies that the
    /// caller has to surface.
    async fn read_json(response: reqwest::Response, endpoint: &str) -> Result<Value, ClientError> {
        let status = response.status();
        if !status.is_success() {
            warn!(
                endpoint = endpoint,
                status = status.as_u16(),
                "Backend returned error status"
            );
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str(&body)?;

        debug!(endpoint = endpoint, body_len = body.len(), "Received backend response");
        Ok(parsed)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_agents(&self) -> Result<Vec<Agent>, ClientError> {
        let url = self.config.endpoint("agents");
        let response = self.client.get(&url).send().await?;
        let body = Self::read_json(response, "agents").await?;
        parse_roster(body)
    }

    async fn send_query(&self, query: &str) -> Result<Value, ClientError> {
        let url = self.config.endpoint("query");
        debug!(url = %url, query_len = query.len(), "Sending query");

        let response = self
            .client
            .post(&url)
            .json(&QueryRequest { query })
            .send()
            .await?;
        Self::read_json(response, "query").await
    }

    async fn upload_document(&self, file: UploadFile) -> Result<Value, ClientError> {
        let url = self.config.endpoint("document/upload");
        debug!(
            url = %url,
            filename = %file.filename,
            size = file.bytes.len(),
            "Uploading document"
        );

        let mime = file.mime_type();
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self.client.post(&url).multipart(form).send().await?;
        Self::read_json(response, "document/upload").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn backend_for(server: &Server) -> HttpBackend {
        HttpBackend::new(&ClientConfig::from_env().with_base_url(&server.url()))
    }

    #[tokio::test]
    async fn test_list_agents_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/agents")
            .with_status(200)
            .with_body(r#"[{"name": "WeatherAgent"}, {"name": "MeetingAgent"}]"#)
            .create_async()
            .await;

        let agents = backend_for(&server).list_agents().await.unwrap();

        mock.assert_async().await;
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[1].name, "MeetingAgent");
    }

    #[tokio::test]
    async fn test_list_agents_invalid_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/agents")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let result = backend_for(&server).list_agents().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn test_send_query_posts_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/query")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"query": "weather in London"})))
            .with_status(200)
            .with_body(r#"{"response": "Sunny", "agent": "WeatherAgent", "success": true}"#)
            .create_async()
            .await;

        let body = backend_for(&server)
            .send_query("weather in London")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body["response"], "Sunny");
        assert_eq!(body["agent"], "WeatherAgent");
    }

    #[tokio::test]
    async fn test_send_query_error_status_keeps_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/query")
            .with_status(500)
            .with_body(r#"{"detail": "Internal server error: boom"}"#)
            .create_async()
            .await;

        let body = backend_for(&server).send_query("hello").await.unwrap();

        mock.assert_async().await;
        assert_eq!(body["detail"], "Internal server error: boom");
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_file() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/document/upload")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="notes.txt""#.to_string()),
                Matcher::Regex("quarterly figures".to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"success": true, "summary": "Figures for Q3"}"#)
            .create_async()
            .await;

        let file = UploadFile::new("notes.txt", b"quarterly figures".to_vec());
        let body = backend_for(&server).upload_document(file).await.unwrap();

        mock.assert_async().await;
        assert_eq!(body["success"], true);
        assert_eq!(body["summary"], "Figures for Q3");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let config = ClientConfig::from_env().with_base_url("http://127.0.0.1:1/api");
        let result = HttpBackend::new(&config).send_query("hello").await;
        assert!(matches!(result, Err(ClientError::Transport(_))));
    }
}
