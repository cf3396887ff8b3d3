//! Document upload
//!
//! One file per operation, sent as multipart. The outcome is an assistant
//! reply plus a short status label that clears itself after a delay.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::api::Backend;
use crate::conversation::Message;
use crate::error::ClientError;

/// Origin reported on successful upload replies
pub const DOCUMENT_AGENT: &str = "DocumentAgent";

/// Reply shown when the upload round trip fails
pub const UPLOAD_ERROR_MESSAGE: &str = "❌ Error uploading document. Is the backend running?";

/// Phase of the most recent upload, as shown under the input bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    /// Request in flight
    Uploading,
    /// Backend reported success
    Success,
    /// Backend answered but reported failure
    Failed,
    /// Round trip failed
    Error,
}

impl UploadStatus {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            UploadStatus::Uploading => "Uploading...",
            UploadStatus::Success => "Success!",
            UploadStatus::Failed => "Upload failed",
            UploadStatus::Error => "Error",
        }
    }
}

/// A document ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent in the multipart part (no directory)
    pub filename: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Create an upload from in-memory contents
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read a file from disk
    pub async fn read(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(display_name(path), bytes))
    }

    /// MIME type derived from the file extension
    pub fn mime_type(&self) -> &'static str {
        match extension_of(Path::new(&self.filename)).as_deref() {
            Some("pdf") => "application/pdf",
            Some("txt") => "text/plain",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            _ => "application/octet-stream",
        }
    }
}

/// File name component of a path, for display and upload
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Lower-cased extension of a path
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// Whether the path has one of the accepted extensions
pub fn is_accepted(path: &Path, allowed_extensions: &[String]) -> bool {
    extension_of(path)
        .map(|ext| allowed_extensions.iter().any(|allowed| *allowed == ext))
        .unwrap_or(false)
}

/// Whether a response value counts as set (`null`, `false`, `0` and `""` do not)
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text of a response field, if it is set
fn field_text(body: &Value, key: &str) -> Option<String> {
    match body.get(key).filter(|value| is_truthy(value))? {
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Derive the assistant reply and status for a settled upload
pub fn reply_for(filename: &str, outcome: Result<Value, ClientError>) -> (Message, UploadStatus) {
    let body = match outcome {
        Ok(Value::Null) => {
            debug!(operation = "upload", filename = filename, "Backend returned a null body");
            return (Message::assistant(UPLOAD_ERROR_MESSAGE), UploadStatus::Error);
        }
        Ok(body) => body,
        Err(e) => {
            debug!(operation = "upload", filename = filename, error = %e, "Upload failed");
            return (Message::assistant(UPLOAD_ERROR_MESSAGE), UploadStatus::Error);
        }
    };

    if body.get("success").map_or(false, is_truthy) {
        let summary = field_text(&body, "summary").unwrap_or_default();
        let reply = Message::assistant(format!(
            "✅ Document '{}' uploaded successfully!\n\n{}",
            filename, summary
        ))
        .from_agent(Some(DOCUMENT_AGENT));
        (reply, UploadStatus::Success)
    } else {
        let detail = field_text(&body, "detail")
            .or_else(|| field_text(&body, "error"))
            .unwrap_or_else(|| "Unknown error".to_string());
        let reply = Message::assistant(format!("❌ Upload failed: {}", detail));
        (reply, UploadStatus::Failed)
    }
}

/// Runs one upload against the backend
#[derive(Clone)]
pub struct UploadPipeline {
    backend: Arc<dyn Backend>,
}

impl UploadPipeline {
    /// Create a pipeline for the given backend
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Read and send the file, then derive the reply; never fails
    pub async fn run(&self, path: &Path) -> (Message, UploadStatus) {
        let filename = display_name(path);
        let outcome = match UploadFile::read(path).await {
            Ok(file) => self.backend.upload_document(file).await,
            Err(e) => Err(e),
        };
        reply_for(&filename, outcome)
    }
}
