// View state
// Input buffers, panel toggles and scroll following. Session state (transcript,
// roster, busy flags) lives in the orchestrator, not here.

use medify_client::ScrollController;

/// View-only state for the main window
#[derive(Debug, Clone)]
pub struct AppState {
    /// Text typed into the query field
    pub input: String,
    /// Path typed into the document field
    pub file_path: String,
    /// UI state preferences
    pub ui_state: UiState,
    /// Keeps the transcript pinned to the newest message
    pub scroll: ScrollController,
}

/// UI-specific state
#[derive(Debug, Clone)]
pub struct UiState {
    /// Whether the agent sidebar is visible
    pub sidebar_visible: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_visible: true,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            input: String::new(),
            file_path: String::new(),
            ui_state: UiState::default(),
            scroll: ScrollController::new(),
        }
    }
}

impl AppState {
    /// Create a new view state with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// The typed document path, if any, trimmed
    pub fn file_path(&self) -> Option<&str> {
        let path = self.file_path.trim();
        if path.is_empty() {
            None
        } else {
            Some(path)
        }
    }

    /// Reset the query field after a query was accepted
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Reset the document field after an upload was accepted
    pub fn clear_file_path(&mut self) {
        self.file_path.clear();
    }
}
