// State management module
// Holds view-only state; session state is owned by the orchestrator

pub mod app_state;

pub use app_state::AppState;
