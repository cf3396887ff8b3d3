// Medify GUI - Main Entry Point
// Native Rust chat client for the Medify multi-agent assistant backend

mod state;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui;
use medify_client::{ClientConfig, HttpBackend, RequestOrchestrator};
use state::AppState;
use tracing::info;
use ui::render_app_layout;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = ClientConfig::from_env();
    info!("Configuration loaded: {:?}", config);

    // Network operations run here; session state is only touched on the UI thread
    let runtime = tokio::runtime::Runtime::new()?;

    // Configure window options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Medify AI")
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Medify AI",
        options,
        Box::new(move |cc| {
            let repaint = cc.egui_ctx.clone();
            let backend = Arc::new(HttpBackend::new(&config));
            let orchestrator = RequestOrchestrator::new(backend, config, runtime.handle().clone())
                .with_notifier(move || repaint.request_repaint());
            drop(orchestrator.refresh_roster());
            Box::new(MedifyApp::new(runtime, orchestrator))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}

/// Main application struct
/// Drives the orchestrator and renders its state every frame
struct MedifyApp {
    /// Session state and operation dispatch
    orchestrator: RequestOrchestrator,
    /// View-only state (input buffers, toggles, scroll)
    view: AppState,
    /// Keeps the runtime alive for as long as the window is open
    _runtime: tokio::runtime::Runtime,
}

impl MedifyApp {
    /// Create a new application instance
    fn new(runtime: tokio::runtime::Runtime, orchestrator: RequestOrchestrator) -> Self {
        Self {
            orchestrator,
            view: AppState::new(),
            _runtime: runtime,
        }
    }

    /// Upload the first file dropped on the window, if any
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Option<PathBuf> =
            ctx.input(|i| i.raw.dropped_files.iter().find_map(|file| file.path.clone()));
        if let Some(path) = dropped {
            self.orchestrator.upload(path);
        }
    }
}

impl eframe::App for MedifyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply everything finished operations delivered since the last frame
        self.orchestrator.pump();
        self.handle_dropped_files(ctx);

        // Render the main application layout
        render_app_layout(ctx, &mut self.orchestrator, &mut self.view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_creation() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let config = ClientConfig::from_env().with_base_url("http://127.0.0.1:1/api");
        let backend = Arc::new(HttpBackend::new(&config));
        let orchestrator = RequestOrchestrator::new(backend, config, runtime.handle().clone());

        let app = MedifyApp::new(runtime, orchestrator);
        assert_eq!(app.orchestrator.state().transcript.len(), 1);
        assert!(app.orchestrator.state().can_dispatch());
        assert!(app.view.input.is_empty());
    }
}
