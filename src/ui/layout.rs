// Main application layout
// Handles window layout, panels, menu bar, and overall UI structure

use eframe::egui;
use medify_client::{Dispatch, RequestOrchestrator, SessionState};
use crate::state::AppState;
use crate::ui::components::*;

/// Render the main application layout
/// Includes menu bar, agent sidebar, input bar and the transcript
pub fn render_app_layout(ctx: &egui::Context, orchestrator: &mut RequestOrchestrator, view: &mut AppState) {
    render_menu_bar(ctx, orchestrator, view);

    if view.ui_state.sidebar_visible {
        render_sidebar(ctx, orchestrator);
    }

    // Bottom panel must be added before the central panel claims the rest
    render_input_bar(ctx, orchestrator, view);
    render_transcript(ctx, orchestrator.state(), view);
}

/// Render the top menu bar
fn render_menu_bar(ctx: &egui::Context, orchestrator: &RequestOrchestrator, view: &mut AppState) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            // File menu
            ui.menu_button("File", |ui| {
                if ui.button("Refresh Agents").clicked() {
                    drop(orchestrator.refresh_roster());
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            // View menu
            ui.menu_button("View", |ui| {
                ui.checkbox(&mut view.ui_state.sidebar_visible, "Agent Sidebar");
                let mut dark_mode = ctx.style().visuals.dark_mode;
                if ui.checkbox(&mut dark_mode, "Dark Mode").changed() {
                    ctx.style_mut(|style| {
                        style.visuals.dark_mode = dark_mode;
                    });
                }
            });
        });
    });
}

/// Render the left sidebar with the agent roster
fn render_sidebar(ctx: &egui::Context, orchestrator: &RequestOrchestrator) {
    egui::SidePanel::left("agent_sidebar")
        .resizable(true)
        .default_width(220.0)
        .min_width(150.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.heading("Medify AI");
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Active Agents").strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("⟳").on_hover_text("Refresh agents").clicked() {
                        drop(orchestrator.refresh_roster());
                    }
                });
            });
            ui.add_space(4.0);

            egui::ScrollArea::vertical()
                .id_source("agent_list_scroll")
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    // Falls back to the placeholder agents while the roster is empty
                    for name in orchestrator.state().roster.display_names() {
                        agent_row(ui, name);
                        ui.add_space(4.0);
                    }
                });
        });
}

/// Render the bottom input bar: upload control, query field, Send, upload status
/// Both triggering affordances are disabled while any operation is in flight
fn render_input_bar(ctx: &egui::Context, orchestrator: &mut RequestOrchestrator, view: &mut AppState) {
    egui::TopBottomPanel::bottom("input_bar").show(ctx, |ui| {
        let can_dispatch = orchestrator.state().can_dispatch();
        let uploading = orchestrator.state().upload.busy;

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let upload_label = if uploading { "..." } else { "📎" };
            let upload_clicked = ui
                .add_enabled(can_dispatch, egui::Button::new(upload_label))
                .on_hover_text("Upload Document (.pdf, .txt, .docx)")
                .clicked();
            ui.add(
                egui::TextEdit::singleline(&mut view.file_path)
                    .hint_text("Document path, or drop a file")
                    .desired_width(200.0),
            );

            if upload_clicked {
                if let Some(path) = view.file_path().map(str::to_string) {
                    if orchestrator.upload(path) == Dispatch::Accepted {
                        view.clear_file_path();
                    }
                }
            }

            ui.add_space(8.0);
            let send_width = 60.0;
            let response = ui.add(
                egui::TextEdit::singleline(&mut view.input)
                    .hint_text("Ask anything (e.g., weather, documents)...")
                    .desired_width(ui.available_width() - send_width),
            );
            let enter_pressed = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let send_clicked = ui.add_enabled(can_dispatch, egui::Button::new("Send")).clicked();

            if send_clicked || enter_pressed {
                if orchestrator.submit_query(&view.input) == Dispatch::Accepted {
                    view.clear_input();
                }
                response.request_focus();
            }
        });

        if let Some(status) = &orchestrator.state().upload.last_status {
            ui.add_space(4.0);
            upload_indicator(ui, status);
        }
        ui.add_space(8.0);
    });
}

/// Render the transcript, pinned to the newest message
fn render_transcript(ctx: &egui::Context, state: &SessionState, view: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .id_source("transcript_scroll")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add_space(8.0);
                for message in state.transcript.messages() {
                    message_bubble(ui, message);
                    ui.add_space(6.0);
                }

                if state.query.busy {
                    loading_bubble(ui);
                    ctx.request_repaint_after(std::time::Duration::from_millis(300));
                }

                if view.scroll.observe(state.transcript.len()) {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
    });
}
