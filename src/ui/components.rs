// Reusable UI components
// Message bubbles, agent rows, the loading bubble and the upload status line

use eframe::egui;
use medify_client::{Message, Role, UploadStatus};

/// Render one transcript message
/// User messages are right-aligned; assistant messages show their origin agent
pub fn message_bubble(ui: &mut egui::Ui, message: &Message) {
    let (fill, align) = match message.role {
        Role::User => (ui.visuals().selection.bg_fill, egui::Align::Max),
        Role::Assistant => (ui.visuals().faint_bg_color, egui::Align::Min),
    };
    let max_width = ui.available_width() * 0.75;

    ui.with_layout(egui::Layout::top_down(align), |ui| {
        let mut frame = egui::Frame::none();
        frame.fill = fill;
        frame.rounding = egui::Rounding::same(8.0);
        frame.inner_margin = egui::Margin::same(10.0);

        frame.show(ui, |ui| {
            ui.set_max_width(max_width);
            ui.vertical(|ui| {
                if let Some(agent) = &message.origin_agent {
                    ui.label(egui::RichText::new(format!("[{}]", agent)).small().weak());
                    ui.add_space(4.0);
                }
                ui.label(&message.content);
            });
        });
    });
}

/// Render the "assistant is typing" bubble shown while a query is in flight
pub fn loading_bubble(ui: &mut egui::Ui) {
    let dots = (ui.input(|i| i.time) * 3.0) as usize % 3 + 1;

    let mut frame = egui::Frame::none();
    frame.fill = ui.visuals().faint_bg_color;
    frame.rounding = egui::Rounding::same(8.0);
    frame.inner_margin = egui::Margin::same(10.0);
    frame.show(ui, |ui| {
        ui.label(egui::RichText::new(".".repeat(dots)).strong());
    });
}

/// Render a sidebar row for an agent with a green status dot
pub fn agent_row(ui: &mut egui::Ui, name: &str) {
    ui.horizontal(|ui| {
        ui.add_space(8.0);
        status_indicator(ui);
        ui.add_space(4.0);
        ui.label(name);
    });
}

/// Render a small filled status dot
fn status_indicator(ui: &mut egui::Ui) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
    ui.painter()
        .circle_filled(rect.center(), 4.0, egui::Color32::from_rgb(0, 200, 0));
}

/// Render the upload status line
/// Colors: Success (green), Upload failed / Error (red), anything else (gray)
pub fn upload_indicator(ui: &mut egui::Ui, status: &str) {
    ui.colored_label(status_color(status), status);
}

/// Color for an upload status label
pub fn status_color(status: &str) -> egui::Color32 {
    if status == UploadStatus::Success.label() {
        egui::Color32::from_rgb(0, 180, 0)
    } else if status == UploadStatus::Failed.label() || status == UploadStatus::Error.label() {
        egui::Color32::from_rgb(220, 0, 0)
    } else {
        egui::Color32::GRAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color("Success!"), egui::Color32::from_rgb(0, 180, 0));
        assert_eq!(status_color("Upload failed"), egui::Color32::from_rgb(220, 0, 0));
        assert_eq!(status_color("Error"), egui::Color32::from_rgb(220, 0, 0));
        assert_eq!(status_color("Uploading..."), egui::Color32::GRAY);
    }
}
