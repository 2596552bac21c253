//! egui rendering of the presentational variants (inline view next to the preview surface).

use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Ui};
use quickproto_core::{ContentRegion, PrototypeShell};

const CANVAS_HEIGHT: f32 = 220.0;
const MOBILE_WIDTH: f32 = 260.0;

/// Draw one shell. Stateless; empty content draws an empty region.
pub fn show_shell(ui: &mut Ui, shell: &PrototypeShell) {
    ui.group(|ui| {
        ui.label(RichText::new(shell.title).strong());
        ui.add_space(4.0);
        match &shell.region {
            ContentRegion::Preformatted(text) => {
                egui::ScrollArea::vertical()
                    .id_salt("shell_pre")
                    .max_height(260.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new(text.as_str()).monospace());
                    });
            }
            ContentRegion::Canvas(text) => {
                let width = ui.available_width();
                let (rect, _) = ui.allocate_exact_size(egui::vec2(width, CANVAS_HEIGHT), Sense::hover());
                let painter = ui.painter_at(rect);
                painter.rect_filled(rect, 4.0, Color32::from_rgb(16, 16, 24));
                let line = text.lines().next().unwrap_or_default();
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    line,
                    FontId::monospace(12.0),
                    Color32::LIGHT_GREEN,
                );
            }
            ContentRegion::EmbeddedDocument(doc) => {
                ui.label("Embedded document: opens in the browser's sandboxed frame.");
                ui.label(RichText::new(format!("{} bytes", doc.len())).small());
            }
            ContentRegion::MobileScreen(text) => {
                egui::Frame::group(ui.style())
                    .inner_margin(12.0)
                    .rounding(18.0)
                    .show(ui, |ui| {
                        ui.set_max_width(MOBILE_WIDTH);
                        egui::ScrollArea::vertical()
                            .id_salt("shell_mobile")
                            .max_height(420.0)
                            .show(ui, |ui| {
                                ui.label(text.as_str());
                            });
                    });
            }
        }
    });
}
