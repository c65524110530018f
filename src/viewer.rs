use std::path::PathBuf;

use crate::images::{ImageCache, PREVIEW_MAX};
use crate::photo::Photo;
use crate::session::Command;
use crate::tagging::Tag;

const FRAME_WIDTH: f32 = 1000.0;
const FRAME_HEIGHT: f32 = 600.0;
const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x4c, 0xaf, 0x50);

/// Current photo display plus the tag and navigation controls.
pub struct Viewer {
    images: ImageCache,
}

impl Viewer {
    pub fn new(asset_root: PathBuf, http: reqwest::blocking::Client) -> Self {
        Self {
            images: ImageCache::new(asset_root, PREVIEW_MAX, http),
        }
    }

    pub fn poll(&mut self, ctx: &egui::Context) {
        self.images.poll(ctx);
    }

    pub fn show_photo(&mut self, ui: &mut egui::Ui, photo: &Photo) {
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(&photo.id).strong().size(13.0));
            ui.add_space(8.0);

            let frame = egui::vec2(ui.available_width().min(FRAME_WIDTH), FRAME_HEIGHT);
            let (rect, resp) = ui.allocate_exact_size(frame, egui::Sense::hover());
            ui.painter().rect_stroke(
                rect,
                0.0,
                egui::Stroke::new(1.0, egui::Color32::from_gray(70)),
                egui::StrokeKind::Inside,
            );

            match self.images.texture(&photo.src, ui.ctx()) {
                Some(tex) => {
                    let tex_size = tex.size_vec2();
                    let scale = (frame.x / tex_size.x).min(frame.y / tex_size.y);
                    let draw_rect = egui::Rect::from_center_size(rect.center(), tex_size * scale);
                    ui.painter().image(
                        tex.id(),
                        draw_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                None if self.images.failed(&photo.src) => {
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "⚠ Could not open image",
                        egui::FontId::proportional(14.0),
                        ui.visuals().warn_fg_color,
                    );
                }
                None => {
                    egui::Spinner::new().paint_at(
                        ui,
                        egui::Rect::from_center_size(rect.center(), egui::vec2(24.0, 24.0)),
                    );
                }
            }

            if !photo.alt.is_empty() {
                resp.on_hover_text(&photo.alt);
            }
        });
    }
}

pub fn show_shortcuts(ui: &mut egui::Ui) {
    egui::Frame::group(ui.style())
        .fill(egui::Color32::from_gray(42))
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.label(egui::RichText::new("⌨ Keyboard Shortcuts").strong().size(15.0));
            ui.add_space(6.0);
            egui::Grid::new("shortcut_grid")
                .num_columns(2)
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new("Tags:").color(ACCENT).strong());
                        ui.label("press");
                        ui.code("1");
                        ui.label("-");
                        ui.code("5");
                        ui.label("to toggle");
                    });
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new("Next:").color(ACCENT).strong());
                        ui.label("press");
                        ui.code("Space");
                    });
                    ui.end_row();

                    let legend = Tag::ALL
                        .iter()
                        .map(|t| format!("{}: {}", t.digit(), t.as_str()))
                        .collect::<Vec<_>>()
                        .join(" | ");
                    ui.label(egui::RichText::new(legend).small().weak());
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new("Previous:").color(ACCENT).strong());
                        ui.label("press");
                        ui.code("B");
                    });
                    ui.end_row();
                });
        });
}

pub fn show_nav(ui: &mut egui::Ui, position: usize, total: usize, commands: &mut Vec<Command>) {
    ui.horizontal(|ui| {
        if ui.button("Previous").clicked() {
            commands.push(Command::Previous);
        }
        if ui.button("Next").clicked() {
            commands.push(Command::Next);
        }
        ui.label(egui::RichText::new(position_label(position, total)).weak());
    });
}

fn position_label(position: usize, total: usize) -> String {
    if total == 0 {
        return "0 / 0".to_string();
    }
    format!("{} / {}", position + 1, total)
}

pub fn show_tags(ui: &mut egui::Ui, photo: &Photo, commands: &mut Vec<Command>) {
    ui.heading("Tags");
    ui.add_space(4.0);
    for tag in Tag::ALL {
        let active = photo.has_tag(tag.as_str());
        let mut button = egui::Button::new(tag.as_str()).min_size(egui::vec2(ui.available_width(), 0.0));
        if active {
            button = button.fill(egui::Color32::DARK_GREEN);
        }
        if ui
            .add(button)
            .on_hover_text(format!("Key {}", tag.digit()))
            .clicked()
        {
            commands.push(Command::ToggleTag(tag));
        }
    }

    ui.add_space(16.0);
    ui.label(egui::RichText::new("Current tags:").strong());
    ui.horizontal_wrapped(|ui| {
        for t in &photo.tags {
            egui::Frame::new()
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(120)))
                .corner_radius(4.0)
                .inner_margin(egui::Margin::symmetric(8, 4))
                .show(ui, |ui| {
                    ui.label(t);
                });
        }
    });
}
