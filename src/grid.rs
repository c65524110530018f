use std::path::PathBuf;

use crate::images::{ImageCache, THUMB_SIZE};
use crate::preview::{PreviewFilter, Thumbnail};
use crate::session::Command;

const SPACING: f32 = 6.0;

/// Filter bar and thumbnail rows under the viewer.
pub struct Grid {
    thumbnails: ImageCache,
    row_height: f32,
}

impl Grid {
    pub fn new(asset_root: PathBuf, http: reqwest::blocking::Client, row_height: f32) -> Self {
        Self {
            thumbnails: ImageCache::new(asset_root, THUMB_SIZE, http),
            row_height,
        }
    }

    pub fn poll(&mut self, ctx: &egui::Context) {
        self.thumbnails.poll(ctx);
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        active: PreviewFilter,
        thumbs: &[Thumbnail],
        current: Option<usize>,
        commands: &mut Vec<Command>,
    ) {
        ui.heading("Gallery preview");
        ui.horizontal_wrapped(|ui| {
            for filter in PreviewFilter::OPTIONS {
                let text = egui::RichText::new(filter.label());
                let text = if filter == active { text.strong() } else { text };
                let mut button = egui::Button::new(text);
                if filter == active {
                    button = button.fill(egui::Color32::DARK_GREEN);
                }
                if ui.add(button).clicked() {
                    commands.push(Command::SetFilter(filter));
                }
            }
        });
        ui.add_space(8.0);

        if thumbs.is_empty() {
            ui.label(egui::RichText::new("No photos match this filter").weak());
            return;
        }

        let max_w = ui.available_width();
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(SPACING, SPACING);
            for thumb in thumbs {
                let size = cell_size(thumb.width, thumb.height, self.row_height, max_w);
                let is_current = current == Some(thumb.index);
                if self.draw_cell(ui, thumb, size, is_current) {
                    commands.push(Command::OpenPreview {
                        index: thumb.index,
                        id: thumb.id.clone(),
                    });
                }
            }
        });
    }

    fn draw_cell(
        &mut self,
        ui: &mut egui::Ui,
        thumb: &Thumbnail,
        size: egui::Vec2,
        selected: bool,
    ) -> bool {
        let tex = self.thumbnails.texture(&thumb.src, ui.ctx());
        let (rect, resp) = ui.allocate_exact_size(size, egui::Sense::click());
        let painter = ui.painter();

        match tex {
            Some(tex) => {
                painter.image(
                    tex.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            None => {
                painter.rect_filled(rect, 4.0, egui::Color32::from_gray(40));
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "…",
                    egui::FontId::proportional(22.0),
                    egui::Color32::GRAY,
                );
            }
        }

        if selected {
            painter.rect_stroke(
                rect,
                2.0,
                egui::Stroke::new(3.0, ui.visuals().selection.bg_fill),
                egui::StrokeKind::Inside,
            );
        } else if resp.hovered() {
            painter.rect_filled(rect, 0.0, egui::Color32::from_white_alpha(24));
        }

        let label = if thumb.alt.is_empty() { &thumb.id } else { &thumb.alt };
        resp.on_hover_text(label).clicked()
    }
}

/// Cell size for a thumbnail scaled to the row height, capped at `max_w`.
fn cell_size(width: u32, height: u32, row_height: f32, max_w: f32) -> egui::Vec2 {
    let aspect = if width == 0 || height == 0 {
        4.0 / 3.0
    } else {
        width as f32 / height as f32
    };
    let w = row_height * aspect;
    if w > max_w && max_w > 0.0 {
        egui::vec2(max_w, max_w / aspect)
    } else {
        egui::vec2(w, row_height)
    }
}

#[cfg(test)]
mod tests {
    use super::cell_size;

    #[test]
    fn cell_keeps_aspect_at_row_height() {
        assert_eq!(cell_size(600, 300, 150.0, 1000.0), egui::vec2(300.0, 150.0));
        assert_eq!(cell_size(300, 600, 150.0, 1000.0), egui::vec2(75.0, 150.0));
    }

    #[test]
    fn panoramas_shrink_to_fit_width() {
        assert_eq!(cell_size(4000, 500, 150.0, 600.0), egui::vec2(600.0, 75.0));
    }

    #[test]
    fn degenerate_sizes_use_default_aspect() {
        let size = cell_size(0, 0, 150.0, 1000.0);
        assert!((size.x - 200.0).abs() < 0.01);
        assert_eq!(size.y, 150.0);
    }
}
