use crate::{
    config::AppConfig,
    grid::Grid,
    session::{Command, Session},
    tagging::Tag,
    viewer::{self, Viewer},
};

/// Maps a key to its command. Digits go through the tag vocabulary.
/// Matching ignores Shift, so `b` and `B` both go back.
fn binding(key: egui::Key) -> Option<Command> {
    match key {
        egui::Key::Space => Some(Command::Next),
        egui::Key::B => Some(Command::Previous),
        _ => {
            let mut name = key.name().chars();
            match (name.next(), name.next()) {
                (Some(digit), None) => Tag::from_digit(digit).map(Command::ToggleTag),
                _ => None,
            }
        }
    }
}

/// Pulls bound key presses out of the frame's input, in the order they
/// happened, so egui does not also act on them.
fn key_commands(input: &mut egui::InputState) -> Vec<Command> {
    let mut commands = Vec::new();
    input.events.retain(|event| {
        let egui::Event::Key {
            key,
            pressed: true,
            modifiers,
            ..
        } = event
        else {
            return true;
        };
        if !modifiers.matches_logically(egui::Modifiers::NONE) {
            return true;
        }
        match binding(*key) {
            Some(command) => {
                commands.push(command);
                false
            }
            None => true,
        }
    });
    commands
}

pub struct PhototagApp {
    session: Session,
    viewer: Viewer,
    grid: Grid,
    config: AppConfig,
}

impl PhototagApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        session: Session,
        viewer: Viewer,
        grid: Grid,
    ) -> Self {
        Self {
            session,
            viewer,
            grid,
            config,
        }
    }

    fn apply_all(&mut self, commands: Vec<Command>) {
        for command in commands {
            self.session.apply(command);
        }
    }
}

impl eframe::App for PhototagApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window size for saving on exit
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.config.window_width = Some(rect.width());
            self.config.window_height = Some(rect.height());
        }

        self.viewer.poll(ctx);
        self.grid.poll(ctx);

        if self.session.gallery().is_empty() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label("No photos");
                });
            });
            return;
        }

        let keyed = ctx.input_mut(key_commands);
        self.apply_all(keyed);

        let mut clicked: Vec<Command> = Vec::new();

        egui::TopBottomPanel::top("review_header").show(ctx, |ui| {
            ui.add_space(8.0);
            viewer::show_shortcuts(ui);
            ui.add_space(8.0);
            let nav = self.session.navigator();
            viewer::show_nav(ui, nav.cursor(), nav.len(), &mut clicked);
            ui.add_space(4.0);
        });

        if let Some(photo) = self.session.current() {
            egui::SidePanel::right("tags_panel")
                .resizable(false)
                .exact_width(220.0)
                .show(ctx, |ui| {
                    viewer::show_tags(ui, photo, &mut clicked);
                });
        }

        let mut scroll = egui::ScrollArea::vertical()
            .id_salt("review_scroll")
            .auto_shrink([false, false]);
        if self.session.take_scroll_request() {
            scroll = scroll.vertical_scroll_offset(0.0);
        }

        let current = self.session.current().cloned();
        let current_index = self.session.navigator().current_index();
        let filter = self.session.filter();
        let thumbs = self.session.thumbnails();
        let viewer = &mut self.viewer;
        let grid = &mut self.grid;

        egui::CentralPanel::default().show(ctx, |ui| {
            scroll.show(ui, |ui| {
                if let Some(ref photo) = current {
                    viewer.show_photo(ui, photo);
                }
                ui.add_space(32.0);
                ui.separator();
                grid.show(ui, filter, &thumbs, current_index, &mut clicked);
            });
        });

        if !clicked.is_empty() {
            self.apply_all(clicked);
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.config.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: egui::Key, modifiers: egui::Modifiers) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }
    }

    fn commands_for(events: Vec<egui::Event>) -> Vec<Command> {
        let ctx = egui::Context::default();
        let raw = egui::RawInput {
            events,
            ..Default::default()
        };
        let mut out = Vec::new();
        let _ = ctx.run(raw, |ctx| {
            out = ctx.input_mut(key_commands);
        });
        out
    }

    #[test]
    fn digits_follow_vocabulary_order() {
        for tag in Tag::ALL {
            let key = egui::Key::from_name(&tag.digit().to_string()).unwrap();
            assert_eq!(binding(key), Some(Command::ToggleTag(tag)));
        }
        assert_eq!(binding(egui::Key::Num0), None);
        assert_eq!(binding(egui::Key::Num6), None);
        assert_eq!(binding(egui::Key::A), None);
    }

    #[test]
    fn b_goes_back_regardless_of_case() {
        let cmds = commands_for(vec![
            press(egui::Key::B, egui::Modifiers::NONE),
            press(egui::Key::B, egui::Modifiers::SHIFT),
        ]);
        assert_eq!(cmds, vec![Command::Previous, Command::Previous]);
    }

    #[test]
    fn bound_keys_come_out_in_press_order() {
        let cmds = commands_for(vec![
            press(egui::Key::Space, egui::Modifiers::NONE),
            press(egui::Key::A, egui::Modifiers::NONE),
            press(egui::Key::Num3, egui::Modifiers::NONE),
            press(egui::Key::Num1, egui::Modifiers::COMMAND),
        ]);
        assert_eq!(
            cmds,
            vec![Command::Next, Command::ToggleTag(Tag::Landscape)]
        );
    }
}
