use std::num::NonZeroUsize;

use eframe::egui;

use crate::core::ViewerCommand;

/// Side panel with the navigation buttons, step size and go-to field.
pub struct ControlsPanel {
    pub goto_input: String,
    pub step_size: usize,
    pub goto_error: Option<String>,
}

impl ControlsPanel {
    pub fn new(step_size: NonZeroUsize) -> Self {
        Self {
            goto_input: String::new(),
            step_size: step_size.get(),
            goto_error: None,
        }
    }

    /// Draws the panel and returns the command the user asked for, if any.
    pub fn show(&mut self, ui: &mut egui::Ui, enabled: bool, total: usize) -> Option<ViewerCommand> {
        let mut command = None;

        ui.add_enabled_ui(enabled, |ui| {
            ui.vertical(|ui| {
                if ui.button("Next Image").clicked() {
                    command = Some(ViewerCommand::Next);
                }
                if ui.button("Previous Image").clicked() {
                    command = Some(ViewerCommand::Previous);
                }

                ui.add_space(12.0);
                ui.label("Step size");
                let response = ui.add(egui::DragValue::new(&mut self.step_size).range(1..=100_000));
                if response.changed() {
                    if let Some(step_size) = NonZeroUsize::new(self.step_size) {
                        command = Some(ViewerCommand::SetStepSize(step_size));
                    }
                }

                ui.add_space(12.0);
                ui.label(format!("Go to frame (1-{})", total.max(1)));
                ui.horizontal(|ui| {
                    let field = ui.add(egui::TextEdit::singleline(&mut self.goto_input).desired_width(70.0));
                    let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Go").clicked() || submitted {
                        match parse_frame_number(&self.goto_input) {
                            Ok(index) => {
                                self.goto_error = None;
                                command = Some(ViewerCommand::GoTo(index));
                            }
                            Err(e) => self.goto_error = Some(e),
                        }
                    }
                });
                if let Some(ref error) = self.goto_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, error);
                }
            });
        });

        command
    }
}

/// Turns the 1-based frame number typed by the user into a frame index.
pub fn parse_frame_number(input: &str) -> Result<usize, String> {
    let trimmed = input.trim();
    let number = trimmed
        .parse::<usize>()
        .map_err(|_| format!("'{}' is not a frame number", trimmed))?;
    if number == 0 {
        return Err("Frame numbers start at 1".to_string());
    }
    Ok(number - 1)
}
