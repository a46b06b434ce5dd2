use crate::hotkeys::KeyAction;

pub struct KeyBindings;

impl KeyBindings {
    /// Shortcuts pressed since the last frame, in the order they arrived.
    ///
    /// Nothing is reported while a text field has focus so typing a frame
    /// number does not also move the viewer.
    pub fn collect(ctx: &egui::Context) -> Vec<KeyAction> {
        if ctx.wants_keyboard_input() {
            return Vec::new();
        }
        ctx.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key { key, pressed: true, modifiers, .. } => {
                        KeyAction::from_key(*key, *modifiers)
                    }
                    _ => None,
                })
                .collect()
        })
    }
}
