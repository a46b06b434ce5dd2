use egui::{Key, Modifiers};

use crate::core::ViewerCommand;

/// Keyboard shortcuts understood by the viewer window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    NextFrame,
    PreviousFrame,
    OpenDirectory,
}

impl KeyAction {
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        match key {
            Key::ArrowRight if modifiers.is_none() => Some(KeyAction::NextFrame),
            Key::ArrowLeft if modifiers.is_none() => Some(KeyAction::PreviousFrame),
            Key::O if modifiers.command_only() => Some(KeyAction::OpenDirectory),
            _ => None,
        }
    }

    /// Session command for this shortcut. Opening a directory goes through
    /// the folder dialog first, so it has none.
    pub fn to_command(self) -> Option<ViewerCommand> {
        match self {
            KeyAction::NextFrame => Some(ViewerCommand::Next),
            KeyAction::PreviousFrame => Some(ViewerCommand::Previous),
            KeyAction::OpenDirectory => None,
        }
    }
}
