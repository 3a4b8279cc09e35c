//! Input payloads from the render surface and keyboard shortcut mapping.

use crate::shapes::ShapeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier key state accompanying pointer and keyboard events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Platform command key: Ctrl, or Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer event as reported by the render surface.
///
/// `position` is in stage coordinates; `target` is the topmost shape under
/// the pointer as hit-tested by the renderer, when any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub target: Option<ShapeId>,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn at(position: Point) -> Self {
        Self {
            position,
            target: None,
            modifiers: Modifiers::default(),
        }
    }

    pub fn on_shape(position: Point, target: ShapeId) -> Self {
        Self {
            position,
            target: Some(target),
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Delete,
    Backspace,
    Escape,
}

/// Semantic editor commands produced by keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
    Group,
    Ungroup,
    DeleteSelection,
    SelectAll,
    CancelPlacement,
}

/// Map a key press to an editor command.
///
/// All shortcuts are suppressed while a text input control holds focus so
/// typing never mutates the scene.
pub fn command_for_key(key: Key, modifiers: Modifiers, text_input_focused: bool) -> Option<Command> {
    if text_input_focused {
        return None;
    }
    match key {
        Key::Char(c) if modifiers.command() => match (c.to_ascii_lowercase(), modifiers.shift) {
            ('z', false) => Some(Command::Undo),
            ('z', true) => Some(Command::Redo),
            ('y', false) => Some(Command::Redo),
            ('g', false) => Some(Command::Group),
            ('g', true) => Some(Command::Ungroup),
            ('a', false) => Some(Command::SelectAll),
            _ => None,
        },
        Key::Delete | Key::Backspace => Some(Command::DeleteSelection),
        Key::Escape => Some(Command::CancelPlacement),
        Key::Char(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Modifiers::default()
        }
    }

    fn cmd_shift() -> Modifiers {
        Modifiers {
            meta: true,
            shift: true,
            ..Modifiers::default()
        }
    }

    #[test]
    fn test_undo_redo_shortcuts() {
        assert_eq!(
            command_for_key(Key::Char('z'), ctrl(), false),
            Some(Command::Undo)
        );
        assert_eq!(
            command_for_key(Key::Char('z'), cmd_shift(), false),
            Some(Command::Redo)
        );
        assert_eq!(
            command_for_key(Key::Char('y'), ctrl(), false),
            Some(Command::Redo)
        );
    }

    #[test]
    fn test_group_shortcuts() {
        assert_eq!(
            command_for_key(Key::Char('g'), ctrl(), false),
            Some(Command::Group)
        );
        assert_eq!(
            command_for_key(Key::Char('g'), cmd_shift(), false),
            Some(Command::Ungroup)
        );
    }

    #[test]
    fn test_delete_keys_need_no_modifier() {
        assert_eq!(
            command_for_key(Key::Delete, Modifiers::default(), false),
            Some(Command::DeleteSelection)
        );
        assert_eq!(
            command_for_key(Key::Backspace, Modifiers::default(), false),
            Some(Command::DeleteSelection)
        );
    }

    #[test]
    fn test_plain_letter_is_not_a_command() {
        assert_eq!(command_for_key(Key::Char('z'), Modifiers::default(), false), None);
    }

    #[test]
    fn test_text_focus_suppresses_shortcuts() {
        assert_eq!(command_for_key(Key::Char('z'), ctrl(), true), None);
        assert_eq!(command_for_key(Key::Backspace, Modifiers::default(), true), None);
        assert_eq!(command_for_key(Key::Escape, Modifiers::default(), true), None);
    }
}
