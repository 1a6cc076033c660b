use crate::model::{Mode, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Left,
    Right,
    Middle,
}

/// Set of held buttons during a drag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const LEFT: Buttons = Buttons(1);
    pub const RIGHT: Buttons = Buttons(1 << 1);
    pub const MIDDLE: Buttons = Buttons(1 << 2);

    pub fn from_bits(bits: u8) -> Self {
        Buttons(bits & 0b111)
    }
    pub fn bits(self) -> u8 {
        self.0
    }
    pub fn contains(self, b: Button) -> bool {
        self.0 & Buttons::from(b).0 != 0
    }
}

impl From<Button> for Buttons {
    fn from(b: Button) -> Self {
        match b {
            Button::Left => Buttons::LEFT,
            Button::Right => Buttons::RIGHT,
            Button::Middle => Buttons::MIDDLE,
        }
    }
}

impl std::ops::BitOr for Buttons {
    type Output = Buttons;
    fn bitor(self, o: Buttons) -> Buttons {
        Buttons(self.0 | o.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Escape,
    Other,
}

impl Key {
    /// Maps DOM-style key names (`"n"`, `"Escape"`, ...). Letters are
    /// case-insensitive.
    pub fn from_name(name: &str) -> Key {
        if name == "Escape" || name == "Esc" {
            return Key::Escape;
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
            _ => Key::Other,
        }
    }
}

/// Discrete interaction events, consumed in arrival order. Points are in
/// screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown { point: Vec2, button: Button },
    PointerDrag { point: Vec2, delta: Vec2, buttons: Buttons },
    PointerUp { point: Vec2, button: Button },
    KeyDown { key: Key },
    KeyUp { key: Key },
    Scroll { delta: f64 },
    /// The host lost focus mid-gesture.
    FocusLost,
}

/// Editor command bound to a key release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    SetMode(Mode),
    Undo,
    Redo,
    Save,
    Load,
    ClearSelection,
    HideOverlay,
    Quit,
}

/// Overlay shown while its key is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    Help,
    Info,
}

pub fn action_for_key_up(key: Key) -> Option<Action> {
    let action = match key {
        Key::Char('n') => Action::SetMode(Mode::Node),
        Key::Char('e') => Action::SetMode(Mode::Edge),
        Key::Char('d') => Action::SetMode(Mode::Delete),
        Key::Char('m') => Action::SetMode(Mode::Modify),
        Key::Char('z') => Action::Undo,
        Key::Char('y') => Action::Redo,
        Key::Char('s') => Action::Save,
        Key::Char('l') => Action::Load,
        Key::Char('h') | Key::Char('i') => Action::HideOverlay,
        Key::Char('q') => Action::Quit,
        Key::Escape => Action::ClearSelection,
        _ => return None,
    };
    Some(action)
}

pub fn overlay_for_key_down(key: Key) -> Option<Overlay> {
    match key {
        Key::Char('h') => Some(Overlay::Help),
        Key::Char('i') => Some(Overlay::Info),
        _ => None,
    }
}

pub const HELP_TEXT: &str = "\
Modes
  n  node    click empty space to add a node, click a node to select it
  e  edge    click two nodes to connect them, click again to deselect
  d  delete  click a node or an edge to delete it
  m  modify  drag the selected node to move it

Commands
  z  undo            y  redo
  s  save graph      l  load graph
  Esc  clear selection
  h  (hold) help     i  (hold) info
  q  quit

View
  right drag  pan    scroll  zoom";
