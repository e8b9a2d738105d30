// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CursorDirection {
    Left,
    Right,
    Up,
    Down,
    LineEnd,
    LineStart,
}

/// The set of keys we care about, that the frontend maps its physical keycodes to.
/// Modifiers are not keys here; they are tracked as held state in [`Modifiers`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LogicalKey {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    AlphaNumeric(char),
    Backspace,
    Enter,
    Home,
    End,
    Tab,
    Delete,
    Esc,
    Unmapped,
}

impl LogicalKey {
    pub fn as_display_string(&self) -> String {
        let s = match self {
            LogicalKey::Left => "←",
            LogicalKey::Right => "→",
            LogicalKey::Up => "↑",
            LogicalKey::Down => "↓",
            LogicalKey::PageUp => "PgUp",
            LogicalKey::PageDown => "PgDn",
            LogicalKey::AlphaNumeric(a) => return a.to_string(),
            LogicalKey::Backspace => "⌫",
            LogicalKey::Enter => "⏎",
            LogicalKey::Home => "Home",
            LogicalKey::End => "End",
            LogicalKey::Tab => "Tab",
            LogicalKey::Delete => "Del",
            LogicalKey::Esc => "Esc",
            LogicalKey::Unmapped => "Unmapped",
        };
        s.to_string()
    }

    /// The lower-cased character used to look this key up in the shortcut table.
    pub fn shortcut_char(&self) -> Option<char> {
        match self {
            LogicalKey::AlphaNumeric(c) => c.to_lowercase().next(),
            _ => None,
        }
    }
}

/// Modifier keys held during a frame.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn control() -> Self {
        Modifiers {
            control: true,
            ..Default::default()
        }
    }
}

/// Input state for one frame: which modifiers are held, and the key presses queued
/// since the last frame in the order they arrived.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    modifiers: Modifiers,
    keys: VecDeque<LogicalKey>,
}

impl KeyState {
    pub fn new() -> Self {
        KeyState::default()
    }

    pub fn with_modifiers(modifiers: Modifiers) -> Self {
        KeyState {
            modifiers,
            keys: VecDeque::new(),
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn press(&mut self, key: LogicalKey) {
        self.keys.push_back(key);
    }

    pub fn has_pending(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Pop the oldest pending key press.
    pub fn pop_key(&mut self) -> Option<LogicalKey> {
        self.keys.pop_front()
    }

    /// Take every pending key press, oldest first.
    pub fn take(&mut self) -> Vec<LogicalKey> {
        self.keys.drain(..).collect()
    }
}
