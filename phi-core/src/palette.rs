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

use crate::action_registry::ActionRegistry;
use crate::keys::{CursorDirection, KeyState, LogicalKey};
use crate::layout::Rect;
use crate::text_buffer::TextBuffer;

/// What the palette wants the view to do after consuming input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteEvent {
    /// Nothing was consumed
    Ignored,
    /// The command line changed
    Edited,
    /// Enter was pressed with this command line
    Submit(String),
    /// Escape was pressed
    Dismiss,
}

/// Overlay for typing commands. Lives as long as the view; only shown and hidden.
/// The pane that opened it is tracked by the view's focus state.
pub struct CommandPalette {
    input: Box<dyn TextBuffer>,
    /// Action names matching the command word typed so far
    matches: Vec<String>,
    /// Query the matches were computed for
    matched_query: Option<String>,
    rect: Rect,
}

impl CommandPalette {
    pub(crate) fn new(input: Box<dyn TextBuffer>) -> Self {
        Self {
            input,
            matches: Vec::new(),
            matched_query: None,
            rect: Rect::default(),
        }
    }

    pub fn input(&self) -> &dyn TextBuffer {
        self.input.as_ref()
    }

    /// The command line typed so far
    pub fn input_text(&self) -> String {
        self.input.contents()
    }

    pub fn matches(&self) -> &[String] {
        &self.matches
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub(crate) fn clear_input(&mut self) {
        self.input.clear();
        self.matches.clear();
        self.matched_query = None;
    }

    /// Consume queued keys until the line is submitted or dismissed. Keys after Enter or
    /// Escape stay queued.
    pub(crate) fn process_input(&mut self, input: &mut KeyState) -> PaletteEvent {
        let mut event = PaletteEvent::Ignored;
        while let Some(key) = input.pop_key() {
            match key {
                LogicalKey::Enter => return PaletteEvent::Submit(self.input_text()),
                LogicalKey::Esc => return PaletteEvent::Dismiss,
                LogicalKey::AlphaNumeric(c) => self.input.insert_char(c),
                LogicalKey::Backspace => self.input.backspace(),
                LogicalKey::Delete => self.input.delete_forward(),
                LogicalKey::Left => self.input.move_cursor(CursorDirection::Left),
                LogicalKey::Right => self.input.move_cursor(CursorDirection::Right),
                LogicalKey::Home => self.input.move_cursor(CursorDirection::LineStart),
                LogicalKey::End => self.input.move_cursor(CursorDirection::LineEnd),
                LogicalKey::Tab => {
                    if !self.complete() {
                        continue;
                    }
                }
                _ => continue,
            }
            event = PaletteEvent::Edited;
        }
        event
    }

    /// Replace a lone command word with the first match
    fn complete(&mut self) -> bool {
        let text = self.input_text();
        if text.contains(char::is_whitespace) {
            return false;
        }
        let Some(first) = self.matches.first().cloned() else {
            return false;
        };
        if first == text {
            return false;
        }
        self.input.clear();
        for c in first.chars() {
            self.input.insert_char(c);
        }
        true
    }

    /// Refresh the completion list for the current command word. Does nothing while the
    /// palette is not focused. Returns true if the list changed.
    pub(crate) fn update(&mut self, focused: bool, registry: &ActionRegistry) -> bool {
        if !focused {
            return false;
        }
        let text = self.input_text();
        let query = text.split_whitespace().next().unwrap_or("").to_string();
        if self.matched_query.as_deref() == Some(query.as_str()) {
            return false;
        }
        let matches: Vec<String> = registry
            .find_actions(&query)
            .iter()
            .map(|action| action.name.clone())
            .collect();
        self.matched_query = Some(query);
        let changed = matches != self.matches;
        self.matches = matches;
        changed
    }
}

/// Split a command line into the action name and its arguments
pub fn parse_command_line(line: &str) -> Option<(String, Vec<String>)> {
    let mut words = line.split_whitespace().map(str::to_string);
    let name = words.next()?;
    Some((name, words.collect()))
}
