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

use crate::keys::{CursorDirection, KeyState, LogicalKey};
use crate::layout::Rect;
use crate::text_buffer::TextBuffer;
use crate::PaneId;

/// A rectangular region of the view hosting one text buffer.
///
/// Whether the pane has focus is owned by the view, not the pane, so there is no way
/// for two panes to both believe they are focused.
pub struct Pane {
    id: PaneId,
    /// Stable ordering key. Panes are laid out left to right by ascending index.
    index: usize,
    buffer: Box<dyn TextBuffer>,
    rect: Rect,
    /// First buffer line shown at the top of the pane
    scroll: usize,
    tab_width: usize,
}

impl Pane {
    pub(crate) fn new(
        id: PaneId,
        index: usize,
        buffer: Box<dyn TextBuffer>,
        tab_width: usize,
    ) -> Self {
        Pane {
            id,
            index,
            buffer,
            rect: Rect::default(),
            scroll: 0,
            tab_width,
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn buffer(&self) -> &dyn TextBuffer {
        self.buffer.as_ref()
    }

    pub fn buffer_mut(&mut self) -> &mut dyn TextBuffer {
        self.buffer.as_mut()
    }

    /// Name shown in the modeline and in notices.
    pub fn title(&self) -> String {
        match self.buffer.file_path() {
            Some(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            None => "*scratch*".to_string(),
        }
    }

    /// Rows available for text: the top border and the modeline take one row each.
    pub fn content_height(&self) -> usize {
        self.rect.height.saturating_sub(2) as usize
    }

    /// Apply every queued key press to the buffer. Returns true if anything was consumed.
    pub fn process_input(&mut self, input: &mut KeyState) -> bool {
        let mut dirty = false;
        for key in input.take() {
            dirty |= self.apply_key(key);
        }
        dirty
    }

    fn apply_key(&mut self, key: LogicalKey) -> bool {
        match key {
            LogicalKey::AlphaNumeric(c) => self.buffer.insert_char(c),
            LogicalKey::Enter => self.buffer.insert_char('\n'),
            LogicalKey::Tab => {
                for _ in 0..self.tab_width {
                    self.buffer.insert_char(' ');
                }
            }
            LogicalKey::Backspace => self.buffer.backspace(),
            LogicalKey::Delete => self.buffer.delete_forward(),
            LogicalKey::Left => self.buffer.move_cursor(CursorDirection::Left),
            LogicalKey::Right => self.buffer.move_cursor(CursorDirection::Right),
            LogicalKey::Up => self.buffer.move_cursor(CursorDirection::Up),
            LogicalKey::Down => self.buffer.move_cursor(CursorDirection::Down),
            LogicalKey::Home => self.buffer.move_cursor(CursorDirection::LineStart),
            LogicalKey::End => self.buffer.move_cursor(CursorDirection::LineEnd),
            LogicalKey::PageUp => {
                for _ in 0..self.content_height().max(1) {
                    self.buffer.move_cursor(CursorDirection::Up);
                }
            }
            LogicalKey::PageDown => {
                for _ in 0..self.content_height().max(1) {
                    self.buffer.move_cursor(CursorDirection::Down);
                }
            }
            LogicalKey::Esc | LogicalKey::Unmapped => return false,
        }
        true
    }

    /// Advance per-frame state: scroll so the cursor line stays visible.
    /// Returns true if the viewport moved.
    pub fn update(&mut self) -> bool {
        let height = self.content_height();
        if height == 0 {
            return false;
        }
        let (_, line) = self.buffer.cursor();
        let old_scroll = self.scroll;
        if line < self.scroll {
            self.scroll = line;
        } else if line >= self.scroll + height {
            self.scroll = line + 1 - height;
        }
        self.scroll != old_scroll
    }
}
