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

use crate::error::BufferError;
use crate::keys::CursorDirection;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Prefix for scratch files created when the editor starts without file arguments.
pub const SCRATCH_PREFIX: &str = "phi-editor-";

/// The editable text behind a pane or the command palette.
///
/// The view only needs to know whether a buffer is modified, where it lives, and how to
/// open and save it; the editing calls are what panes forward key presses to.
pub trait TextBuffer {
    /// Replace the contents with the file at `path` and bind the buffer to it.
    fn open(&mut self, path: &Path) -> Result<(), BufferError>;

    /// Write the contents to the bound file. On failure the modified flag is kept.
    fn save(&mut self) -> Result<(), BufferError>;

    fn is_modified(&self) -> bool;

    fn file_path(&self) -> Option<&Path>;

    /// Bind the buffer to a path without reading it (for files that don't exist yet).
    fn set_file_path(&mut self, path: PathBuf);

    fn insert_char(&mut self, c: char);

    /// Delete the character before the cursor.
    fn backspace(&mut self);

    /// Delete the character under the cursor.
    fn delete_forward(&mut self);

    fn move_cursor(&mut self, direction: CursorDirection);

    /// Drop all content. Clearing is not an edit, so it doesn't mark the buffer modified.
    fn clear(&mut self);

    fn contents(&self) -> String;

    fn line_count(&self) -> usize;

    /// Text of line `line`, without its trailing newline. Out of range gives "".
    fn line(&self, line: usize) -> String;

    /// Cursor position as (column, line).
    fn cursor(&self) -> (usize, usize);
}

/// Rope-backed [`TextBuffer`].
#[derive(Debug, Default)]
pub struct RopeBuffer {
    buffer: ropey::Rope,
    /// Cursor as a char index into the rope
    cursor: usize,
    file_path: Option<PathBuf>,
    modified: bool,
}

impl RopeBuffer {
    pub fn new() -> Self {
        RopeBuffer::default()
    }

    pub fn with_text(text: &str) -> Self {
        RopeBuffer {
            buffer: ropey::Rope::from_str(text),
            ..Default::default()
        }
    }

    /// Length of a line in characters, not counting its line break.
    fn line_length(&self, line: usize) -> usize {
        let slice = self.buffer.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            if len > 1 && slice.char(len - 2) == '\r' {
                len - 2
            } else {
                len - 1
            }
        } else {
            len
        }
    }

    fn move_up(&self, pos: usize) -> usize {
        let line = self.buffer.char_to_line(pos);
        if line == 0 {
            return pos;
        }
        let column = pos - self.buffer.line_to_char(line);
        let target = line - 1;
        self.buffer.line_to_char(target) + column.min(self.line_length(target))
    }

    fn move_down(&self, pos: usize) -> usize {
        let line = self.buffer.char_to_line(pos);
        if line + 1 >= self.buffer.len_lines() {
            return pos;
        }
        let column = pos - self.buffer.line_to_char(line);
        let target = line + 1;
        self.buffer.line_to_char(target) + column.min(self.line_length(target))
    }
}

impl TextBuffer for RopeBuffer {
    fn open(&mut self, path: &Path) -> Result<(), BufferError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| BufferError::io(path, e))?;
        self.buffer = ropey::Rope::from_str(&content);
        self.cursor = 0;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    fn save(&mut self) -> Result<(), BufferError> {
        let path = self.file_path.as_ref().ok_or(BufferError::NoPath)?;
        // Write next to the target and rename over it, so a failed write never truncates
        // the file on disk.
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| BufferError::io(path, e))?;
        if let Ok(metadata) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| BufferError::io(path, e))?;
        }
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.buffer
                .write_to(&mut writer)
                .and_then(|_| writer.flush())
                .map_err(|e| BufferError::io(path, e))?;
        }
        tmp.persist(path)
            .map_err(|e| BufferError::io(path, e.error))?;
        self.modified = false;
        Ok(())
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn set_file_path(&mut self, path: PathBuf) {
        self.file_path = Some(path);
    }

    fn insert_char(&mut self, c: char) {
        self.buffer.insert_char(self.cursor, c);
        self.cursor += 1;
        self.modified = true;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.buffer.remove(self.cursor - 1..self.cursor);
        self.cursor -= 1;
        self.modified = true;
    }

    fn delete_forward(&mut self) {
        if self.cursor >= self.buffer.len_chars() {
            return;
        }
        self.buffer.remove(self.cursor..self.cursor + 1);
        self.modified = true;
    }

    fn move_cursor(&mut self, direction: CursorDirection) {
        let pos = self.cursor.min(self.buffer.len_chars());
        self.cursor = match direction {
            CursorDirection::Left => pos.saturating_sub(1),
            CursorDirection::Right => (pos + 1).min(self.buffer.len_chars()),
            CursorDirection::Up => self.move_up(pos),
            CursorDirection::Down => self.move_down(pos),
            CursorDirection::LineStart => {
                self.buffer.line_to_char(self.buffer.char_to_line(pos))
            }
            CursorDirection::LineEnd => {
                let line = self.buffer.char_to_line(pos);
                self.buffer.line_to_char(line) + self.line_length(line)
            }
        };
    }

    fn clear(&mut self) {
        self.buffer = ropey::Rope::new();
        self.cursor = 0;
    }

    fn contents(&self) -> String {
        self.buffer.to_string()
    }

    fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    fn line(&self, line: usize) -> String {
        if line >= self.buffer.len_lines() {
            return String::new();
        }
        let text = self.buffer.line(line).to_string();
        text.trim_end_matches(['\n', '\r']).to_string()
    }

    fn cursor(&self) -> (usize, usize) {
        let pos = self.cursor.min(self.buffer.len_chars());
        let line = self.buffer.char_to_line(pos);
        (pos - self.buffer.line_to_char(line), line)
    }
}

/// Create an empty scratch file in the temp directory and return its path. The file is
/// kept on disk after this returns.
pub fn scratch_file() -> Result<PathBuf, BufferError> {
    let file = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempfile()
        .map_err(|e| BufferError::io(std::env::temp_dir(), e))?;
    file.into_temp_path()
        .keep()
        .map_err(|e| BufferError::io(e.path.to_path_buf(), e.error))
}

/// Whether `path` names a file made by [`scratch_file`].
pub fn is_scratch_path(path: &Path) -> bool {
    let in_temp_dir = path.parent() == Some(std::env::temp_dir().as_path());
    let named = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with(SCRATCH_PREFIX));
    in_temp_dir && named
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_marks_modified() {
        let mut buffer = RopeBuffer::new();
        assert!(!buffer.is_modified());
        buffer.insert_char('h');
        buffer.insert_char('i');
        assert_eq!(buffer.contents(), "hi");
        assert_eq!(buffer.cursor(), (2, 0));
        assert!(buffer.is_modified());
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut buffer = RopeBuffer::with_text("abc");
        buffer.backspace();
        assert_eq!(buffer.contents(), "abc");
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_delete_forward() {
        let mut buffer = RopeBuffer::with_text("abc");
        buffer.delete_forward();
        assert_eq!(buffer.contents(), "bc");
        buffer.move_cursor(CursorDirection::LineEnd);
        buffer.delete_forward();
        assert_eq!(buffer.contents(), "bc");
    }

    #[test]
    fn test_vertical_movement_preserves_column() {
        let mut buffer = RopeBuffer::with_text("Hello\nab\nWorld");
        buffer.move_cursor(CursorDirection::LineEnd);
        assert_eq!(buffer.cursor(), (5, 0));

        // Clamped to the shorter line
        buffer.move_cursor(CursorDirection::Down);
        assert_eq!(buffer.cursor(), (2, 1));

        buffer.move_cursor(CursorDirection::Down);
        assert_eq!(buffer.cursor(), (2, 2));

        // Already on the last line
        buffer.move_cursor(CursorDirection::Down);
        assert_eq!(buffer.cursor(), (2, 2));

        buffer.move_cursor(CursorDirection::Up);
        buffer.move_cursor(CursorDirection::Up);
        buffer.move_cursor(CursorDirection::LineStart);
        // Already on the first line
        buffer.move_cursor(CursorDirection::Up);
        assert_eq!(buffer.cursor(), (0, 0));
    }

    #[test]
    fn test_line_strips_newline() {
        let buffer = RopeBuffer::with_text("one\r\ntwo\n");
        assert_eq!(buffer.line(0), "one");
        assert_eq!(buffer.line(1), "two");
        assert_eq!(buffer.line(2), "");
        assert_eq!(buffer.line(99), "");
    }

    #[test]
    fn test_clear_does_not_mark_modified() {
        let mut buffer = RopeBuffer::with_text("text");
        buffer.clear();
        assert_eq!(buffer.contents(), "");
        assert_eq!(buffer.cursor(), (0, 0));
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_save_without_path_fails() {
        let mut buffer = RopeBuffer::with_text("text");
        buffer.insert_char('!');
        let result = buffer.save();
        assert!(matches!(result, Err(BufferError::NoPath)));
        assert!(buffer.is_modified());
    }

    #[test]
    fn test_open_edit_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "first line\n").unwrap();

        let mut buffer = RopeBuffer::new();
        buffer.open(&path).unwrap();
        assert_eq!(buffer.file_path(), Some(path.as_path()));
        assert!(!buffer.is_modified());

        buffer.insert_char('>');
        assert!(buffer.is_modified());
        buffer.save().unwrap();
        assert!(!buffer.is_modified());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ">first line\n");
    }

    #[test]
    fn test_save_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "a much longer original line\n").unwrap();

        let mut buffer = RopeBuffer::new();
        buffer.open(&path).unwrap();
        buffer.clear();
        buffer.insert_char('z');
        buffer.save().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "z");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("notes.txt")]);
    }

    #[test]
    fn test_open_missing_file_leaves_buffer_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut buffer = RopeBuffer::with_text("keep me");
        let result = buffer.open(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(BufferError::Io { .. })));
        assert_eq!(buffer.contents(), "keep me");
        assert_eq!(buffer.file_path(), None);
    }

    #[test]
    fn test_failed_save_keeps_modified() {
        let dir = tempfile::tempdir().unwrap();
        let mut buffer = RopeBuffer::new();
        // A file cannot be renamed over a directory
        buffer.set_file_path(dir.path().to_path_buf());
        buffer.insert_char('x');
        assert!(buffer.save().is_err());
        assert!(buffer.is_modified());
    }

    #[test]
    fn test_scratch_file_is_kept() {
        let path = scratch_file().unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(SCRATCH_PREFIX));
        assert!(is_scratch_path(&path));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_named_file_is_not_scratch() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_scratch_path(&dir.path().join("phi-editor-notes.txt")));
        assert!(!is_scratch_path(&std::env::temp_dir().join("notes.txt")));
    }
}
