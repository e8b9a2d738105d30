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

/// Rows the command palette occupies: border, input line, border.
pub const PALETTE_MIN_HEIGHT: u16 = 3;

/// Completion rows shown under the palette input.
pub const PALETTE_MAX_MATCHES: u16 = 6;

/// A rectangle of the window, in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the right-most column.
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }
}

/// Split a `width` x `height` window into `count` equal columns, left to right.
///
/// Each column is `width / count` wide; the division remainder is left uncovered at the
/// right edge. Zero columns gives an empty layout.
pub fn equal_columns(count: usize, width: u16, height: u16) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let column_width = (width as usize / count) as u16;
    (0..count)
        .map(|position| {
            // position < count and column_width * count <= width, so this fits in u16
            let x = (column_width as usize * position) as u16;
            Rect::new(x, 0, column_width, height)
        })
        .collect()
}

/// Where the command palette overlay sits: centred horizontally over the middle half of
/// the window, at the top, tall enough for the input line plus `matches` completions.
pub fn palette_rect(width: u16, height: u16, matches: usize) -> Rect {
    let palette_width = (width / 2).max(width.min(20));
    let x = (width - palette_width) / 2;
    let wanted = PALETTE_MIN_HEIGHT + (matches as u16).min(PALETTE_MAX_MATCHES);
    Rect::new(x, 0, palette_width, wanted.min(height))
}
