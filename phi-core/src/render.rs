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

use crate::config::{EditorSettings, FontConfig, Theme};
use crate::palette::CommandPalette;
use crate::pane::Pane;
use crate::view::Notice;

/// Drawing surface the view renders into once per frame.
///
/// The view decides order and focus: panes in index order, then the palette, then the
/// notice line. The backend decides what each of those looks like.
pub trait RenderContext {
    type Error;

    /// Select the font for everything drawn this frame.
    fn set_font(&mut self, font: &FontConfig) -> Result<(), Self::Error>;

    fn draw_pane(
        &mut self,
        pane: &Pane,
        focused: bool,
        theme: &Theme,
        settings: &EditorSettings,
    ) -> Result<(), Self::Error>;

    /// Only called while the palette is open.
    fn draw_palette(&mut self, palette: &CommandPalette, theme: &Theme)
        -> Result<(), Self::Error>;

    fn draw_notice(&mut self, notice: &Notice, theme: &Theme) -> Result<(), Self::Error>;
}
