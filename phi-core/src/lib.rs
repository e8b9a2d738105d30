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

use slotmap::new_key_type;

pub mod action_registry;
pub mod actions;
pub mod config;
pub mod error;
pub mod keys;
pub mod layout;
pub mod palette;
pub mod pane;
pub mod render;
pub mod text_buffer;
pub mod view;

new_key_type! {
    pub struct PaneId;
}

pub use action_registry::{Action, ActionProc, ActionRegistry};
pub use config::{ClosePolicy, Color, Config, FontConfig, Theme};
pub use error::{BufferError, ConfigError};
pub use keys::{CursorDirection, KeyState, LogicalKey, Modifiers};
pub use layout::Rect;
pub use palette::CommandPalette;
pub use pane::Pane;
pub use render::RenderContext;
pub use text_buffer::{RopeBuffer, TextBuffer};
pub use view::{Focus, Notice, NoticeLevel, View};
