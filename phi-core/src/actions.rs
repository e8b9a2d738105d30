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

//! Built-in actions. Each one is an [`ActionProc`](crate::ActionProc) registered under
//! its name in [`create_default_registry`](crate::action_registry::create_default_registry).

use crate::view::{Notice, View};
use std::path::Path;
use tracing::warn;

pub fn save(view: &mut View, _args: &[String]) -> bool {
    view.save()
}

pub fn close_buffer(view: &mut View, _args: &[String]) -> bool {
    view.close_buffer()
}

pub fn new_buffer(view: &mut View, _args: &[String]) -> bool {
    if let Err(e) = view.open_scratch() {
        warn!("Failed to create scratch buffer: {e}");
        view.set_notice(Notice::error(format!("Could not create scratch file: {e}")));
    }
    true
}

/// `open <path>`. Words after the action name are joined back together so paths with
/// spaces work.
pub fn open(view: &mut View, args: &[String]) -> bool {
    if args.is_empty() {
        view.set_notice(Notice::error("usage: open <path>"));
        return true;
    }
    let path = args.join(" ");
    if let Err(e) = view.open_file(Path::new(&path)) {
        warn!("Failed to open '{path}': {e}");
        view.set_notice(Notice::error(format!("Could not open {e}")));
    }
    true
}

pub fn toggle_palette(view: &mut View, _args: &[String]) -> bool {
    view.toggle_palette()
}

pub fn focus_next(view: &mut View, _args: &[String]) -> bool {
    view.change_focus(1)
}

pub fn focus_prev(view: &mut View, _args: &[String]) -> bool {
    view.change_focus(-1)
}

pub fn exit(view: &mut View, _args: &[String]) -> bool {
    view.request_quit();
    true
}
