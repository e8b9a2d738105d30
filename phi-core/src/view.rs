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
use crate::config::{ClosePolicy, Config};
use crate::error::BufferError;
use crate::keys::{KeyState, LogicalKey};
use crate::layout::{equal_columns, palette_rect};
use crate::palette::{parse_command_line, CommandPalette, PaletteEvent};
use crate::pane::Pane;
use crate::render::RenderContext;
use crate::text_buffer::{is_scratch_path, scratch_file, RopeBuffer, TextBuffer};
use crate::PaneId;
use slotmap::SlotMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long a notice stays on screen.
pub const NOTICE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line message shown at the bottom of the window until it times out.
#[derive(Debug, Clone)]
pub struct Notice {
    message: String,
    level: NoticeLevel,
    shown_at: Instant,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), NoticeLevel::Info)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), NoticeLevel::Error)
    }

    fn new(message: String, level: NoticeLevel) -> Self {
        Notice {
            message,
            level,
            shown_at: Instant::now(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn level(&self) -> NoticeLevel {
        self.level
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTICE_TIMEOUT
    }
}

/// Who receives keyboard input.
///
/// Holding this in one place is what keeps focus consistent: at most one pane can be
/// focused, and the palette being open means no pane is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// No panes exist
    Empty,
    Pane(PaneId),
    /// The palette is open. `parent` is the pane that had focus when it was opened.
    Palette { parent: Option<PaneId> },
    /// Waiting for y/n/Esc after closing a modified pane. The pane keeps its focus
    /// highlight.
    ConfirmClose { pane: PaneId },
}

/// Builds the text buffer for each new pane.
pub type BufferFactory = Box<dyn Fn() -> Box<dyn TextBuffer>>;

/// The whole editor window: panes laid out left to right, the command palette, and the
/// notice line.
pub struct View {
    panes: SlotMap<PaneId, Pane>,
    /// Index handed to the next pane. Never reused.
    next_index: usize,
    focus: Focus,
    palette: CommandPalette,
    registry: Arc<ActionRegistry>,
    config: Config,
    width: u16,
    height: u16,
    notice: Option<Notice>,
    buffer_factory: BufferFactory,
    quit_requested: bool,
}

/// Delete a closed pane's scratch file if nothing was ever saved to it.
fn remove_unused_scratch(pane: &Pane) {
    let Some(path) = pane.buffer().file_path() else {
        return;
    };
    if !is_scratch_path(path) {
        return;
    }
    let empty = std::fs::metadata(path).is_ok_and(|metadata| metadata.len() == 0);
    if !empty {
        return;
    }
    match std::fs::remove_file(path) {
        Ok(()) => debug!("Removed scratch file '{}'", path.display()),
        Err(e) => warn!("Failed to remove scratch file '{}': {e}", path.display()),
    }
}

impl View {
    pub fn new(width: u16, height: u16, config: Config) -> Self {
        Self::with_buffer_factory(
            width,
            height,
            config,
            Box::new(|| -> Box<dyn TextBuffer> { Box::new(RopeBuffer::new()) }),
        )
    }

    pub fn with_buffer_factory(
        width: u16,
        height: u16,
        config: Config,
        buffer_factory: BufferFactory,
    ) -> Self {
        let mut view = View {
            panes: SlotMap::with_key(),
            next_index: 0,
            focus: Focus::Empty,
            palette: CommandPalette::new(Box::new(RopeBuffer::new())),
            registry: ActionRegistry::global(),
            config,
            width,
            height,
            notice: None,
            buffer_factory,
            quit_requested: false,
        };
        view.relayout();
        view
    }

    /// Replace the shared registry, e.g. with one holding extra actions.
    pub fn with_registry(mut self, registry: Arc<ActionRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    // Pane lifecycle

    /// Add an empty pane after all existing ones and focus it. Returns the pane so the
    /// caller can open a file into it.
    pub fn add_buffer(&mut self) -> &mut Pane {
        let buffer = (self.buffer_factory)();
        self.add_buffer_with(buffer)
    }

    pub fn add_buffer_with(&mut self, buffer: Box<dyn TextBuffer>) -> &mut Pane {
        match self.focus {
            Focus::Palette { .. } => {
                debug!("Dismissing palette for new pane");
                self.palette.clear_input();
            }
            Focus::ConfirmClose { .. } => {
                debug!("Cancelling close confirmation for new pane");
                self.notice = None;
            }
            _ => {}
        }

        let index = self.next_index;
        self.next_index += 1;
        let tab_width = self.config.editor.tab_width;
        let id = self
            .panes
            .insert_with_key(|id| Pane::new(id, index, buffer, tab_width));
        self.focus = Focus::Pane(id);
        self.relayout();
        info!("Added pane {index} ({} total)", self.panes.len());
        &mut self.panes[id]
    }

    /// Remove a pane and give its focus to a neighbour: the next higher index, wrapping
    /// around to the lowest. Returns the pane, or None if `id` is stale.
    pub fn remove_buffer(&mut self, id: PaneId) -> Option<Pane> {
        let pane = self.panes.remove(id)?;
        let successor = self.successor(pane.index());

        self.focus = match self.focus {
            Focus::Pane(focused) | Focus::ConfirmClose { pane: focused } if focused == id => {
                successor.map_or(Focus::Empty, Focus::Pane)
            }
            Focus::Palette {
                parent: Some(parent),
            } if parent == id => Focus::Palette { parent: successor },
            other => other,
        };
        debug!("Focus after removing pane {}: {:?}", pane.index(), self.focus);

        if !self.panes.is_empty() {
            self.relayout();
        }
        remove_unused_scratch(&pane);
        info!("Removed pane {} ({} left)", pane.index(), self.panes.len());
        Some(pane)
    }

    /// First pane after `index` in display order, else the first pane.
    fn successor(&self, index: usize) -> Option<PaneId> {
        let ordered = self.panes_in_order();
        ordered
            .iter()
            .find(|pane| pane.index() > index)
            .or(ordered.first())
            .map(|pane| pane.id())
    }

    /// Close the focused pane. Unmodified panes go immediately; modified ones follow the
    /// configured close policy. Returns false if no pane is focused.
    pub fn close_buffer(&mut self) -> bool {
        let Focus::Pane(id) = self.focus else {
            return false;
        };
        let Some(pane) = self.panes.get(id) else {
            return false;
        };

        if !pane.buffer().is_modified() {
            self.remove_buffer(id);
            return true;
        }

        match self.config.editor.close_policy {
            ClosePolicy::Save => self.save_and_close(id),
            ClosePolicy::Discard => {
                info!("Discarding changes to '{}'", pane.title());
                self.remove_buffer(id);
            }
            ClosePolicy::Prompt => {
                let title = pane.title();
                self.focus = Focus::ConfirmClose { pane: id };
                self.set_notice(Notice::info(format!(
                    "Save changes to {title}? (y/n/esc)"
                )));
            }
        }
        true
    }

    fn save_and_close(&mut self, id: PaneId) {
        if self.save_pane(id) {
            self.remove_buffer(id);
        } else {
            self.focus = Focus::Pane(id);
        }
    }

    /// Save the focused pane, reporting the outcome on the notice line.
    pub fn save(&mut self) -> bool {
        match self.focus {
            Focus::Pane(id) => {
                self.save_pane(id);
                true
            }
            _ => false,
        }
    }

    fn save_pane(&mut self, id: PaneId) -> bool {
        let Some(pane) = self.panes.get_mut(id) else {
            return false;
        };
        let title = pane.title();
        match pane.buffer_mut().save() {
            Ok(()) => {
                info!("Saved '{title}'");
                self.set_notice(Notice::info(format!("Saved {title}")));
                true
            }
            Err(e) => {
                warn!("Failed to save '{title}': {e}");
                self.set_notice(Notice::error(format!("Save failed: {e}")));
                false
            }
        }
    }

    /// Open `path` in a new pane. A path that doesn't exist yet gives an empty buffer
    /// that will be created on save. On error no pane is added.
    pub fn open_file(&mut self, path: &Path) -> Result<PaneId, BufferError> {
        let mut buffer = (self.buffer_factory)();
        if path.exists() {
            buffer.open(path)?;
        } else {
            debug!("'{}' does not exist, starting empty", path.display());
            buffer.set_file_path(path.to_path_buf());
        }
        let id = self.add_buffer_with(buffer).id();
        info!("Opened '{}'", path.display());
        Ok(id)
    }

    /// Open a fresh temp file in a new pane.
    pub fn open_scratch(&mut self) -> Result<PaneId, BufferError> {
        let path = scratch_file()?;
        self.open_file(&path)
    }

    // Focus

    /// Move focus `direction` panes along the display order, wrapping at both ends.
    /// Only applies while a pane has focus.
    pub fn change_focus(&mut self, direction: i32) -> bool {
        let Focus::Pane(current) = self.focus else {
            return false;
        };
        let ordered: Vec<PaneId> = self.panes_in_order().iter().map(|p| p.id()).collect();
        if ordered.len() <= 1 {
            return false;
        }
        let Some(position) = ordered.iter().position(|id| *id == current) else {
            return false;
        };

        let count = ordered.len() as i64;
        let target = (position as i64 + direction as i64).rem_euclid(count) as usize;
        let target = ordered[target];
        if target == current {
            return false;
        }
        self.focus = Focus::Pane(target);
        debug!("Focus moved to pane {:?}", self.focused_index());
        true
    }

    pub fn show_palette(&mut self) -> bool {
        let parent = match self.focus {
            Focus::Pane(id) => Some(id),
            Focus::Empty => None,
            Focus::Palette { .. } | Focus::ConfirmClose { .. } => return false,
        };
        self.palette.clear_input();
        self.relayout_palette();
        self.focus = Focus::Palette { parent };
        debug!("Palette opened");
        true
    }

    /// Close the palette and give focus back to the pane that opened it.
    pub fn hide_palette(&mut self) -> bool {
        let Focus::Palette { parent } = self.focus else {
            return false;
        };
        self.palette.clear_input();
        self.relayout_palette();
        self.focus = match parent.filter(|id| self.panes.contains_key(*id)) {
            Some(id) => Focus::Pane(id),
            None => Focus::Empty,
        };
        debug!("Palette closed, focus {:?}", self.focus);
        true
    }

    pub fn toggle_palette(&mut self) -> bool {
        if self.is_palette_open() {
            self.hide_palette()
        } else {
            self.show_palette()
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_palette_open(&self) -> bool {
        matches!(self.focus, Focus::Palette { .. })
    }

    pub fn palette(&self) -> &CommandPalette {
        &self.palette
    }

    pub fn palette_parent(&self) -> Option<PaneId> {
        match self.focus {
            Focus::Palette { parent } => parent,
            _ => None,
        }
    }

    /// The pane shown as focused, including while its close is being confirmed.
    pub fn focused_pane_id(&self) -> Option<PaneId> {
        match self.focus {
            Focus::Pane(id) | Focus::ConfirmClose { pane: id } => Some(id),
            Focus::Empty | Focus::Palette { .. } => None,
        }
    }

    pub fn focused_pane(&self) -> Option<&Pane> {
        self.focused_pane_id().and_then(|id| self.panes.get(id))
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused_pane().map(Pane::index)
    }

    pub fn pane_has_focus(&self, id: PaneId) -> bool {
        self.focused_pane_id() == Some(id)
    }

    // Pane access

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(id)
    }

    pub fn pane_id(&self, index: usize) -> Option<PaneId> {
        self.panes
            .values()
            .find(|pane| pane.index() == index)
            .map(Pane::id)
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    /// All panes, left to right.
    pub fn panes_in_order(&self) -> Vec<&Pane> {
        let mut panes: Vec<&Pane> = self.panes.values().collect();
        panes.sort_by_key(|pane| pane.index());
        panes
    }

    // Geometry

    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        self.width = width;
        self.height = height;
        self.relayout();
        debug!("Resized to {width}x{height}");
        true
    }

    fn relayout(&mut self) {
        let ids: Vec<PaneId> = self.panes_in_order().iter().map(|p| p.id()).collect();
        let rects = equal_columns(ids.len(), self.width, self.height);
        for (id, rect) in ids.into_iter().zip(rects) {
            if let Some(pane) = self.panes.get_mut(id) {
                pane.set_rect(rect);
            }
        }
        self.relayout_palette();
    }

    fn relayout_palette(&mut self) {
        let rect = palette_rect(self.width, self.height, self.palette.matches().len());
        self.palette.set_rect(rect);
    }

    // Notices and quitting

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Drop the notice once it has timed out. The close prompt stays until answered.
    fn expire_notice(&mut self, now: Instant) -> bool {
        if matches!(self.focus, Focus::ConfirmClose { .. }) {
            return false;
        }
        match &self.notice {
            Some(notice) if notice.is_expired(now) => {
                self.notice = None;
                true
            }
            _ => false,
        }
    }

    pub fn request_quit(&mut self) {
        info!("Quit requested");
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    // Actions

    /// Run the named action. None if no such action is registered.
    pub fn invoke_action(&mut self, name: &str, args: &[String]) -> Option<bool> {
        // The registry is shared, so hold our own handle while the action borrows the view
        let registry = Arc::clone(&self.registry);
        let action = registry.get_action(name)?;
        info!("Invoking action '{name}' {args:?}");
        Some(action.invoke(self, args))
    }

    fn run_shortcut(&mut self, key: LogicalKey) -> bool {
        let Some(c) = key.shortcut_char() else {
            warn!("Unimplemented shortcut: C-{}", key.as_display_string());
            return false;
        };
        let Some(name) = self.config.shortcuts.control_action(c).map(str::to_string) else {
            warn!("Unimplemented shortcut: C-{c}");
            return false;
        };
        match self.invoke_action(&name, &[]) {
            Some(dirty) => dirty,
            None => {
                warn!("Unimplemented shortcut: C-{c} bound to unknown action '{name}'");
                false
            }
        }
    }

    fn run_command_line(&mut self, line: &str) -> bool {
        let Some((name, args)) = parse_command_line(line) else {
            return false;
        };
        match self.invoke_action(&name, &args) {
            Some(dirty) => dirty,
            None => {
                warn!("Unknown command '{name}'");
                self.set_notice(Notice::error(format!("Unknown command: {name}")));
                true
            }
        }
    }

    // Frame cycle

    /// Process one frame of input. Returns true if the view needs to be redrawn.
    pub fn update(&mut self, input: &mut KeyState) -> bool {
        let mut dirty = self.expire_notice(Instant::now());
        let confirming = matches!(self.focus, Focus::ConfirmClose { .. });

        if input.modifiers().control && !confirming {
            if let Some(key) = input.pop_key() {
                return self.run_shortcut(key) || dirty;
            }
        }

        dirty |= match self.focus {
            Focus::Pane(id) => match self.panes.get_mut(id) {
                Some(pane) => {
                    let edited = pane.process_input(input);
                    pane.update() || edited
                }
                None => false,
            },
            Focus::Palette { .. } => self.process_palette_input(input),
            Focus::ConfirmClose { pane } => self.process_confirm_input(pane, input),
            Focus::Empty => {
                input.take();
                false
            }
        };

        let palette_focused = self.is_palette_open();
        if self.palette.update(palette_focused, &self.registry) {
            self.relayout_palette();
            dirty = true;
        }
        dirty
    }

    fn process_palette_input(&mut self, input: &mut KeyState) -> bool {
        match self.palette.process_input(input) {
            PaletteEvent::Ignored => false,
            PaletteEvent::Edited => true,
            PaletteEvent::Dismiss => self.hide_palette(),
            PaletteEvent::Submit(line) => {
                self.hide_palette();
                self.run_command_line(&line);
                true
            }
        }
    }

    /// Answer the close prompt. Only a plain y, n, c or Esc counts; chords are dropped.
    fn process_confirm_input(&mut self, id: PaneId, input: &mut KeyState) -> bool {
        let modifiers = input.modifiers();
        if modifiers.control || modifiers.alt {
            debug!("Ignoring chord while confirming close");
            input.take();
            return false;
        }
        while let Some(key) = input.pop_key() {
            let answer = match key {
                LogicalKey::Esc => 'c',
                LogicalKey::AlphaNumeric(c) => c.to_ascii_lowercase(),
                _ => continue,
            };
            match answer {
                'y' => {
                    self.save_and_close(id);
                    return true;
                }
                'n' => {
                    self.notice = None;
                    if let Some(pane) = self.panes.get(id) {
                        info!("Discarding changes to '{}'", pane.title());
                    }
                    self.remove_buffer(id);
                    return true;
                }
                'c' => {
                    self.notice = None;
                    self.focus = Focus::Pane(id);
                    return true;
                }
                _ => {}
            }
        }
        false
    }

    /// Draw panes in display order, then the palette, then the notice line.
    pub fn render<R: RenderContext>(&self, ctx: &mut R) -> Result<(), R::Error> {
        ctx.set_font(&self.config.font)?;
        for pane in self.panes_in_order() {
            ctx.draw_pane(
                pane,
                self.pane_has_focus(pane.id()),
                &self.config.theme,
                &self.config.editor,
            )?;
        }
        if self.is_palette_open() {
            ctx.draw_palette(&self.palette, &self.config.theme)?;
        }
        if let Some(notice) = &self.notice {
            ctx.draw_notice(notice, &self.config.theme)?;
        }
        Ok(())
    }
}
