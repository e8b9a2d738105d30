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

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use futures::{future::FutureExt, select, StreamExt};
use phi_core::config::{EditorSettings, FontConfig, Theme};
use phi_core::{
    CommandPalette, KeyState, LogicalKey, Modifiers, Notice, NoticeLevel, Pane, Rect,
    RenderContext, View,
};
use std::io::Write;
use tokio::time::{interval, Duration};
use tracing::debug;

/// Rows reserved below the panes for notices
pub const ECHO_AREA_HEIGHT: u16 = 1;
/// How often the loop wakes without input, so notices can expire
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

pub const MODE_LINE_BG_COLOR: Color = Color::Blue;
pub const INACTIVE_MODE_LINE_BG_COLOR: Color = Color::DarkGrey;
pub const BORDER_COLOR: Color = Color::DarkGrey;
pub const ACTIVE_BORDER_COLOR: Color = Color::Cyan;
pub const ERROR_COLOR: Color = Color::Red;

pub const BORDER_HORIZONTAL: &str = "─";
pub const BORDER_VERTICAL: &str = "│";
pub const BORDER_TOP_LEFT: &str = "┌";
pub const BORDER_TOP_RIGHT: &str = "┐";
pub const BORDER_BOTTOM_LEFT: &str = "└";
pub const BORDER_BOTTOM_RIGHT: &str = "┘";

fn to_crossterm(color: phi_core::Color) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Take at most `width` chars of `text`, padding with spaces to exactly `width`.
fn fit(text: &str, width: usize) -> String {
    let mut fitted: String = text.chars().take(width).collect();
    let len = fitted.chars().count();
    fitted.push_str(&" ".repeat(width - len));
    fitted
}

/// Columns used by the line-number gutter, including its trailing space.
fn gutter_width(line_count: usize, settings: &EditorSettings) -> usize {
    if !settings.show_line_numbers {
        return 0;
    }
    line_count.max(1).to_string().len() + 1
}

/// Modeline text for a pane: title and modified marker on the left, line:col on the
/// right, fitted to `width` columns.
pub fn modeline_text(pane: &Pane, width: usize) -> String {
    let buffer = pane.buffer();
    let marker = if buffer.is_modified() { " *" } else { "" };
    let left = format!(" {}{marker} ", pane.title());
    let (col, line) = buffer.cursor();
    let right = format!(" {}:{} ", line + 1, col + 1);

    let used = left.chars().count() + right.chars().count();
    if used > width {
        return fit(&left, width);
    }
    fit(&format!("{left}{}{right}", " ".repeat(width - used)), width)
}

/// Crossterm-backed [`RenderContext`]
pub struct TerminalRenderer<W: Write> {
    device: W,
    /// Row of the notice line, just below the panes
    notice_row: u16,
    columns: u16,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(device: W) -> Self {
        Self {
            device,
            notice_row: 0,
            columns: 0,
        }
    }

    pub fn device(&self) -> &W {
        &self.device
    }

    /// Clear the screen and draw the whole view.
    pub fn render_frame(&mut self, view: &View) -> Result<(), std::io::Error> {
        self.notice_row = view.height();
        self.columns = view.width();
        queue!(self.device, cursor::Hide, Clear(ClearType::All))?;
        view.render(self)?;
        self.device.flush()
    }

    fn draw_border(&mut self, rect: Rect, color: Color) -> Result<(), std::io::Error> {
        let right = rect.right().saturating_sub(1);
        let bottom = rect.bottom().saturating_sub(1);

        queue!(
            self.device,
            cursor::MoveTo(rect.x, rect.y),
            Print(BORDER_TOP_LEFT.with(color)),
            cursor::MoveTo(right, rect.y),
            Print(BORDER_TOP_RIGHT.with(color)),
            cursor::MoveTo(rect.x, bottom),
            Print(BORDER_BOTTOM_LEFT.with(color)),
            cursor::MoveTo(right, bottom),
            Print(BORDER_BOTTOM_RIGHT.with(color))
        )?;

        if rect.x + 1 < right {
            let horizontal_line = BORDER_HORIZONTAL.repeat((right - rect.x - 1) as usize);
            queue!(
                self.device,
                cursor::MoveTo(rect.x + 1, rect.y),
                Print(horizontal_line.with(color))
            )?;
        }

        for y in rect.y + 1..bottom {
            queue!(
                self.device,
                cursor::MoveTo(rect.x, y),
                Print(BORDER_VERTICAL.with(color)),
                cursor::MoveTo(right, y),
                Print(BORDER_VERTICAL.with(color))
            )?;
        }
        Ok(())
    }

    fn draw_cursor_cell(
        &mut self,
        x: u16,
        y: u16,
        under: char,
        theme: &Theme,
    ) -> Result<(), std::io::Error> {
        queue!(
            self.device,
            cursor::MoveTo(x, y),
            Print(
                under
                    .to_string()
                    .with(to_crossterm(theme.cursor_invert))
                    .on(to_crossterm(theme.cursor))
            )
        )
    }
}

impl<W: Write> RenderContext for TerminalRenderer<W> {
    type Error = std::io::Error;

    fn set_font(&mut self, font: &FontConfig) -> Result<(), Self::Error> {
        // The terminal emulator owns the font
        debug!("Ignoring font '{}' {}pt in terminal", font.face, font.size);
        Ok(())
    }

    fn draw_pane(
        &mut self,
        pane: &Pane,
        focused: bool,
        theme: &Theme,
        settings: &EditorSettings,
    ) -> Result<(), Self::Error> {
        let rect = pane.rect();
        if rect.width < 2 || rect.height < 2 {
            return Ok(());
        }
        let border_color = if focused {
            ACTIVE_BORDER_COLOR
        } else {
            BORDER_COLOR
        };
        self.draw_border(rect, border_color)?;

        let bg = to_crossterm(theme.background);
        let fg = to_crossterm(theme.foreground);
        let inner_width = (rect.width - 2) as usize;
        let buffer = pane.buffer();
        let line_count = buffer.line_count();
        let gutter = gutter_width(line_count, settings).min(inner_width);
        let text_width = inner_width - gutter;
        let (cursor_col, cursor_line) = buffer.cursor();

        for row in 0..pane.content_height() {
            let line_no = pane.scroll() + row;
            let y = rect.y + 1 + row as u16;
            queue!(self.device, cursor::MoveTo(rect.x + 1, y))?;

            if gutter > 0 {
                let number = if line_no < line_count {
                    format!("{:>width$} ", line_no + 1, width = gutter - 1)
                } else {
                    String::new()
                };
                queue!(
                    self.device,
                    Print(
                        fit(&number, gutter)
                            .with(to_crossterm(theme.gutter_foreground))
                            .on(to_crossterm(theme.gutter_background))
                    )
                )?;
            }

            let text = if line_no < line_count {
                buffer.line(line_no).replace('\t', " ")
            } else {
                String::new()
            };
            queue!(self.device, Print(fit(&text, text_width).with(fg).on(bg)))?;

            if focused && line_no == cursor_line && cursor_col < text_width {
                let under = text.chars().nth(cursor_col).unwrap_or(' ');
                let x = rect.x + 1 + (gutter + cursor_col) as u16;
                self.draw_cursor_cell(x, y, under, theme)?;
            }
        }

        let modeline_bg = if focused {
            MODE_LINE_BG_COLOR
        } else {
            INACTIVE_MODE_LINE_BG_COLOR
        };
        queue!(
            self.device,
            cursor::MoveTo(rect.x + 1, rect.bottom().saturating_sub(1)),
            Print(modeline_text(pane, inner_width).with(fg).on(modeline_bg))
        )?;
        Ok(())
    }

    fn draw_palette(&mut self, palette: &CommandPalette, theme: &Theme) -> Result<(), Self::Error> {
        let rect = palette.rect();
        if rect.width < 2 || rect.height < 3 {
            return Ok(());
        }
        self.draw_border(rect, ACTIVE_BORDER_COLOR)?;

        let bg = to_crossterm(theme.background);
        let fg = to_crossterm(theme.foreground);
        let inner_width = (rect.width - 2) as usize;
        let input = palette.input_text();
        let prompt = format!("> {input}");
        queue!(
            self.device,
            cursor::MoveTo(rect.x + 1, rect.y + 1),
            Print(fit(&prompt, inner_width).with(fg).on(bg))
        )?;

        let (cursor_col, _) = palette.input().cursor();
        let cursor_col = cursor_col + 2;
        if cursor_col < inner_width {
            let under = prompt.chars().nth(cursor_col).unwrap_or(' ');
            self.draw_cursor_cell(rect.x + 1 + cursor_col as u16, rect.y + 1, under, theme)?;
        }

        let rows = rect.height.saturating_sub(3);
        for (row, name) in palette.matches().iter().take(rows as usize).enumerate() {
            queue!(
                self.device,
                cursor::MoveTo(rect.x + 1, rect.y + 2 + row as u16),
                Print(
                    fit(&format!("  {name}"), inner_width)
                        .with(to_crossterm(theme.gutter_foreground))
                        .on(bg)
                )
            )?;
        }
        Ok(())
    }

    fn draw_notice(&mut self, notice: &Notice, theme: &Theme) -> Result<(), Self::Error> {
        let color = match notice.level() {
            NoticeLevel::Info => to_crossterm(theme.foreground),
            NoticeLevel::Error => ERROR_COLOR,
        };
        let message: String = notice.message().chars().take(self.columns as usize).collect();
        queue!(
            self.device,
            cursor::MoveTo(0, self.notice_row),
            Clear(ClearType::CurrentLine),
            Print(message.with(color).on(to_crossterm(theme.background)))
        )
    }
}

fn crossterm_key_translate(code: &KeyCode) -> LogicalKey {
    match code {
        KeyCode::Backspace => LogicalKey::Backspace,
        KeyCode::Enter => LogicalKey::Enter,
        KeyCode::Left => LogicalKey::Left,
        KeyCode::Right => LogicalKey::Right,
        KeyCode::Up => LogicalKey::Up,
        KeyCode::Down => LogicalKey::Down,
        KeyCode::Home => LogicalKey::Home,
        KeyCode::End => LogicalKey::End,
        KeyCode::PageUp => LogicalKey::PageUp,
        KeyCode::PageDown => LogicalKey::PageDown,
        KeyCode::Tab => LogicalKey::Tab,
        KeyCode::Delete => LogicalKey::Delete,
        KeyCode::Esc => LogicalKey::Esc,
        KeyCode::Char(c) => LogicalKey::AlphaNumeric(*c),
        _ => LogicalKey::Unmapped,
    }
}

fn crossterm_modifiers_translate(modifiers: KeyModifiers) -> Modifiers {
    Modifiers {
        control: modifiers.contains(KeyModifiers::CONTROL),
        shift: modifiers.contains(KeyModifiers::SHIFT),
        alt: modifiers.contains(KeyModifiers::ALT),
    }
}

/// One frame of input for a single key press.
pub fn key_state_for(event: &KeyEvent) -> KeyState {
    let mut input = KeyState::with_modifiers(crossterm_modifiers_translate(event.modifiers));
    input.press(crossterm_key_translate(&event.code));
    input
}

/// Drive the view from terminal events until it asks to quit.
pub async fn event_loop<W: Write>(
    renderer: &mut TerminalRenderer<W>,
    view: &mut View,
) -> Result<(), std::io::Error> {
    let mut event_stream = EventStream::new();
    let mut tick = interval(TICK_INTERVAL);

    renderer.render_frame(view)?;

    while !view.quit_requested() {
        let event = select! {
            event = event_stream.next().fuse() => {
                match event {
                    Some(Ok(event)) => Some(event),
                    Some(Err(e)) => return Err(e),
                    None => return Ok(()),
                }
            }
            _ = tick.tick().fuse() => None,
        };

        let mut dirty = false;
        let mut input = KeyState::new();
        match event {
            Some(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                input = key_state_for(&key);
            }
            Some(Event::Resize(width, height)) => {
                dirty |= view.resize(width, height.saturating_sub(ECHO_AREA_HEIGHT));
            }
            _ => {}
        }

        dirty |= view.update(&mut input);
        if dirty {
            renderer.render_frame(view)?;
        }
    }
    Ok(())
}
