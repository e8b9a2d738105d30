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

use anyhow::{anyhow, Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use phi_core::{Config, Notice, View};
use phi_terminal::{TerminalRenderer, ECHO_AREA_HEIGHT};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "phi.log";
const LOG_ENV_VAR: &str = "PHI_LOG";

/// Phi - a multi-pane text editor
#[derive(Debug, Parser)]
#[command(name = "phi", version, about)]
struct Cli {
    /// Files to open, one pane each. Without any, a scratch file is opened.
    files: Vec<PathBuf>,

    /// Use this configuration file instead of the per-user config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level (overridden by PHI_LOG)
    #[arg(
        long,
        env = "PHI_DEBUG",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    debug: bool,
}

/// Directory holding the config file and the log
fn config_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(file) => Ok(file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))),
        None => Ok(Config::default_dir()?),
    }
}

/// Log to a file so the terminal UI isn't disturbed
fn init_logging(dir: &Path, debug: bool) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install logger: {e}"))?;
    Ok(())
}

fn load_config(cli: &Cli, dir: &Path) -> Result<Config> {
    let config = match &cli.config {
        Some(file) => Config::load(file),
        None => Config::load_or_init(dir),
    };
    config.context("Failed to load configuration")
}

fn open_initial_files(view: &mut View, files: &[PathBuf]) -> Result<()> {
    if files.is_empty() {
        view.open_scratch()
            .context("Failed to create a scratch file")?;
        return Ok(());
    }
    for path in files {
        if let Err(e) = view.open_file(path) {
            warn!("Failed to open '{}': {e}", path.display());
            view.set_notice(Notice::error(format!("Could not open {e}")));
        }
    }
    Ok(())
}

async fn terminal_main<W: Write>(stdout: W, view: &mut View) -> Result<(), std::io::Error> {
    let mut renderer = TerminalRenderer::new(stdout);
    phi_terminal::event_loop(&mut renderer, view).await
}

fn exit_state(device: &mut impl Write) -> Result<(), std::io::Error> {
    execute!(device, crossterm::cursor::Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    device.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dir = config_dir(&cli)?;
    init_logging(&dir, cli.debug)?;
    let config = load_config(&cli, &dir)?;

    let (width, height) = crossterm::terminal::size().context("Failed to read terminal size")?;
    let mut view = View::new(width, height.saturating_sub(ECHO_AREA_HEIGHT), config);
    open_initial_files(&mut view, &cli.files)?;
    info!("Starting with {} pane(s)", view.pane_count());

    // Restore the terminal before the panic message is printed
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = exit_state(&mut std::io::stdout());
        eprintln!("phi crashed: {panic_info}");
    }));

    let mut stdout = std::io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let result = terminal_main(&mut stdout, &mut view).await;

    if let Err(cleanup_err) = exit_state(&mut stdout) {
        eprintln!("Warning: Failed to clean up terminal state: {cleanup_err}");
    }

    result.context("Editor stopped with an error")?;
    info!("Exited cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_files_and_flags() {
        let cli = Cli::try_parse_from(["phi", "--config", "/tmp/x/config.toml", "a.txt", "b.txt"])
            .unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert_eq!(config_dir(&cli).unwrap(), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_debug_env_accepts_boolish_values() {
        std::env::set_var("PHI_DEBUG", "1");
        let on = Cli::try_parse_from(["phi"]).unwrap();
        std::env::set_var("PHI_DEBUG", "off");
        let off = Cli::try_parse_from(["phi"]).unwrap();
        std::env::remove_var("PHI_DEBUG");
        assert!(on.debug);
        assert!(!off.debug);
        assert!(!Cli::try_parse_from(["phi"]).unwrap().debug);
        assert!(Cli::try_parse_from(["phi", "--debug"]).unwrap().debug);
    }

    #[test]
    fn test_bare_config_file_uses_current_dir() {
        let cli = Cli::try_parse_from(["phi", "--config", "config.toml"]).unwrap();
        assert_eq!(config_dir(&cli).unwrap(), PathBuf::from("."));
    }

    #[test]
    fn test_open_initial_files_keeps_going_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        std::fs::write(&good, "ok").unwrap();

        let mut view = View::new(80, 24, Config::default());
        open_initial_files(&mut view, &[dir.path().to_path_buf(), good]).unwrap();
        assert_eq!(view.pane_count(), 1);
        assert!(view.notice().is_some());
    }
}
