#![deny(dead_code)]
use anyhow::Result;
use clap::Parser;
use log::{error, info, LevelFilter};
use std::path::PathBuf;

mod ui;
mod utils;

use crate::ui::ChatUI;
use cyberchat::clipboard::open_clipboard;
use cyberchat::settings::{load_settings, set_settings_path_override};
use cyberchat::Session;

/// Command line arguments for CyberChat
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "CyberChat: a terminal mock of an end-to-end encrypted messenger.",
    long_about = "CyberChat renders a local, in-memory chat session in the terminal.\n\n\
    Nothing is sent anywhere and nothing is persisted: contacts and the thread are demo data,\n\
    attachments are referenced from local files only for the lifetime of the session."
)]
struct Args {
    /// Settings file to use instead of the per-user one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to write log output
    #[arg(long, value_name = "PATH", default_value = "cyberchat.log")]
    log_file: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = args.log_file.to_string_lossy().into_owned();
    utils::setup_logging(&log_path, args.log_level)?;

    info!("CyberChat starting up");
    info!("System information: {} {}", std::env::consts::OS, std::env::consts::ARCH);
    info!("Logging to file: {}", args.log_file.display());

    if let Some(path) = args.config {
        info!("Settings file overridden to: {}", path.display());
        set_settings_path_override(path);
    }

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            eprintln!("Failed to load settings: {}", e);
            return Err(e.into());
        }
    };

    let session = Session::new(&settings);
    let mut chat_ui = ChatUI::new(session, open_clipboard());

    let mut terminal = ui::setup_terminal()?;
    let result = run(&mut terminal, &mut chat_ui);
    ui::restore_terminal(terminal)?;

    let released = chat_ui.into_session().close();
    info!("CyberChat shut down, released {} file reference(s)", released);

    result
}

fn run(
    terminal: &mut ui::Terminal<ui::CrosstermBackend<std::io::Stdout>>,
    chat_ui: &mut ChatUI,
) -> Result<()> {
    loop {
        chat_ui.tick();
        terminal.draw(|f| chat_ui.draw(f))?;
        chat_ui.handle_input()?;
        if chat_ui.should_quit() {
            return Ok(());
        }
    }
}
