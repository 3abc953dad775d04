// Common test utilities for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Once;

use log::LevelFilter;
use tempfile::TempDir;

use cyberchat::settings::Settings;
use cyberchat::Session;

static INIT_LOGGER: Once = Once::new();

/// Set up the logger for the tests
pub fn setup_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();
    });
}

/// Demo session whose downloads land in `download_dir`.
pub fn session_with_downloads(download_dir: &TempDir) -> Session {
    setup_logging();
    let settings = Settings {
        download_dir: Some(download_dir.path().join("downloads")),
        ..Settings::default()
    };
    Session::new(&settings)
}

pub fn demo_session() -> Session {
    setup_logging();
    Session::new(&Settings::default())
}

/// Writes `len` bytes to `dir/name` and returns the path.
pub fn write_file(dir: &TempDir, name: &str, len: usize) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, vec![7u8; len]).expect("write test file");
    path
}

pub fn ids(session: &Session) -> Vec<u64> {
    session.messages().iter().map(|m| m.id).collect()
}
