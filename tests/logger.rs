//! Integration tests for logger behavior.

use proved_effectifs::logger::{level, set_level, set_level_from_str, Level};
use proved_effectifs::{debug, error, info, verbose, warn};

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("WARN"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
    assert_eq!(level(), Level::Debug);
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    info!("info integration");
    warn!("warn integration {}", 2);
    error!("error integration");
    debug!("debug integration");
    verbose!("verbose integration");
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_writes_timestamped_lines() {
    use proved_effectifs::logger::init_file_logging;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("logs").join("effectifs.log");
    assert!(init_file_logging(&path));

    error!("file logging integration marker");

    let content = std::fs::read_to_string(&path).expect("Failed to read log file");
    let line = content
        .lines()
        .find(|line| line.contains("file logging integration marker"))
        .expect("marker line missing");
    assert!(line.ends_with("Z [ERROR] file logging integration marker"));
}
