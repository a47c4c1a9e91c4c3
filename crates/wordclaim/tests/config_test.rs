//! Tests for loading engine config and word pools from disk.

use std::io::Write;
use tempfile::NamedTempFile;
use wordclaim::{load_word_pool, EngineConfig};

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_config_from_file() {
    let file = temp_file(
        r#"
tick_millis = 500
attempt_timeout = 8
max_cells_per_turn = 3
"#,
    );
    let config = EngineConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.tick_millis(), 500);
    assert_eq!(*config.attempt_timeout(), 8);
    assert_eq!(*config.max_cells_per_turn(), 3);
    assert_eq!(*config.pregame_countdown(), 3);
    assert_eq!(config.language(), "zh-CN");
}

#[test]
fn test_config_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_config_bad_toml_is_error() {
    let file = temp_file("tick_millis = \"soon\"");
    let err = EngineConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_word_pool_from_json_file() {
    let words: Vec<String> = (0..120).map(|i| format!("词{i}")).collect();
    let json = serde_json::json!({ "words": words }).to_string();
    let file = temp_file(&json);

    let pool = load_word_pool(file.path()).unwrap();
    assert_eq!(pool.len(), 120);
    assert!(pool.is_playable());
    let board = pool.build_board().unwrap();
    assert_eq!(board.cells()[0].word(), "词0");
}

#[test]
fn test_word_pool_from_lines_file() {
    let text = (0..50).map(|i| format!("w{i}\n\n")).collect::<String>();
    let file = temp_file(&text);

    let pool = load_word_pool(file.path()).unwrap();
    assert_eq!(pool.len(), 50);
    assert!(!pool.is_playable());
}

#[test]
fn test_word_pool_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_word_pool(dir.path().join("words.txt")).unwrap_err();
    assert!(err.message.contains("Failed to read word file"));
}
