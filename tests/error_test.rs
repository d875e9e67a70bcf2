//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use chrono::NaiveDate;
use scoresheet::error::SheetError;
use scoresheet::sheet::SheetDocument;
use scoresheet::source::{GameSource, JsonFeed};
use scoresheet_common::Sport;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフィード
#[test]
fn test_feed_not_found() {
    let dir = tempdir().expect("Failed to create temp dir");
    let feed = JsonFeed::new(dir.path());
    let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

    let err = feed.collect_games(Sport::Nba, date).unwrap_err();
    assert!(matches!(err, SheetError::FeedNotFound(_)));
    assert!(format!("{}", err).contains("schedule-2026-10-16.json"));
}

/// 存在しないワークブック
#[test]
fn test_workbook_not_found() {
    let result = SheetDocument::load(Path::new("/nonexistent/path/12345/book.json"));
    assert!(matches!(result, Err(SheetError::WorkbookNotFound(_))));
}

/// SheetErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        SheetError::Config("テスト設定エラー".to_string()),
        SheetError::FeedNotFound("nba/schedule.json".to_string()),
        SheetError::FeedParse("不正なJSON".to_string()),
        SheetError::WorkbookNotFound("nba.sheet.json".to_string()),
        SheetError::WorksheetNotFound("Games".to_string()),
        SheetError::SheetUpdate("429".to_string()),
        SheetError::Xlsx("保存失敗".to_string()),
        SheetError::Import("読み込み失敗".to_string()),
        SheetError::SyncFailed { failed: 2 },
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: SheetError = io_err.into();

    assert!(matches!(err, SheetError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: SheetError = json_err.into();

    assert!(matches!(err, SheetError::JsonParse(_)));
}

/// common::Errorは透過的に表示される
#[test]
fn test_common_error_transparent() {
    let common_err = scoresheet_common::CellRef::parse("3A").unwrap_err();
    let err: SheetError = common_err.into();

    assert!(matches!(err, SheetError::Common(_)));
    assert_eq!(format!("{}", err), "Invalid cell: 3A");
}
