use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("フィードが見つかりません: {0}")]
    FeedNotFound(String),

    #[error("フィードの解析に失敗: {0}")]
    FeedParse(String),

    #[error("ワークブックが見つかりません: {0}")]
    WorkbookNotFound(String),

    #[error("ワークシートが見つかりません: {0}")]
    WorksheetNotFound(String),

    #[error("シート更新エラー: {0}")]
    SheetUpdate(String),

    #[error("Excel生成エラー: {0}")]
    Xlsx(String),

    #[error("Excel読み込みエラー: {0}")]
    Import(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] scoresheet_common::Error),

    #[error("{failed}件のシート更新に失敗しました")]
    SyncFailed { failed: usize },
}

pub type Result<T> = std::result::Result<T, SheetError>;
