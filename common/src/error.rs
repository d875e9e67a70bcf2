//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid cell: {0}")]
    InvalidCell(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
