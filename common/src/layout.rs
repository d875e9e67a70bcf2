//! シートレイアウト設定
//!
//! 開始セル（既定 A3）から下に1試合1行で並べる。
//! A列: 日付（開始セルのみ）、B列: A側、C列: B側、D列: 勝者。

use crate::cell::{CellRef, GridRange};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_START_CELL: &str = "A3";
pub const DEFAULT_NUM_COLUMNS: u32 = 6;

pub const AWAY_COL: u32 = 2;
pub const HOME_COL: u32 = 3;
pub const WINNER_COL: u32 = 4;

/// 日付セルの書式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetLayout {
    pub start_cell: String,
    pub num_columns: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            start_cell: DEFAULT_START_CELL.into(),
            num_columns: DEFAULT_NUM_COLUMNS,
        }
    }
}

impl SheetLayout {
    pub fn start(&self) -> Result<CellRef> {
        CellRef::parse(&self.start_cell)
    }

    /// 試合indexの書き込み行（index 1 → 開始行）
    pub fn row_for(&self, index: u32) -> Result<u32> {
        let start = self.start()?;
        start
            .row
            .checked_add(index.saturating_sub(1))
            .ok_or_else(|| Error::InvalidCell(format!("{} から {}番目の行", start, index)))
    }

    /// 挿入・罫線の対象範囲
    pub fn block(&self, num_rows: u32) -> Result<GridRange> {
        GridRange::new(self.start()?, num_rows, self.num_columns)
    }
}
