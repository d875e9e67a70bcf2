//! スプレッドシート操作
//!
//! 1ワークシート分の操作を [`SheetClient`] で抽象化する。
//! 同梱の実装はローカルのJSONワークブック（[`WorkbookSheet`]）。

mod document;
mod workbook;

pub use document::{SheetDocument, Worksheet};
pub use workbook::{WorkbookBackend, WorkbookSheet};

use crate::config::SheetTarget;
use crate::error::Result;
use scoresheet_common::{CellRef, GridRange};

/// 開始セルから書き込む2次元の値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeUpdate {
    pub start: CellRef,
    pub values: Vec<Vec<String>>,
}

impl RangeUpdate {
    /// 1セル分
    pub fn single(cell: CellRef, value: impl Into<String>) -> Self {
        Self {
            start: cell,
            values: vec![vec![value.into()]],
        }
    }
}

/// 1ワークシートへの操作
///
/// どの操作もリモート呼び出しを想定しており、一時的に失敗しうる。
pub trait SheetClient {
    /// ログ用の表示名
    fn title(&self) -> &str;

    /// セル値を取得（空セルは None）
    fn cell_value(&mut self, cell: CellRef) -> Result<Option<String>>;

    fn update_cell(&mut self, cell: CellRef, value: &str) -> Result<()>;

    fn batch_update(&mut self, updates: &[RangeUpdate]) -> Result<()>;

    /// 範囲にセルを挿入し、対象列の既存セルを下へずらす
    fn insert_range(&mut self, range: GridRange) -> Result<()>;

    /// 範囲の外周に罫線を引く
    fn outer_border(&mut self, range: GridRange) -> Result<()>;
}

impl<S: SheetClient + ?Sized> SheetClient for Box<S> {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn cell_value(&mut self, cell: CellRef) -> Result<Option<String>> {
        (**self).cell_value(cell)
    }

    fn update_cell(&mut self, cell: CellRef, value: &str) -> Result<()> {
        (**self).update_cell(cell, value)
    }

    fn batch_update(&mut self, updates: &[RangeUpdate]) -> Result<()> {
        (**self).batch_update(updates)
    }

    fn insert_range(&mut self, range: GridRange) -> Result<()> {
        (**self).insert_range(range)
    }

    fn outer_border(&mut self, range: GridRange) -> Result<()> {
        (**self).outer_border(range)
    }
}

/// 書き込み先シートを開く
pub trait SheetBackend {
    /// ワークシートが存在しない場合は `Ok(None)`
    fn open(&self, target: &SheetTarget) -> Result<Option<Box<dyn SheetClient>>>;
}
