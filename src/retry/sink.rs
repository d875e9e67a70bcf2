use super::Retrier;
use crate::error::Result;
use crate::sheet::{RangeUpdate, SheetClient};
use scoresheet_common::{CellRef, GridRange};

/// 全呼び出しを再試行で包むシートクライアント
pub struct Retrying<S> {
    inner: S,
    retrier: Retrier,
}

impl<S: SheetClient> Retrying<S> {
    pub fn new(inner: S, retrier: Retrier) -> Self {
        Self { inner, retrier }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: SheetClient> SheetClient for Retrying<S> {
    fn title(&self) -> &str {
        self.inner.title()
    }

    fn cell_value(&mut self, cell: CellRef) -> Result<Option<String>> {
        self.retrier.run(|| self.inner.cell_value(cell))
    }

    fn update_cell(&mut self, cell: CellRef, value: &str) -> Result<()> {
        self.retrier.run(|| self.inner.update_cell(cell, value))
    }

    fn batch_update(&mut self, updates: &[RangeUpdate]) -> Result<()> {
        self.retrier.run(|| self.inner.batch_update(updates))
    }

    fn insert_range(&mut self, range: GridRange) -> Result<()> {
        self.retrier.run(|| self.inner.insert_range(range))
    }

    fn outer_border(&mut self, range: GridRange) -> Result<()> {
        self.retrier.run(|| self.inner.outer_border(range))
    }
}
