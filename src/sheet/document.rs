//! ワークブック文書
//!
//! ワークシートごとに文字列セルのグリッドと罫線範囲を持つ。
//! JSONで保存し、xlsxへはexportで書き出す。

use crate::error::{Result, SheetError};
use scoresheet_common::{CellRef, GridRange};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetDocument {
    /// バージョン（互換性チェック用）
    version: u32,
    #[serde(default)]
    pub worksheets: Vec<Worksheet>,
}

impl Default for SheetDocument {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            worksheets: Vec::new(),
        }
    }
}

impl SheetDocument {
    const CURRENT_VERSION: u32 = 1;

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SheetError::WorkbookNotFound(path.display().to_string()));
        }

        let reader = BufReader::new(File::open(path)?);
        let doc: SheetDocument = serde_json::from_reader(reader)?;
        if doc.version != Self::CURRENT_VERSION {
            return Err(SheetError::Config(format!(
                "ワークブックのバージョンが不一致: {} (期待値 {})",
                doc.version,
                Self::CURRENT_VERSION
            )));
        }
        Ok(doc)
    }

    /// 一時ファイルに書いてから置き換える
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn worksheet(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name == name)
    }

    pub fn worksheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.worksheets.iter_mut().find(|ws| ws.name == name)
    }

    /// 同名がなければ追加
    pub fn ensure_worksheet(&mut self, name: &str) -> &mut Worksheet {
        if let Some(pos) = self.worksheets.iter().position(|ws| ws.name == name) {
            return &mut self.worksheets[pos];
        }
        self.worksheets.push(Worksheet::new(name));
        let last = self.worksheets.len() - 1;
        &mut self.worksheets[last]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub name: String,
    /// rows[行][列]（0始まり）
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    #[serde(default)]
    pub borders: Vec<GridRange>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, cell: CellRef) -> Option<&str> {
        let (r, c) = index_of(cell);
        self.rows
            .get(r)
            .and_then(|row| row.get(c))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, cell: CellRef, value: impl Into<String>) {
        let (r, c) = index_of(cell);
        self.put(r, c, value.into());
    }

    /// start から2次元の値を書き込む
    pub fn write_block(&mut self, start: CellRef, values: &[Vec<String>]) {
        let (r0, c0) = index_of(start);
        for (dr, row) in values.iter().enumerate() {
            for (dc, value) in row.iter().enumerate() {
                self.put(r0 + dr, c0 + dc, value.clone());
            }
        }
    }

    /// 範囲の列について、開始行以降のセルを range.rows 行下へずらす
    ///
    /// 開始行以降から始まり、同じ列範囲に収まる罫線も一緒に移動する。
    pub fn insert_range(&mut self, range: GridRange) {
        let (first, _) = index_of(range.start);
        let shift = range.rows as usize;
        let old_len = self.rows.len();

        for col in range.start.col..=range.end_col() {
            let c = (col - 1) as usize;
            // 上書きしないよう下から移動
            for r in (first..old_len).rev() {
                let value = self.take(r, c);
                if !value.is_empty() {
                    self.put(r + shift, c, value);
                }
            }
        }

        for border in &mut self.borders {
            if border.start.row >= range.start.row && border.within_columns_of(&range) {
                border.start.row += range.rows;
            }
        }
    }

    pub fn add_border(&mut self, range: GridRange) {
        if !self.borders.contains(&range) {
            self.borders.push(range);
        }
    }

    /// 使用中の行数
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 使用中の最大列数
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn take(&mut self, r: usize, c: usize) -> String {
        self.rows
            .get_mut(r)
            .and_then(|row| row.get_mut(c))
            .map(std::mem::take)
            .unwrap_or_default()
    }

    fn put(&mut self, r: usize, c: usize, value: String) {
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let row = &mut self.rows[r];
        if row.len() <= c {
            row.resize_with(c + 1, String::new);
        }
        row[c] = value;
    }
}

fn index_of(cell: CellRef) -> (usize, usize) {
    (
        cell.row.saturating_sub(1) as usize,
        cell.col.saturating_sub(1) as usize,
    )
}
