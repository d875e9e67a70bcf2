//! A1形式のセル参照と矩形範囲
//!
//! 行・列は1始まり（"A1" → row 1, col 1）。

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// セル参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// "A3" / "AA10" をパース
    pub fn parse(s: &str) -> Result<Self> {
        lazy_static::lazy_static! {
            static ref A1_RE: Regex = Regex::new(r"^([A-Za-z]{1,3})([1-9][0-9]*)$").unwrap();
        }

        let caps = A1_RE
            .captures(s.trim())
            .ok_or_else(|| Error::InvalidCell(s.to_string()))?;

        let col = caps[1]
            .bytes()
            .fold(0u32, |acc, b| acc * 26 + u32::from(b.to_ascii_uppercase() - b'A' + 1));
        let row: u32 = caps[2]
            .parse()
            .map_err(|_| Error::InvalidCell(s.to_string()))?;

        Ok(Self { row, col })
    }

    /// 列番号 → 列名（1 → "A", 27 → "AA"）
    pub fn column_name(col: u32) -> String {
        let mut n = col;
        let mut name = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            name.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        name.reverse();
        String::from_utf8(name).unwrap_or_default()
    }

    /// 0始まり (row, col) に変換（xlsx書き出し用）
    ///
    /// 列が u16 に収まらない場合はエラー。
    pub fn zero_based(&self) -> Result<(u32, u16)> {
        let col = u16::try_from(self.col.saturating_sub(1))
            .map_err(|_| Error::InvalidCell(self.to_string()))?;
        Ok((self.row.saturating_sub(1), col))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_name(self.col), self.row)
    }
}

impl FromStr for CellRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// 開始セルから rows × cols の矩形範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRange {
    pub start: CellRef,
    pub rows: u32,
    pub cols: u32,
}

impl GridRange {
    pub fn new(start: CellRef, rows: u32, cols: u32) -> Result<Self> {
        let out_of_bounds = start.row.checked_add(rows.saturating_sub(1)).is_none()
            || start.col.checked_add(cols.saturating_sub(1)).is_none();
        if rows == 0 || cols == 0 || out_of_bounds {
            return Err(Error::InvalidRange(format!(
                "{}から{}行×{}列",
                start, rows, cols
            )));
        }
        Ok(Self { start, rows, cols })
    }

    /// 最終行（含む）
    pub fn end_row(&self) -> u32 {
        self.start.row + self.rows - 1
    }

    /// 最終列（含む）
    pub fn end_col(&self) -> u32 {
        self.start.col + self.cols - 1
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        (self.start.row..=self.end_row()).contains(&cell.row)
            && (self.start.col..=self.end_col()).contains(&cell.col)
    }

    /// 列範囲が other の列範囲に収まっているか
    pub fn within_columns_of(&self, other: &GridRange) -> bool {
        self.start.col >= other.start.col && self.end_col() <= other.end_col()
    }
}

impl fmt::Display for GridRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.start,
            CellRef::new(self.end_row(), self.end_col())
        )
    }
}
