//! Excel生成
//!
//! ワークブック文書をrust_xlsxwriterでxlsxに書き出す。
//! 罫線範囲は外周セルごとの上下左右の罫線に展開する。

use crate::error::{Result, SheetError};
use crate::sheet::{SheetDocument, Worksheet};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};
use scoresheet_common::{CellRef, GridRange};
use std::collections::BTreeMap;
use std::path::Path;

/// セルごとの罫線
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Edges {
    top: bool,
    bottom: bool,
    left: bool,
    right: bool,
}

impl Edges {
    fn format(&self) -> Format {
        let mut format = Format::new();
        if self.top {
            format = format.set_border_top(FormatBorder::Thin).set_border_top_color(Color::Black);
        }
        if self.bottom {
            format = format
                .set_border_bottom(FormatBorder::Thin)
                .set_border_bottom_color(Color::Black);
        }
        if self.left {
            format = format.set_border_left(FormatBorder::Thin).set_border_left_color(Color::Black);
        }
        if self.right {
            format = format
                .set_border_right(FormatBorder::Thin)
                .set_border_right_color(Color::Black);
        }
        format
    }
}

/// 罫線範囲の外周セル → 罫線
fn collect_edges(borders: &[GridRange]) -> BTreeMap<CellRef, Edges> {
    let mut edges: BTreeMap<CellRef, Edges> = BTreeMap::new();

    for range in borders {
        for col in range.start.col..=range.end_col() {
            edges.entry(CellRef::new(range.start.row, col)).or_default().top = true;
            edges.entry(CellRef::new(range.end_row(), col)).or_default().bottom = true;
        }
        for row in range.start.row..=range.end_row() {
            edges.entry(CellRef::new(row, range.start.col)).or_default().left = true;
            edges.entry(CellRef::new(row, range.end_col())).or_default().right = true;
        }
    }

    edges
}

fn write_worksheet(workbook: &mut Workbook, source: &Worksheet) -> Result<()> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&source.name)
        .map_err(|e| SheetError::Xlsx(format!("シート名設定エラー: {}", e)))?;

    let mut edges = collect_edges(&source.borders);

    for (r, row) in source.rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let cell = CellRef::new(r as u32 + 1, c as u32 + 1);
            let (xr, xc) = cell.zero_based()?;
            match edges.remove(&cell) {
                Some(edge) => worksheet.write_string_with_format(xr, xc, value, &edge.format()),
                None => worksheet.write_string(xr, xc, value),
            }
            .map_err(|e| SheetError::Xlsx(format!("{}書き込みエラー: {}", cell, e)))?;
        }
    }

    // 値のない罫線セル
    for (cell, edge) in edges {
        let (xr, xc) = cell.zero_based()?;
        worksheet
            .write_blank(xr, xc, &edge.format())
            .map_err(|e| SheetError::Xlsx(format!("{}罫線エラー: {}", cell, e)))?;
    }

    Ok(())
}

pub fn generate_excel(doc: &SheetDocument, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    for worksheet in &doc.worksheets {
        write_worksheet(&mut workbook, worksheet)?;
    }
    if doc.worksheets.is_empty() {
        workbook.add_worksheet();
    }

    workbook
        .save(output_path)
        .map_err(|e| SheetError::Xlsx(format!("Excel保存エラー: {}", e)))
}
