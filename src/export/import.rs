//! Excel読み込み
//!
//! 既存のxlsxからセル値だけを取り込んでワークブック文書を作る。
//! 書式（罫線など）は取り込まない。

use crate::error::{Result, SheetError};
use crate::sheet::SheetDocument;
use calamine::{open_workbook_auto, Data, Reader};
use scoresheet_common::CellRef;
use std::path::Path;

pub fn import_excel(input_path: &Path) -> Result<SheetDocument> {
    if !input_path.exists() {
        return Err(SheetError::WorkbookNotFound(input_path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(input_path)
        .map_err(|e| SheetError::Import(format!("{}: {}", input_path.display(), e)))?;

    let mut doc = SheetDocument::default();

    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| SheetError::Import(format!("{}: {}", name, e)))?;

        let worksheet = doc.ensure_worksheet(&name);
        let (row0, col0) = range.start().unwrap_or((0, 0));

        for (dr, row) in range.rows().enumerate() {
            for (dc, value) in row.iter().enumerate() {
                if matches!(value, Data::Empty) {
                    continue;
                }
                let cell = CellRef::new(row0 + dr as u32 + 1, col0 + dc as u32 + 1);
                worksheet.set(cell, value.to_string());
            }
        }
    }

    Ok(doc)
}
