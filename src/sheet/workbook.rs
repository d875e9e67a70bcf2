use super::{RangeUpdate, SheetBackend, SheetClient, SheetDocument};
use crate::config::SheetTarget;
use crate::error::{Result, SheetError};
use scoresheet_common::{CellRef, GridRange};
use std::path::{Path, PathBuf};
use tracing::debug;

/// ローカルJSONワークブックの1ワークシート
///
/// 変更のたびにファイルへ書き戻す。
pub struct WorkbookSheet {
    path: PathBuf,
    worksheet: String,
    title: String,
    doc: SheetDocument,
}

impl WorkbookSheet {
    pub fn open(path: &Path, worksheet: &str) -> Result<Self> {
        let doc = SheetDocument::load(path)?;
        if doc.worksheet(worksheet).is_none() {
            return Err(SheetError::WorksheetNotFound(format!(
                "{} ({})",
                worksheet,
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            worksheet: worksheet.to_string(),
            title: format!("{}#{}", path.display(), worksheet),
            doc,
        })
    }

    /// 複製に変更を適用し、保存できたときだけ反映する
    ///
    /// 保存に失敗した呼び出しはメモリ上の文書も変更しない。
    fn modify<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut super::Worksheet),
    {
        let mut next = self.doc.clone();
        let ws = next
            .worksheet_mut(&self.worksheet)
            .ok_or_else(|| SheetError::WorksheetNotFound(self.worksheet.clone()))?;
        f(ws);
        next.save(&self.path)
            .map_err(|e| SheetError::SheetUpdate(format!("{}: {}", self.title, e)))?;
        self.doc = next;
        Ok(())
    }
}

impl SheetClient for WorkbookSheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn cell_value(&mut self, cell: CellRef) -> Result<Option<String>> {
        let ws = self
            .doc
            .worksheet(&self.worksheet)
            .ok_or_else(|| SheetError::WorksheetNotFound(self.worksheet.clone()))?;
        Ok(ws.get(cell).map(str::to_string))
    }

    fn update_cell(&mut self, cell: CellRef, value: &str) -> Result<()> {
        debug!(sheet = %self.title, %cell, value, "update cell");
        self.modify(|ws| ws.set(cell, value))
    }

    fn batch_update(&mut self, updates: &[RangeUpdate]) -> Result<()> {
        debug!(sheet = %self.title, count = updates.len(), "batch update");
        self.modify(|ws| {
            for update in updates {
                ws.write_block(update.start, &update.values);
            }
        })
    }

    fn insert_range(&mut self, range: GridRange) -> Result<()> {
        debug!(sheet = %self.title, %range, "insert range");
        self.modify(|ws| ws.insert_range(range))
    }

    fn outer_border(&mut self, range: GridRange) -> Result<()> {
        debug!(sheet = %self.title, %range, "outer border");
        self.modify(|ws| ws.add_border(range))
    }
}

/// 設定のワークブックパスとワークシート名で開く
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookBackend;

impl SheetBackend for WorkbookBackend {
    fn open(&self, target: &SheetTarget) -> Result<Option<Box<dyn SheetClient>>> {
        match WorkbookSheet::open(&target.workbook, &target.worksheet) {
            Ok(sheet) => Ok(Some(Box::new(sheet) as Box<dyn SheetClient>)),
            Err(SheetError::WorksheetNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{Retrier, RetryPolicy, Retrying, Sleeper};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    fn new_workbook(dir: &Path) -> PathBuf {
        let path = dir.join("book.json");
        let mut doc = SheetDocument::default();
        doc.ensure_worksheet("Games");
        doc.save(&path).unwrap();
        path
    }

    #[test]
    fn test_open_missing_worksheet() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = new_workbook(dir.path());

        let result = WorkbookSheet::open(&path, "Nope");
        assert!(matches!(result, Err(SheetError::WorksheetNotFound(_))));
    }

    #[test]
    fn test_updates_are_persisted() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = new_workbook(dir.path());

        let mut sheet = WorkbookSheet::open(&path, "Games").unwrap();
        sheet.update_cell(CellRef::new(3, 1), "2026-10-16").unwrap();
        sheet
            .batch_update(&[RangeUpdate::single(CellRef::new(3, 2), "lakers")])
            .unwrap();

        let mut reopened = WorkbookSheet::open(&path, "Games").unwrap();
        assert_eq!(
            reopened.cell_value(CellRef::new(3, 1)).unwrap().as_deref(),
            Some("2026-10-16")
        );
        assert_eq!(
            reopened.cell_value(CellRef::new(3, 2)).unwrap().as_deref(),
            Some("lakers")
        );
    }

    /// 待機中に一時ファイルの邪魔物を取り除くSleeper
    struct UnblockingSleeper {
        blocker: PathBuf,
    }

    impl Sleeper for UnblockingSleeper {
        fn sleep(&self, _duration: Duration) {
            let _ = std::fs::remove_dir_all(&self.blocker);
        }
    }

    /// 一時ファイルの位置にディレクトリを置いて保存を失敗させる
    fn block_save(path: &Path) -> PathBuf {
        let blocker = path.with_extension("json.tmp");
        std::fs::create_dir_all(&blocker).unwrap();
        blocker
    }

    #[test]
    fn test_failed_save_leaves_sheet_unchanged() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = new_workbook(dir.path());
        let mut sheet = WorkbookSheet::open(&path, "Games").unwrap();
        sheet.update_cell(CellRef::new(3, 1), "2026-10-15").unwrap();

        let blocker = block_save(&path);
        let range = GridRange::new(CellRef::new(3, 1), 2, 6).unwrap();
        let err = sheet.insert_range(range).unwrap_err();
        assert!(matches!(err, SheetError::SheetUpdate(ref msg) if msg.contains("#Games")));

        // メモリ上もファイル上も挿入前のまま
        assert_eq!(sheet.cell_value(CellRef::new(3, 1)).unwrap().as_deref(), Some("2026-10-15"));
        let on_disk = SheetDocument::load(&path).unwrap();
        assert_eq!(on_disk.worksheet("Games").unwrap().get(CellRef::new(3, 1)), Some("2026-10-15"));

        std::fs::remove_dir_all(&blocker).unwrap();
        sheet.insert_range(range).unwrap();
        assert_eq!(sheet.cell_value(CellRef::new(3, 1)).unwrap(), None);
        assert_eq!(sheet.cell_value(CellRef::new(5, 1)).unwrap().as_deref(), Some("2026-10-15"));
    }

    #[test]
    fn test_retried_insert_shifts_exactly_once() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = new_workbook(dir.path());
        let mut inner = WorkbookSheet::open(&path, "Games").unwrap();
        inner.update_cell(CellRef::new(3, 1), "2026-10-15").unwrap();

        let blocker = block_save(&path);
        let retrier = Retrier::with_sleeper(
            RetryPolicy::new(3, Duration::from_millis(1)),
            Arc::new(UnblockingSleeper { blocker }),
        );
        let mut sheet = Retrying::new(inner, retrier);

        sheet
            .insert_range(GridRange::new(CellRef::new(3, 1), 2, 6).unwrap())
            .unwrap();

        // 2行だけ下にずれる（A3 → A5）
        assert_eq!(sheet.cell_value(CellRef::new(5, 1)).unwrap().as_deref(), Some("2026-10-15"));
        assert_eq!(sheet.cell_value(CellRef::new(7, 1)).unwrap(), None);
        let on_disk = SheetDocument::load(&path).unwrap();
        let ws = on_disk.worksheet("Games").unwrap();
        assert_eq!(ws.get(CellRef::new(5, 1)), Some("2026-10-15"));
        assert_eq!(ws.get(CellRef::new(7, 1)), None);
    }

    #[test]
    fn test_backend_opens_target() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = new_workbook(dir.path());
        let target = SheetTarget {
            name: "NBA Sheet".into(),
            workbook: path,
            worksheet: "Games".into(),
        };

        let sheet = WorkbookBackend.open(&target).unwrap().expect("ワークシートがない");
        assert!(sheet.title().ends_with("#Games"));

        let missing = SheetTarget { worksheet: "Fights".into(), ..target };
        assert!(WorkbookBackend.open(&missing).unwrap().is_none());
    }
}
