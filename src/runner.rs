//! 同期処理
//!
//! 1. 前日の試合結果をD列へ反映
//! 2. 対戦カード分の行を開始セルに挿入し、罫線を引き、日付とB/C列を書き込む
//!
//! シートごとに独立して処理し、失敗したシートは記録して次へ進む。

use crate::config::SheetTarget;
use crate::error::{Result, SheetError};
use crate::retry::{Retrier, Retrying};
use crate::sheet::{RangeUpdate, SheetBackend, SheetClient};
use crate::source::GameSource;
use chrono::{NaiveDate, TimeDelta};
use scoresheet_common::layout::{AWAY_COL, DATE_FORMAT, HOME_COL, WINNER_COL};
use scoresheet_common::{CellRef, GameRecord, ResultRecord, SheetLayout, Sport, Winner};
use tracing::{error, info, warn};

/// 同期結果
#[derive(Debug, Default)]
pub struct SyncReport {
    /// 更新できたシート数
    pub updated: usize,
    /// (シート名, エラー)
    pub failures: Vec<(String, SheetError)>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: SyncReport) {
        self.updated += other.updated;
        self.failures.extend(other.failures);
    }

    /// 失敗があればエラーにする
    pub fn into_result(self) -> Result<usize> {
        if self.failures.is_empty() {
            Ok(self.updated)
        } else {
            Err(SheetError::SyncFailed { failed: self.failures.len() })
        }
    }
}

pub struct Runner<'a> {
    backend: &'a dyn SheetBackend,
    retrier: Retrier,
    layout: SheetLayout,
}

impl<'a> Runner<'a> {
    pub fn new(backend: &'a dyn SheetBackend, retrier: Retrier, layout: SheetLayout) -> Self {
        Self { backend, retrier, layout }
    }

    /// シートを開き、以降の呼び出しを再試行で包む
    fn open(&self, target: &SheetTarget) -> Result<Retrying<Box<dyn SheetClient>>> {
        let sheet = self
            .retrier
            .run(|| self.backend.open(target))?
            .ok_or_else(|| SheetError::WorksheetNotFound(format!("{} ({})", target.worksheet, target.name)))?;
        Ok(Retrying::new(sheet, self.retrier.clone()))
    }

    fn for_each_target<F>(&self, targets: &[SheetTarget], mut f: F) -> SyncReport
    where
        F: FnMut(&mut Retrying<Box<dyn SheetClient>>) -> Result<()>,
    {
        let mut report = SyncReport::default();

        for target in targets {
            println!("- {} を更新中...", target.name);
            let outcome = self.open(target).and_then(|mut sheet| f(&mut sheet));
            match outcome {
                Ok(()) => {
                    println!("✔ {} 更新完了", target.name);
                    report.updated += 1;
                }
                Err(e) => {
                    error!(sheet = %target.name, error = %e, "Error updating {}: {}", target.name, e);
                    println!("✘ {} の更新に失敗: {}", target.name, e);
                    report.failures.push((target.name.clone(), e));
                }
            }
        }

        report
    }

    /// 対戦カードを書き込む
    pub fn sync_schedule(
        &self,
        sport: Sport,
        games: &[GameRecord],
        date: NaiveDate,
        targets: &[SheetTarget],
    ) -> SyncReport {
        if games.is_empty() {
            info!("No {} games scheduled for {}. Skipping update.", sport, date);
            return SyncReport::default();
        }

        self.for_each_target(targets, |sheet| self.write_schedule(sheet, sport, games, date))
    }

    /// 試合結果の勝者をD列に書き込む
    pub fn sync_results(
        &self,
        sport: Sport,
        results: &ResultRecord,
        targets: &[SheetTarget],
    ) -> SyncReport {
        if results.is_empty() {
            info!("No {} game results to update.", sport);
            return SyncReport::default();
        }

        self.for_each_target(targets, |sheet| self.write_results(sheet, results).map(|_| ()))
    }

    pub fn write_schedule(
        &self,
        sheet: &mut dyn SheetClient,
        sport: Sport,
        games: &[GameRecord],
        date: NaiveDate,
    ) -> Result<()> {
        // 行数は最後のindex（欠番があっても行を確保する）
        let num_rows = games.iter().map(|g| g.index).max().unwrap_or(0);
        let block = self.layout.block(num_rows)?;

        sheet.insert_range(block)?;
        info!("Inserted cells and shifted down on {} at {}", sheet.title(), block);

        sheet.outer_border(block)?;
        info!("Outer border created on {} around {}", sheet.title(), block);

        let start = self.layout.start()?;
        sheet.update_cell(start, &date.format(DATE_FORMAT).to_string())?;

        let label = |s: &str| {
            if sport.lowercase_labels() {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };

        let mut updates = Vec::with_capacity(games.len() * 2);
        for game in games {
            let row = self.layout.row_for(game.index)?;
            updates.push(RangeUpdate::single(CellRef::new(row, AWAY_COL), label(&game.participant_a)));
            updates.push(RangeUpdate::single(CellRef::new(row, HOME_COL), label(&game.participant_b)));
        }

        sheet.batch_update(&updates)
    }

    /// 書き込んだ勝者数を返す
    pub fn write_results(&self, sheet: &mut dyn SheetClient, results: &ResultRecord) -> Result<usize> {
        let mut updates = Vec::new();

        for (&index, &winner) in results {
            let row = self.layout.row_for(index)?;
            let col = match winner {
                Winner::Away => AWAY_COL,
                Winner::Home => HOME_COL,
            };

            match sheet.cell_value(CellRef::new(row, col))? {
                Some(team) => {
                    let target = CellRef::new(row, WINNER_COL);
                    info!("Queued {} '{}' to {} as the winner.", winner, team, target);
                    updates.push(RangeUpdate::single(target, team));
                }
                None => {
                    warn!("Game {}: no participant at {} - skipping", index, CellRef::new(row, col));
                }
            }
        }

        if !updates.is_empty() {
            sheet.batch_update(&updates)?;
        }
        Ok(updates.len())
    }
}

/// 前日結果 → 対戦カードの順で1競技分を同期する
///
/// 取得元のエラーはそのまま返す。シートごとの失敗は SyncReport に入る。
pub fn run(
    sport: Sport,
    today: NaiveDate,
    source: &dyn GameSource,
    runner: &Runner<'_>,
    targets: &[SheetTarget],
) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    if sport.has_results() {
        let yesterday = today - TimeDelta::days(1);
        println!("[1/2] {} の試合結果を取得中 ({})...", sport, yesterday);
        let results = source.collect_results(sport, yesterday)?;
        report.merge(runner.sync_results(sport, &results, targets));
    }

    let date = today + TimeDelta::days(sport.schedule_offset_days());
    println!("[2/2] {} の対戦カードを取得中 ({})...", sport, date);
    let games = source.collect_games(sport, date)?;
    report.merge(runner.sync_schedule(sport, &games, date, targets));

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{RecordingSleeper, RetryPolicy};
    use crate::sheet::{SheetDocument, WorkbookBackend, WorkbookSheet};
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    fn retrier() -> Retrier {
        Retrier::with_sleeper(
            RetryPolicy::new(3, Duration::from_millis(1)),
            Arc::new(RecordingSleeper::default()),
        )
    }

    fn target(dir: &Path, worksheet: &str) -> SheetTarget {
        let workbook = dir.join("nba.sheet.json");
        if !workbook.exists() {
            let mut doc = SheetDocument::default();
            doc.ensure_worksheet("Games");
            doc.save(&workbook).unwrap();
        }
        SheetTarget {
            name: "NBA Sheet".into(),
            workbook,
            worksheet: worksheet.into(),
        }
    }

    fn value(sheet: &mut WorkbookSheet, cell: &str) -> Option<String> {
        sheet.cell_value(CellRef::parse(cell).unwrap()).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_schedule_writes_block() {
        let dir = tempdir().expect("Failed to create temp dir");
        let target = target(dir.path(), "Games");
        let runner = Runner::new(&WorkbookBackend, retrier(), SheetLayout::default());

        let games = vec![
            GameRecord::new(1, "Lakers", "Celtics"),
            GameRecord::new(2, "Heat", "Knicks"),
        ];
        let report = runner.sync_schedule(Sport::Nba, &games, date(), &[target.clone()]);
        assert!(report.is_success());
        assert_eq!(report.updated, 1);

        let mut sheet = WorkbookSheet::open(&target.workbook, "Games").unwrap();
        assert_eq!(value(&mut sheet, "A3").as_deref(), Some("2026-10-16"));
        assert_eq!(value(&mut sheet, "B3").as_deref(), Some("lakers"));
        assert_eq!(value(&mut sheet, "C4").as_deref(), Some("knicks"));

        let doc = SheetDocument::load(&target.workbook).unwrap();
        let borders = &doc.worksheet("Games").unwrap().borders;
        assert_eq!(borders.len(), 1);
        assert_eq!(borders[0].to_string(), "A3:F4");
    }

    #[test]
    fn test_schedule_keeps_fighter_case() {
        let dir = tempdir().expect("Failed to create temp dir");
        let target = target(dir.path(), "Games");
        let runner = Runner::new(&WorkbookBackend, retrier(), SheetLayout::default());

        let fights = vec![GameRecord::new(1, "Jon Jones", "Stipe Miocic")];
        runner.sync_schedule(Sport::Ufc, &fights, date(), &[target.clone()]);

        let mut sheet = WorkbookSheet::open(&target.workbook, "Games").unwrap();
        assert_eq!(value(&mut sheet, "B3").as_deref(), Some("Jon Jones"));
    }

    #[test]
    fn test_second_day_shifts_previous_block() {
        let dir = tempdir().expect("Failed to create temp dir");
        let target = target(dir.path(), "Games");
        let runner = Runner::new(&WorkbookBackend, retrier(), SheetLayout::default());

        let day1 = vec![GameRecord::new(1, "Lakers", "Celtics")];
        let day2 = vec![
            GameRecord::new(1, "Heat", "Knicks"),
            GameRecord::new(2, "Bulls", "Nets"),
        ];
        runner.sync_schedule(Sport::Nba, &day1, date(), &[target.clone()]);
        runner.sync_schedule(Sport::Nba, &day2, date().succ_opt().unwrap(), &[target.clone()]);

        let mut sheet = WorkbookSheet::open(&target.workbook, "Games").unwrap();
        assert_eq!(value(&mut sheet, "A3").as_deref(), Some("2026-10-17"));
        assert_eq!(value(&mut sheet, "B3").as_deref(), Some("heat"));
        // 前日分は2行下へ
        assert_eq!(value(&mut sheet, "A5").as_deref(), Some("2026-10-16"));
        assert_eq!(value(&mut sheet, "B5").as_deref(), Some("lakers"));

        let doc = SheetDocument::load(&target.workbook).unwrap();
        let borders: Vec<String> = doc.worksheet("Games").unwrap().borders.iter().map(|b| b.to_string()).collect();
        assert_eq!(borders, vec!["A5:F5", "A3:F4"]);
    }

    #[test]
    fn test_results_write_winner_column() {
        let dir = tempdir().expect("Failed to create temp dir");
        let target = target(dir.path(), "Games");
        let runner = Runner::new(&WorkbookBackend, retrier(), SheetLayout::default());

        let games = vec![
            GameRecord::new(1, "Lakers", "Celtics"),
            GameRecord::new(2, "Heat", "Knicks"),
        ];
        runner.sync_schedule(Sport::Nba, &games, date(), &[target.clone()]);

        let mut results = ResultRecord::new();
        results.insert(1, Winner::Home);
        results.insert(2, Winner::Away);
        let report = runner.sync_results(Sport::Nba, &results, &[target.clone()]);
        assert!(report.is_success());

        let mut sheet = WorkbookSheet::open(&target.workbook, "Games").unwrap();
        assert_eq!(value(&mut sheet, "D3").as_deref(), Some("celtics"));
        assert_eq!(value(&mut sheet, "D4").as_deref(), Some("heat"));
    }

    #[test]
    fn test_missing_worksheet_is_skipped() {
        let dir = tempdir().expect("Failed to create temp dir");
        let good = target(dir.path(), "Games");
        let missing = SheetTarget { name: "Old Sheet".into(), ..target(dir.path(), "Archive") };
        let runner = Runner::new(&WorkbookBackend, retrier(), SheetLayout::default());

        let games = vec![GameRecord::new(1, "Lakers", "Celtics")];
        let report = runner.sync_schedule(Sport::Nba, &games, date(), &[missing, good.clone()]);

        // 失敗したシートを飛ばして次を更新する
        assert_eq!(report.updated, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "Old Sheet");
        assert!(matches!(report.failures[0].1, SheetError::WorksheetNotFound(_)));
        assert!(matches!(report.into_result(), Err(SheetError::SyncFailed { failed: 1 })));
    }

    #[test]
    fn test_empty_games_do_nothing() {
        let dir = tempdir().expect("Failed to create temp dir");
        let target = target(dir.path(), "Games");
        let runner = Runner::new(&WorkbookBackend, retrier(), SheetLayout::default());

        let report = runner.sync_schedule(Sport::Mlb, &[], date(), &[target.clone()]);
        assert_eq!(report.updated, 0);

        let doc = SheetDocument::load(&target.workbook).unwrap();
        assert_eq!(doc.worksheet("Games").unwrap().row_count(), 0);
    }

    #[test]
    fn test_schedule_rows_follow_last_index() {
        let dir = tempdir().expect("Failed to create temp dir");
        let target = target(dir.path(), "Games");
        let runner = Runner::new(&WorkbookBackend, retrier(), SheetLayout::default());

        // 2試合目は取得失敗で欠番
        let games = vec![
            GameRecord::new(1, "Yankees", "Red Sox"),
            GameRecord::new(3, "Mets", "Braves"),
        ];
        runner.sync_schedule(Sport::Mlb, &games, date(), &[target.clone()]);

        let doc = SheetDocument::load(&target.workbook).unwrap();
        let ws = doc.worksheet("Games").unwrap();
        assert_eq!(ws.borders[0].to_string(), "A3:F5");
        assert_eq!(ws.get(CellRef::parse("B5").unwrap()), Some("mets"));
        assert_eq!(ws.get(CellRef::parse("B4").unwrap()), None);
    }
}
