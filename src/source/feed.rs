//! JSONフィード
//!
//! スクレイパーが書き出したJSONを読み込む。
//!
//! - `<dir>/<sport>/schedule-YYYY-MM-DD.json`: 対戦カード
//! - `<dir>/<sport>/results-YYYY-MM-DD.json`: スコア

use super::GameSource;
use crate::error::{Result, SheetError};
use chrono::NaiveDate;
use scoresheet_common::{decide_winner, GameRecord, Outcome, ResultRecord, Sport};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 対戦カードの1エントリ（ページ上の並び順）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleEntry {
    #[serde(alias = "away", alias = "fighter1")]
    pub a: Option<String>,
    #[serde(alias = "home", alias = "fighter2")]
    pub b: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleFeed {
    pub date: Option<String>,
    pub games: Vec<ScheduleEntry>,
}

impl ScheduleFeed {
    /// indexは走査順。名前が欠けたエントリは飛ばすがindexは消費する
    pub fn into_records(self) -> Vec<GameRecord> {
        let mut records = Vec::with_capacity(self.games.len());

        for (i, entry) in self.games.into_iter().enumerate() {
            let index = i as u32 + 1;
            match (non_blank(entry.a), non_blank(entry.b)) {
                (Some(a), Some(b)) => {
                    info!("Game {}: {} @ {}", index, a, b);
                    records.push(GameRecord::new(index, a, b));
                }
                (a, b) => {
                    warn!(index, ?a, ?b, "Error processing game {}: participant missing", index);
                }
            }
        }

        records
    }
}

/// スコアの1エントリ。スコアは表示テキストのまま持つ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreEntry {
    #[serde(deserialize_with = "score_text")]
    pub away: Option<String>,
    #[serde(deserialize_with = "score_text")]
    pub home: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsFeed {
    pub date: Option<String>,
    pub games: Vec<ScoreEntry>,
}

impl ResultsFeed {
    /// indexはエントリ位置（1始まり）。判定できない試合は飛ばす
    pub fn into_results(self) -> ResultRecord {
        let mut results = ResultRecord::new();

        for (i, entry) in self.games.iter().enumerate() {
            let index = i as u32 + 1;
            match decide_winner(entry.away.as_deref(), entry.home.as_deref()) {
                Outcome::Decided { winner, away, home } => {
                    info!("Game {}: Away {} - Home {} -> Winner: {}", index, away, home, winner);
                    results.insert(index, winner);
                }
                Outcome::Tie(score) => {
                    info!("Tie game found for game {} ({}-{}) - skipping", index, score, score);
                }
                Outcome::Unreadable => {
                    warn!(
                        "Game {}: Could not extract valid scores - Away: {:?}, Home: {:?}",
                        index, entry.away, entry.home
                    );
                }
                Outcome::Upcoming => {
                    info!("Game {}: scores not available (upcoming game)", index);
                }
            }
        }

        results
    }
}

/// 文字列でも数値でも受け付ける
fn score_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// ディレクトリ配下のJSONフィード
#[derive(Debug, Clone)]
pub struct JsonFeed {
    dir: PathBuf,
}

impl JsonFeed {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn schedule_path(&self, sport: Sport, date: NaiveDate) -> PathBuf {
        self.dir
            .join(sport.key())
            .join(format!("schedule-{}.json", date.format("%Y-%m-%d")))
    }

    pub fn results_path(&self, sport: Sport, date: NaiveDate) -> PathBuf {
        self.dir
            .join(sport.key())
            .join(format!("results-{}.json", date.format("%Y-%m-%d")))
    }

    fn read<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
        if !path.exists() {
            return Err(SheetError::FeedNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| SheetError::FeedParse(format!("{}: {}", path.display(), e)))
    }
}

impl GameSource for JsonFeed {
    fn collect_games(&self, sport: Sport, date: NaiveDate) -> Result<Vec<GameRecord>> {
        let feed: ScheduleFeed = Self::read(&self.schedule_path(sport, date))?;
        info!("Found {} {} games for {}", feed.games.len(), sport, date);
        Ok(feed.into_records())
    }

    fn collect_results(&self, sport: Sport, date: NaiveDate) -> Result<ResultRecord> {
        let feed: ResultsFeed = Self::read(&self.results_path(sport, date))?;
        info!("Found {} {} game elements for date {}", feed.games.len(), sport, date);
        Ok(feed.into_results())
    }
}
