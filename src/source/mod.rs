//! 試合データの取得元
//!
//! 取得の失敗は再試行しない（呼び出し側で判断する）。

mod feed;

pub use feed::{JsonFeed, ResultsFeed, ScheduleFeed, ScoreEntry, ScheduleEntry};

use crate::error::Result;
use chrono::NaiveDate;
use scoresheet_common::{GameRecord, ResultRecord, Sport};

pub trait GameSource {
    /// 指定日の対戦カード（indexは走査順に1から）
    fn collect_games(&self, sport: Sport, date: NaiveDate) -> Result<Vec<GameRecord>>;

    /// 指定日の試合結果
    fn collect_results(&self, sport: Sport, date: NaiveDate) -> Result<ResultRecord>;
}
