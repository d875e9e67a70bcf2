//! 試合データの型定義
//!
//! CLIとテストで共有される型:
//! - Sport: 対象競技（NBA/MLB/UFC）
//! - GameRecord: 取得した1試合分の対戦カード
//! - Winner / ResultRecord: 前日の試合結果

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 対象競技
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Nba,
    Mlb,
    Ufc,
}

impl Sport {
    pub const ALL: [Sport; 3] = [Sport::Nba, Sport::Mlb, Sport::Ufc];

    /// フィード/設定で使うキー
    pub fn key(&self) -> &'static str {
        match self {
            Sport::Nba => "nba",
            Sport::Mlb => "mlb",
            Sport::Ufc => "ufc",
        }
    }

    /// 表示名
    pub fn label(&self) -> &'static str {
        match self {
            Sport::Nba => "NBA",
            Sport::Mlb => "MLB",
            Sport::Ufc => "UFC",
        }
    }

    /// 実行日から見た対戦カードの日付オフセット（MLBは翌日分）
    pub fn schedule_offset_days(&self) -> i64 {
        match self {
            Sport::Mlb => 1,
            Sport::Nba | Sport::Ufc => 0,
        }
    }

    /// チーム名は小文字で書き込む。選手名はそのまま
    pub fn lowercase_labels(&self) -> bool {
        !matches!(self, Sport::Ufc)
    }

    /// 前日結果の反映があるか
    pub fn has_results(&self) -> bool {
        !matches!(self, Sport::Ufc)
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nba" => Ok(Sport::Nba),
            "mlb" => Ok(Sport::Mlb),
            "ufc" => Ok(Sport::Ufc),
            _ => Err(format!("Unknown sport: {}. Use nba, mlb, or ufc", s)),
        }
    }
}

/// 対戦カード（index, A側, B側）
///
/// チーム競技ではA=アウェイ、B=ホーム。UFCでは選手1/選手2。
/// indexは走査順に1から振られる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub index: u32,
    pub participant_a: String,
    pub participant_b: String,
}

impl GameRecord {
    pub fn new(index: u32, participant_a: impl Into<String>, participant_b: impl Into<String>) -> Self {
        Self {
            index,
            participant_a: participant_a.into(),
            participant_b: participant_b.into(),
        }
    }
}

/// 勝者側
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Winner {
    Away,
    Home,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Away => write!(f, "AWAY"),
            Winner::Home => write!(f, "HOME"),
        }
    }
}

/// 試合index → 勝者
pub type ResultRecord = BTreeMap<u32, Winner>;
