//! スコアテキストの解析と勝者判定

use crate::types::Winner;

/// スコア表示テキストを数値に変換
///
/// 前後の空白を除いて数字のみの場合だけ受け付ける。
/// "-" や "Final" などは None。
pub fn parse_score(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// 勝者判定の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Decided { winner: Winner, away: u32, home: u32 },
    /// 同点
    Tie(u32),
    /// スコアが数値でない
    Unreadable,
    /// スコア欄が揃っていない（未開始）
    Upcoming,
}

/// アウェイ/ホームのスコアテキストから勝者を判定
///
/// # Examples
/// ```
/// use scoresheet_common::{decide_winner, Outcome, Winner};
///
/// let outcome = decide_winner(Some("5"), Some("3"));
/// assert!(matches!(outcome, Outcome::Decided { winner: Winner::Away, .. }));
/// ```
pub fn decide_winner(away: Option<&str>, home: Option<&str>) -> Outcome {
    let (Some(away), Some(home)) = (away, home) else {
        return Outcome::Upcoming;
    };

    match (parse_score(away), parse_score(home)) {
        (Some(a), Some(h)) if a > h => Outcome::Decided { winner: Winner::Away, away: a, home: h },
        (Some(a), Some(h)) if h > a => Outcome::Decided { winner: Winner::Home, away: a, home: h },
        (Some(a), Some(_)) => Outcome::Tie(a),
        _ => Outcome::Unreadable,
    }
}
