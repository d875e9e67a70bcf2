use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use scoresheet_common::Sport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scoresheet")]
#[command(about = "スポーツの対戦カード・試合結果をスプレッドシートへ反映するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（省略時: $SCORESHEET_CONFIG または ~/.config/scoresheet/config.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// 競技（CLI引数用）
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SportArg {
    Nba,
    Mlb,
    Ufc,
}

impl From<SportArg> for Sport {
    fn from(arg: SportArg) -> Self {
        match arg {
            SportArg::Nba => Sport::Nba,
            SportArg::Mlb => Sport::Mlb,
            SportArg::Ufc => Sport::Ufc,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対戦カードを取得してシートに追加
    Schedule {
        #[arg(value_enum)]
        sport: SportArg,

        /// 対象日 (YYYY-MM-DD)。省略時は今日（MLBは翌日）
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// フィードディレクトリ（設定を上書き）
        #[arg(short, long)]
        feed: Option<PathBuf>,
    },

    /// 試合結果を取得して勝者を記入
    Results {
        #[arg(value_enum)]
        sport: SportArg,

        /// 対象日 (YYYY-MM-DD)。省略時は昨日
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// フィードディレクトリ（設定を上書き）
        #[arg(short, long)]
        feed: Option<PathBuf>,
    },

    /// 試合結果の記入から対戦カードの追加まで一括実行
    Run {
        #[arg(value_enum)]
        sport: SportArg,

        /// 実行日 (YYYY-MM-DD)。省略時は今日
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// フィードディレクトリ（設定を上書き）
        #[arg(short, long)]
        feed: Option<PathBuf>,
    },

    /// xlsxからワークブックJSONを作成
    Import {
        /// 入力xlsxファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力JSON（省略時: 入力と同じ場所）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// ワークブックJSONをxlsxに書き出し
    Export {
        /// 入力ワークブックJSON
        #[arg(required = true)]
        input: PathBuf,

        /// 出力xlsx（省略時: 入力と同じ場所）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定の設定ファイルと空のワークブックを作成
        #[arg(long)]
        init: bool,
    },
}
