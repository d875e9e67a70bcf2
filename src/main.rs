use anyhow::Context;
use chrono::{Local, NaiveDate, TimeDelta};
use clap::Parser;
use scoresheet::{cli, config, export, retry, runner, sheet, source};
use cli::{Cli, Commands};
use config::Config;
use retry::Retrier;
use runner::{Runner, SyncReport};
use scoresheet_common::Sport;
use sheet::{SheetDocument, WorkbookBackend};
use source::{GameSource, JsonFeed};
use std::path::PathBuf;

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn feed_for(config: &Config, feed: Option<PathBuf>) -> JsonFeed {
    JsonFeed::new(feed.unwrap_or_else(|| config.feed_dir.clone()))
}

fn finish(report: SyncReport) -> anyhow::Result<()> {
    let updated = report.into_result()?;
    println!("\n✅ 完了（{}件のシートを更新）", updated);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let retrier = Retrier::new(config.retry.policy()?);
    let backend = WorkbookBackend;
    let sync = Runner::new(&backend, retrier, config.layout.clone());

    match cli.command {
        Commands::Schedule { sport, date, feed } => {
            let sport = Sport::from(sport);
            let date = date.unwrap_or_else(|| today() + TimeDelta::days(sport.schedule_offset_days()));
            println!("📅 scoresheet - {} 対戦カード ({})\n", sport, date);

            let games = feed_for(&config, feed).collect_games(sport, date)?;
            println!("✔ {}試合を検出\n", games.len());

            let report = sync.sync_schedule(sport, &games, date, config.targets_for(sport));
            finish(report)?;
        }

        Commands::Results { sport, date, feed } => {
            let sport = Sport::from(sport);
            if !sport.has_results() {
                anyhow::bail!("{} は試合結果の記入に対応していません", sport);
            }
            let date = date.unwrap_or_else(|| today() - TimeDelta::days(1));
            println!("🏁 scoresheet - {} 試合結果 ({})\n", sport, date);

            let results = feed_for(&config, feed).collect_results(sport, date)?;
            println!("✔ {}試合の勝者を判定\n", results.len());

            let report = sync.sync_results(sport, &results, config.targets_for(sport));
            finish(report)?;
        }

        Commands::Run { sport, date, feed } => {
            let sport = Sport::from(sport);
            let date = date.unwrap_or_else(today);
            println!("🚀 scoresheet - {} 一括処理\n", sport);

            let source = feed_for(&config, feed);
            let report = runner::run(sport, date, &source, &sync, config.targets_for(sport))?;
            finish(report)?;
        }

        Commands::Import { input, output } => {
            println!("📥 scoresheet - インポート\n");
            let doc = export::import_excel(&input)?;
            let output = output.unwrap_or_else(|| export::default_output_path(&input, "json"));
            doc.save(&output)?;
            println!("✔ {}シートを取り込み: {}", doc.worksheets.len(), output.display());
        }

        Commands::Export { input, output } => {
            println!("📄 scoresheet - エクスポート\n");
            let doc = SheetDocument::load(&input)?;
            let output = output.unwrap_or_else(|| export::default_output_path(&input, "xlsx"));
            export::generate_excel(&doc, &output)?;
            println!("✔ Excel出力: {}", output.display());
        }

        Commands::Config { show, init } => {
            if init {
                let path = match cli.config.clone() {
                    Some(path) => path,
                    None => Config::config_path()?,
                };
                if !path.exists() {
                    config.save(&path)?;
                    println!("✔ 設定ファイルを作成しました: {}", path.display());
                }

                for target in config.targets.values().flatten() {
                    if target.workbook.exists() {
                        continue;
                    }
                    let mut doc = SheetDocument::default();
                    doc.ensure_worksheet(&target.worksheet);
                    doc.save(&target.workbook)
                        .with_context(|| format!("ワークブック作成失敗: {}", target.workbook.display()))?;
                    println!("✔ ワークブックを作成しました: {}", target.workbook.display());
                }
            }

            if show || !init {
                let policy = config.retry.policy()?;
                println!("設定:");
                println!("  フィード: {}", config.feed_dir.display());
                println!("  開始セル: {}", config.layout.start_cell);
                println!("  列数: {}", config.layout.num_columns);
                println!("  最大試行回数: {}", policy.max_attempts);
                println!("  初回待ち時間: {:.1}秒", policy.base_delay.as_secs_f64());
                for (sport, targets) in &config.targets {
                    for target in targets {
                        println!(
                            "  {}: {} ({}#{})",
                            sport,
                            target.name,
                            target.workbook.display(),
                            target.worksheet
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
