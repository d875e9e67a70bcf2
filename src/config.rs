use crate::error::{Result, SheetError};
use crate::retry::RetryPolicy;
use scoresheet_common::{SheetLayout, Sport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 設定ファイルの場所を上書きする環境変数
pub const CONFIG_ENV: &str = "SCORESHEET_CONFIG";

/// 書き込み先（ワークブック内の1ワークシート）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetTarget {
    /// ログ表示名
    pub name: String,
    pub workbook: PathBuf,
    pub worksheet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_secs: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_delay_secs: policy.base_delay.as_secs_f64(),
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> Result<RetryPolicy> {
        let base_delay = Duration::try_from_secs_f64(self.base_delay_secs)
            .map_err(|e| SheetError::Config(format!("baseDelaySecs が不正: {}", e)))?;
        Ok(RetryPolicy::new(self.max_attempts, base_delay))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// フィードJSONのディレクトリ
    pub feed_dir: PathBuf,
    pub layout: SheetLayout,
    pub retry: RetrySettings,
    /// 競技ごとの書き込み先
    pub targets: BTreeMap<Sport, Vec<SheetTarget>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// `--config` → 環境変数 → ~/.config/scoresheet/config.json の順
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| SheetError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("scoresheet").join("config.json"))
    }

    fn default_config() -> Self {
        let targets = Sport::ALL
            .iter()
            .map(|sport| {
                let target = SheetTarget {
                    name: format!("{} Sheet", sport.label()),
                    workbook: PathBuf::from(format!("{}.sheet.json", sport.key())),
                    worksheet: "Games".into(),
                };
                (*sport, vec![target])
            })
            .collect();

        Self {
            feed_dir: PathBuf::from("feeds"),
            layout: SheetLayout::default(),
            retry: RetrySettings::default(),
            targets,
        }
    }

    pub fn targets_for(&self, sport: Sport) -> &[SheetTarget] {
        self.targets.get(&sport).map(Vec::as_slice).unwrap_or(&[])
    }
}
