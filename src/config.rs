use crate::error::{MealScanError, Result};
use meal_scan_common::MealType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 識別・保存サービスのベースURL
    pub server_url: String,
    /// 保存時の食事区分の初期選択
    pub default_meal_type: MealType,
    /// リクエストのタイムアウト（未設定なら無制限）
    pub timeout_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            default_meal_type: MealType::Lunch,
            timeout_seconds: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MealScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("meal-scan").join("config.json"))
    }

    /// サーバーURLを検証して設定
    pub fn set_server_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim().trim_end_matches('/');
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| MealScanError::Config(format!("不正なURL: {} ({})", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MealScanError::Config(format!(
                "http/https のURLを指定してください: {}",
                url
            )));
        }
        self.server_url = url.to_string();
        Ok(())
    }
}
