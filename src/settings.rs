//! 課題管理サーバーへの接続設定
//!
//! 設定値はホストが管理するキーバリューストアから読み込む。
//! 保存はホスト側の責務で、ここでは読み込みと検証のみを扱う。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Error, Result};

/// 設定ストア上のキー
pub mod keys {
    pub const DEFAULT_URL: &str = "JiraBugTracker@default_url";
    pub const LOGIN: &str = "JiraBugTracker@login";
    pub const PASSWORD: &str = "JiraBugTracker@password";
}

/// 接続設定。構築後は変更しない
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSettings {
    pub url: String,
    pub login: String,
    pub password: String,
}

impl TrackerSettings {
    pub fn new(url: impl Into<String>, login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            login: login.into(),
            password: password.into(),
        }
    }

    /// URL・ログイン・パスワードがすべて空でなければ true
    pub fn is_complete(&self) -> bool {
        !(self.url.is_empty() || self.login.is_empty() || self.password.is_empty())
    }

    /// ストアから設定を読み込む。未設定のキーは空文字列になる
    pub fn resolve(store: &dyn SettingsStore) -> Self {
        Self {
            url: store.get_string(keys::DEFAULT_URL).unwrap_or_default(),
            login: store.get_string(keys::LOGIN).unwrap_or_default(),
            password: store.get_string(keys::PASSWORD).unwrap_or_default(),
        }
    }
}

/// ホストの設定ストアの抽象化トレイト
pub trait SettingsStore: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;
}

/// 設定が不完全なときに呼ばれる設定エディタ
///
/// `edit_settings` が戻った時点でストアが更新されていることを期待する。
pub trait SettingsEditor: Send + Sync {
    fn edit_settings(&self, message: &str);

    fn show_error(&self, message: &str);
}

/// 何もしない設定エディタ
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSettingsEditor;

impl SettingsEditor for NoopSettingsEditor {
    fn edit_settings(&self, _message: &str) {}

    fn show_error(&self, _message: &str) {}
}

/// メモリ上の設定ストア
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: &TrackerSettings) -> Self {
        let store = Self::new();
        store.apply(settings);
        store
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.into(), value.into());
        }
    }

    /// 3 つの接続設定をまとめて書き込む
    pub fn apply(&self, settings: &TrackerSettings) {
        self.set(keys::DEFAULT_URL, settings.url.clone());
        self.set(keys::LOGIN, settings.login.clone());
        self.set(keys::PASSWORD, settings.password.clone());
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }
}

/// 環境変数（と `.env`）から読む設定ストア
#[derive(Debug, Clone)]
pub struct EnvSettingsStore {
    url_var: String,
    login_var: String,
    password_var: String,
}

impl EnvSettingsStore {
    pub fn new() -> Self {
        dotenv::dotenv().ok();
        Self {
            url_var: "JIRA_URL".to_string(),
            login_var: "JIRA_USER".to_string(),
            password_var: "JIRA_API_TOKEN".to_string(),
        }
    }

    /// 環境変数名の接頭辞を変える（`{prefix}_URL` など）
    pub fn with_prefix(prefix: &str) -> Self {
        dotenv::dotenv().ok();
        Self {
            url_var: format!("{}_URL", prefix),
            login_var: format!("{}_USER", prefix),
            password_var: format!("{}_API_TOKEN", prefix),
        }
    }
}

impl Default for EnvSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for EnvSettingsStore {
    fn get_string(&self, key: &str) -> Option<String> {
        let var = match key {
            keys::DEFAULT_URL => &self.url_var,
            keys::LOGIN => &self.login_var,
            keys::PASSWORD => &self.password_var,
            _ => return None,
        };
        std::env::var(var).ok()
    }
}

/// JSON ファイルベースの設定ストア（フラットなキーバリュー）
#[derive(Debug, Clone, Default)]
pub struct FileSettingsStore {
    values: HashMap<String, String>,
}

impl FileSettingsStore {
    /// ファイルを読み込む。ファイルが無ければ空のストアになる
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let values = serde_json::from_str(&contents).map_err(|e| {
            Error::InvalidConfiguration(format!("{}: {}", path.display(), e))
        })?;
        Ok(Self { values })
    }

    /// デフォルトの設定ファイルの場所
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::InvalidConfiguration("設定ディレクトリが見つかりません".to_string()))?;
        Ok(config_dir.join("jira-bug-tracker").join("settings.json"))
    }

    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path()?)
    }
}

impl SettingsStore for FileSettingsStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
