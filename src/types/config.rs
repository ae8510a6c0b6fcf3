use std::env;
use thiserror::Error;

/// 設定関連のエラー型
/// 環境変数の不足や設定値の検証失敗を定義
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 環境変数が見つからない
    #[error("環境変数が見つかりません: {name}")]
    MissingEnvironmentVariable { name: String },

    /// 設定値が不正
    #[error("設定値が不正です: {reason}")]
    InvalidValue { reason: String },
}

impl ConfigError {
    /// 環境変数不足エラーを作成
    pub fn missing_env_var<N: Into<String>>(name: N) -> Self {
        Self::MissingEnvironmentVariable { name: name.into() }
    }

    /// 不正な設定値エラーを作成
    pub fn invalid_value<R: Into<String>>(reason: R) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }
}

/// 設定エラーのResult型エイリアス
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// メディアホストへの接続設定
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// アップロード先エンドポイント
    pub upload_url: String,
    /// メディアホストのAPIキー
    pub api_key: String,
}

/// アプリケーション全体の設定
/// `.env`ファイルと環境変数から組み立てる
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub media: MediaConfig,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    ///
    /// PORTは省略時に2025を使用する。それ以外は必須。
    pub fn from_env() -> ConfigResult<Self> {
        let database_url = require_env("DATABASE_URL")?;
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                ConfigError::invalid_value(format!("PORTが数値ではありません: {raw}"))
            })?,
            Err(_) => 2025,
        };
        let media = MediaConfig {
            upload_url: require_env("MEDIA_UPLOAD_URL")?,
            api_key: require_env("MEDIA_API_KEY")?,
        };

        Ok(Self {
            database_url,
            port,
            media,
        })
    }
}

fn require_env(name: &str) -> ConfigResult<String> {
    env::var(name).map_err(|_| ConfigError::missing_env_var(name))
}
