use crate::types::{ContentError, ContentResult, MediaConfig};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;

/// メディアホストへの画像アップロードを抽象化するトレイト
///
/// 実際のHTTP通信とモック実装の両方を統一的に扱えるようにするための
/// インターフェース。ルート層には機能オブジェクトとして注入する。
#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// ファイルのバイト列をアップロードし、ホスト済みのURLを返す
    ///
    /// # Arguments
    /// * `file_name` - アップロードするファイル名
    /// * `bytes` - ファイルの生バイト列
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ContentResult<String>;
}

/// `reqwest` を使用した本番用のアップローダ実装
pub struct ReqwestMediaUploader {
    client: Client,
    config: MediaConfig,
}

impl ReqwestMediaUploader {
    /// 新しいアップローダを作成
    pub fn new(config: MediaConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl MediaUploader for ReqwestMediaUploader {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ContentResult<String> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .part("file", part);

        let response = self
            .client
            .post(&self.config.upload_url)
            .multipart(form)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| ContentError::upload_failed(format!("リクエスト送信に失敗: {e}")))?;

        if !response.status().is_success() {
            return Err(ContentError::upload_failed(format!(
                "メディアホストがエラーを返しました: {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ContentError::upload_failed(format!("レスポンスの解析に失敗: {e}")))?;

        // ホストによってurl/secure_urlのどちらで返るか異なるため両方を見る
        body.get("url")
            .or_else(|| body.get("secure_url"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ContentError::upload_failed("レスポンスにURLが含まれていません".to_string())
            })
    }
}

/// テスト用のモックアップローダ
///
/// この実装はテスト時にDIされ、メディアホストへの実際の通信を行わずに
/// 定義済みのURLやエラーを返します。
pub struct MockMediaUploader {
    /// モック時に返すホスト済みURL
    pub mock_url: String,
    /// モック時に返すステータス（成功/失敗の制御）
    pub should_succeed: bool,
    /// エラー時に返すメッセージ
    pub error_message: Option<String>,
}

impl MockMediaUploader {
    /// 成功レスポンスを返すモックアップローダを作成
    pub fn new_success(mock_url: &str) -> Self {
        Self {
            mock_url: mock_url.to_string(),
            should_succeed: true,
            error_message: None,
        }
    }

    /// エラーを返すモックアップローダを作成
    pub fn new_error(error_message: &str) -> Self {
        Self {
            mock_url: String::new(),
            should_succeed: false,
            error_message: Some(error_message.to_string()),
        }
    }
}

#[async_trait]
impl MediaUploader for MockMediaUploader {
    async fn upload(&self, _file_name: &str, _bytes: Vec<u8>) -> ContentResult<String> {
        if self.should_succeed {
            Ok(self.mock_url.clone())
        } else {
            let message = self
                .error_message
                .as_deref()
                .unwrap_or("Mock upload error");
            Err(ContentError::upload_failed(message))
        }
    }
}
