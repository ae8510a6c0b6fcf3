use thiserror::Error;

/// コンテンツ操作の共通エラー型
/// ストア・ルート・アップロードの各層で共有される分類のみを定義
#[derive(Error, Debug)]
pub enum ContentError {
    /// 対象のレコードが存在しない
    #[error("対象が見つかりません: {0}")]
    NotFound(String),

    /// 入力値の検証エラー（作成時の必須フィールド欠落など）
    #[error("入力値が不正です: {field}")]
    ValidationFailed { field: String },

    /// メディアホストへのアップロードエラー
    #[error("画像アップロードに失敗しました: {message}")]
    UploadFailed { message: String },

    /// ストア操作のエラー（下位のクエリエラーをメッセージ付きでラップ）
    #[error("ストア操作に失敗しました: {operation} - {message}")]
    StoreFailed { operation: String, message: String },
}

impl ContentError {
    /// NotFoundエラーを作成
    pub fn not_found<W: Into<String>>(what: W) -> Self {
        Self::NotFound(what.into())
    }

    /// 検証エラーを作成
    pub fn validation_failed<F: Into<String>>(field: F) -> Self {
        Self::ValidationFailed {
            field: field.into(),
        }
    }

    /// アップロードエラーを作成
    pub fn upload_failed<M: Into<String>>(message: M) -> Self {
        Self::UploadFailed {
            message: message.into(),
        }
    }

    /// ストアエラーを作成（下位エラーは表示文字列として保持する）
    pub fn store_failed<O: Into<String>>(operation: O, source: impl std::fmt::Display) -> Self {
        Self::StoreFailed {
            operation: operation.into(),
            message: source.to_string(),
        }
    }
}

/// コンテンツエラーのResult型エイリアス
pub type ContentResult<T> = std::result::Result<T, ContentError>;
