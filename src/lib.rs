//! burogu - ブログコンテンツプラットフォーム
//!
//! HTTPサーバーがリレーショナルストア上のCRUD操作を公開し、
//! 画像アップロードを外部メディアホストへ中継する。

pub mod app;
pub mod domain;
pub mod infra;
pub mod types;
