use anyhow::{Context, Result};
use burogu::app::server::{run_server, AppState};
use burogu::infra::api::media::ReqwestMediaUploader;
use burogu::infra::db::setup_database;
use burogu::infra::storage::db::PgContentStore;
use burogu::types::AppConfig;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 環境変数を読み込み（.envファイルがあれば使用）
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::from_env().context("設定の読み込みに失敗しました")?;

    // 接続プールの作成とマイグレーションの実行
    let pool = setup_database(&config.database_url)
        .await
        .context("データベースのセットアップに失敗しました")?;

    let state = AppState::new(
        Arc::new(PgContentStore::new(pool)),
        Arc::new(ReqwestMediaUploader::new(config.media.clone())),
    );

    run_server(state, config.port).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
