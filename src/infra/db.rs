use crate::types::{ContentError, ContentResult};
use sqlx::PgPool;

/// データベース接続プールを作成
/// 接続文字列は設定層で解決済みの値を受け取る
pub async fn create_pool(database_url: &str) -> ContentResult<PgPool> {
    PgPool::connect(database_url)
        .await
        .map_err(|e| ContentError::store_failed("データベース接続", e))
}

/// データベースの初期化（マイグレーション実行）
pub async fn initialize_database(pool: &PgPool) -> ContentResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| ContentError::store_failed("データベースマイグレーション実行", e))
}

/// プールの作成とデータベース初期化を一括で行う便利関数
pub async fn setup_database(database_url: &str) -> ContentResult<PgPool> {
    let pool = create_pool(database_url).await?;
    initialize_database(&pool).await?;
    Ok(pool)
}
