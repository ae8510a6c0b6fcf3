use crate::app::handlers;
use crate::domain::store::ContentStore;
use crate::infra::api::media::MediaUploader;
use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// ルート層で共有するアプリケーション状態
///
/// ストアとメディアアップローダはトレイトオブジェクトとして注入し、
/// テストではメモリストア＋モックアップローダへ差し替える。
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub uploader: Arc<dyn MediaUploader>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, uploader: Arc<dyn MediaUploader>) -> Self {
        Self { store, uploader }
    }
}

/// ルーティングを組み立てる
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/home", get(handlers::home_handler))
        .route("/about", get(handlers::about_handler))
        .route("/articles", get(handlers::articles_handler))
        .route(
            "/articles/add",
            get(handlers::add_article_form_handler).post(handlers::add_article_handler),
        )
        .route(
            "/article/:id",
            get(handlers::article_handler)
                .put(handlers::update_article_handler)
                .delete(handlers::delete_article_handler),
        )
        .route("/article/:id/edit", get(handlers::edit_article_handler))
        .route("/categories", get(handlers::categories_handler))
        .with_state(state)
}

/// サーバを起動し、シャットダウンシグナルまで要求を処理する
pub async fn run_server(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("ポート{port}のバインドに失敗しました"))?;
    info!("server listening on http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("サーバの実行に失敗しました")
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("SIGTERMの登録に失敗");
        let mut sigint = signal(SignalKind::interrupt()).expect("SIGINTの登録に失敗");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
