use crate::app::server::AppState;
use crate::domain::article::{self, Article, ArticleDraft, ArticleFilter};
use crate::domain::category;
use crate::types::{ContentError, ContentResult};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

/// ContentErrorをHTTPレスポンスへ変換する
/// NotFound→404 / ValidationFailed→400 / それ以外→500
fn error_response(err: &ContentError) -> Response {
    let status = match err {
        ContentError::NotFound(_) => StatusCode::NOT_FOUND,
        ContentError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        ContentError::UploadFailed { .. } | ContentError::StoreFailed { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("リクエスト処理に失敗: {err}");
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

/// GET / はaboutへリダイレクト
pub async fn root_handler() -> Redirect {
    Redirect::to("/about")
}

/// GET /home 静的ページ
pub async fn home_handler() -> Html<&'static str> {
    Html(include_str!("../../views/home.html"))
}

/// GET /about 静的ページ
pub async fn about_handler() -> Html<&'static str> {
    Html(include_str!("../../views/about.html"))
}

// /articles のクエリ文字列（minDateはフォーム側のフィールド名に合わせる）
#[derive(Debug, Default, Deserialize)]
pub struct ArticlesQuery {
    category_id: Option<String>,
    #[serde(rename = "minDate")]
    min_date: Option<String>,
    author: Option<String>,
    search: Option<String>,
}

impl ArticlesQuery {
    /// クエリ文字列をArticleFilterへ変換する
    /// 空文字や解釈できない値は未指定として扱う
    fn into_filter(self) -> ArticleFilter {
        ArticleFilter {
            category_id: self
                .category_id
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .and_then(|v| v.parse::<i32>().ok()),
            min_date: self
                .min_date
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .and_then(|v| v.parse::<NaiveDate>().ok()),
            author: self
                .author
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            search: self
                .search
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        }
    }
}

/// GET /articles 絞り込み付きの公開記事一覧
pub async fn articles_handler(
    State(state): State<AppState>,
    Query(query): Query<ArticlesQuery>,
) -> Response {
    let filter = query.into_filter();
    match article::get_filtered_articles(state.store.as_ref(), &filter).await {
        Ok(articles) => Json(articles).into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET /article/:id 公開記事を1件返す
pub async fn article_handler(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    match article::get_article_by_id(state.store.as_ref(), id).await {
        Ok(found) => Json(found).into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET /article/:id/edit 編集用ペイロード（未公開記事も対象）
pub async fn edit_article_handler(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    let found = match article::get_article_for_edit(state.store.as_ref(), id).await {
        Ok(found) => found,
        Err(err) => return error_response(&err),
    };
    // フォームのカテゴリ選択肢。空でも編集自体は成立させる
    let categories = category::list_categories(state.store.as_ref())
        .await
        .unwrap_or_default();

    Json(json!({ "article": found, "categories": categories })).into_response()
}

/// GET /categories カテゴリ一覧
pub async fn categories_handler(State(state): State<AppState>) -> Response {
    match category::list_categories(state.store.as_ref()).await {
        Ok(categories) => Json(categories).into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET /articles/add 追加フォーム用ペイロード（カテゴリ選択肢）
pub async fn add_article_form_handler(State(state): State<AppState>) -> Response {
    match category::list_categories(state.store.as_ref()).await {
        Ok(categories) => Json(json!({ "categories": categories })).into_response(),
        Err(err) => error_response(&err),
    }
}

/// POST /articles/add 記事を新規作成する
pub async fn add_article_handler(State(state): State<AppState>, multipart: Multipart) -> Response {
    match create_article(&state, multipart).await {
        Ok(created) => {
            info!("記事を作成しました: id={}", created.id);
            (StatusCode::CREATED, Json(created)).into_response()
        }
        Err(err) => error_response(&err),
    }
}

/// PUT /article/:id 記事を全フィールド上書きで更新する
pub async fn update_article_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Response {
    match apply_article_update(&state, id, multipart).await {
        Ok(updated) => Json(updated).into_response(),
        Err(err) => error_response(&err),
    }
}

/// DELETE /article/:id 記事を削除して一覧へリダイレクトする
pub async fn delete_article_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Response {
    match article::delete_article(state.store.as_ref(), id).await {
        Ok(removed) => {
            info!("記事を削除しました: id={}", removed.id);
            Redirect::to("/articles").into_response()
        }
        Err(err) => error_response(&err),
    }
}

// multipartフォームから取り出した生の値
#[derive(Debug, Default)]
struct ArticleForm {
    title: Option<String>,
    author: Option<String>,
    category_id: Option<String>,
    published_date: Option<String>,
    content: Option<String>,
    published: bool,
    feature_image_url: Option<String>,
    remove_feature_image: bool,
    upload: Option<(String, Vec<u8>)>,
}

/// multipartリクエストを読み切ってフォーム値へ展開する
async fn read_article_form(mut multipart: Multipart) -> ContentResult<ArticleForm> {
    let mut form = ArticleForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ContentError::validation_failed("multipart"))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "feature_image" => {
                let file_name = field.file_name().unwrap_or("feature_image").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ContentError::validation_failed("feature_image"))?;
                // ファイル未選択のフォームは空のパートを送ってくる
                if !data.is_empty() {
                    form.upload = Some((file_name, data.to_vec()));
                }
            }
            "title" => form.title = Some(read_text(field, "title").await?),
            "author" => form.author = Some(read_text(field, "author").await?),
            "category_id" => form.category_id = Some(read_text(field, "category_id").await?),
            "published_date" => {
                form.published_date = Some(read_text(field, "published_date").await?)
            }
            "content" => form.content = Some(read_text(field, "content").await?),
            // チェックボックスはパートが存在すればtrue
            "published" => {
                let _ = read_text(field, "published").await?;
                form.published = true;
            }
            "remove_feature_image" => {
                let _ = read_text(field, "remove_feature_image").await?;
                form.remove_feature_image = true;
            }
            "feature_image_url" => {
                form.feature_image_url = Some(read_text(field, "feature_image_url").await?)
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> ContentResult<String> {
    field
        .text()
        .await
        .map_err(|_| ContentError::validation_failed(name))
}

/// フォーム値から記事ドラフトを組み立てる（型変換と必須チェック）
fn build_draft(form: &ArticleForm) -> ContentResult<ArticleDraft> {
    let title = require_text(&form.title, "title")?;
    let author = require_text(&form.author, "author")?;
    let content = require_text(&form.content, "content")?;

    // category_idは整数へ変換する
    let category_id = form
        .category_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ContentError::validation_failed("category_id"))?
        .parse::<i32>()
        .map_err(|_| ContentError::validation_failed("category_id"))?;

    // published_dateは省略時に当日扱い
    let published_date = match form
        .published_date
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        Some(raw) => raw
            .parse::<NaiveDate>()
            .map_err(|_| ContentError::validation_failed("published_date"))?,
        None => Utc::now().date_naive(),
    };

    Ok(ArticleDraft {
        title,
        author,
        category_id,
        published_date,
        content,
        published: form.published,
        feature_image: None,
    })
}

fn require_text(value: &Option<String>, field: &str) -> ContentResult<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or_else(|| ContentError::validation_failed(field))
}

/// 作成フロー: 検証→画像アップロード→レコード書き込み
///
/// アップロードが成功（または未添付でスキップ）した後にのみレコードを
/// 書き込む。アップロード失敗時は何も永続化しない。
async fn create_article(state: &AppState, multipart: Multipart) -> ContentResult<Article> {
    let form = read_article_form(multipart).await?;
    let mut draft = build_draft(&form)?;

    if let Some((file_name, bytes)) = form.upload {
        let url = state.uploader.upload(&file_name, bytes).await?;
        draft.feature_image = Some(url);
    }

    article::add_article(state.store.as_ref(), &draft).await
}

/// 更新フロー: 画像は「新規アップロード > removeフラグ > 既存値」で決める
async fn apply_article_update(
    state: &AppState,
    id: i32,
    multipart: Multipart,
) -> ContentResult<Article> {
    let form = read_article_form(multipart).await?;
    let mut draft = build_draft(&form)?;

    draft.feature_image = if let Some((file_name, bytes)) = form.upload {
        Some(state.uploader.upload(&file_name, bytes).await?)
    } else if form.remove_feature_image {
        None
    } else {
        form.feature_image_url
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    };

    article::update_article(state.store.as_ref(), id, &draft).await
}
