use super::model::{Article, ArticleDraft, ArticleFilter};
use crate::domain::store::{ArticleQuery, ContentStore};
use crate::types::{ContentError, ContentResult};

/// 公開済み記事の一覧を取得する（published_date降順・カテゴリ名付き）。
/// 1件も存在しない場合はNotFoundを返す。
pub async fn list_published_articles(store: &dyn ContentStore) -> ContentResult<Vec<Article>> {
    let articles = store.search_published(&ArticleQuery::default()).await?;
    if articles.is_empty() {
        return Err(ContentError::not_found("公開済み記事"));
    }
    Ok(articles)
}

/// 絞り込み条件付きで公開済み記事を取得する。
///
/// category_id・min_date・authorはストアレベルで適用し、searchだけは
/// 取得後にメモリ上で適用する。並び順はストアで確定済みのpublished_date
/// 降順のままで、searchは絞り込むだけで並べ替えない。
/// 条件が全て空の場合は公開済み記事の全件と等価。
/// 1件もマッチしない場合はエラーではなく空リストを返す。
pub async fn get_filtered_articles(
    store: &dyn ContentStore,
    filter: &ArticleFilter,
) -> ContentResult<Vec<Article>> {
    let query = ArticleQuery {
        category_id: filter.category_id,
        min_date: filter.min_date,
        author_pattern: filter.author.clone(),
    };
    let mut articles = store.search_published(&query).await?;

    if let Some(ref needle) = filter.search {
        articles.retain(|article| article.matches_search(needle));
    }

    Ok(articles)
}

/// IDで公開済み記事を1件取得する。
/// レコードが存在しても未公開の場合はNotFoundを返す。
pub async fn get_article_by_id(store: &dyn ContentStore, id: i32) -> ContentResult<Article> {
    match store.find_article(id).await? {
        Some(article) if article.published => Ok(article),
        _ => Err(ContentError::not_found(format!("記事 id={id}"))),
    }
}

/// 編集用にIDで記事を1件取得する。
/// ID直接指定の経路なので未公開記事も返す。
pub async fn get_article_for_edit(store: &dyn ContentStore, id: i32) -> ContentResult<Article> {
    store
        .find_article(id)
        .await?
        .ok_or_else(|| ContentError::not_found(format!("記事 id={id}")))
}

/// 記事を新規登録し、採番済みのレコードを返す。
pub async fn add_article(store: &dyn ContentStore, draft: &ArticleDraft) -> ContentResult<Article> {
    store.insert_article(draft).await
}

/// 記事を全フィールド上書きで更新する。
/// IDが存在しない場合はNotFoundを返す。
pub async fn update_article(
    store: &dyn ContentStore,
    id: i32,
    draft: &ArticleDraft,
) -> ContentResult<Article> {
    store
        .update_article(id, draft)
        .await?
        .ok_or_else(|| ContentError::not_found(format!("記事 id={id}")))
}

/// 記事を削除し、削除したレコードを返す。
/// IDが存在しない場合はNotFoundを返す（ストアは変更されない）。
pub async fn delete_article(store: &dyn ContentStore, id: i32) -> ContentResult<Article> {
    store
        .delete_article(id)
        .await?
        .ok_or_else(|| ContentError::not_found(format!("記事 id={id}")))
}
