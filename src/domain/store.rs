use crate::domain::article::{Article, ArticleDraft};
use crate::domain::category::Category;
use crate::types::ContentResult;
use async_trait::async_trait;
use chrono::NaiveDate;

/// 記事のストアレベル絞り込み条件を表す構造体
///
/// 自由文検索（search）はストアへ押し込まず取得後にメモリ上で適用する
/// ため、ここには含めない。
#[derive(Debug, Default, Clone)]
pub struct ArticleQuery {
    /// カテゴリIDの完全一致
    pub category_id: Option<i32>,
    /// published_date >= min_date の日付下限
    pub min_date: Option<NaiveDate>,
    /// 著者名の部分一致（大文字小文字を区別しない）
    pub author_pattern: Option<String>,
}

impl ArticleQuery {
    /// 絞り込み条件が1つも指定されていないか判定する
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.min_date.is_none() && self.author_pattern.is_none()
    }
}

/// レコードストアの抽象化トレイト
///
/// コンテンツアクセス層を実際のデータベースなしでテストできるように
/// するためのインターフェース。本番ではPgContentStore、テストでは
/// MemoryContentStoreを注入する。
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// 全カテゴリを取得する
    async fn list_categories(&self) -> ContentResult<Vec<Category>>;

    /// カテゴリ名を解決する。存在しない場合はNone
    async fn category_name(&self, id: i32) -> ContentResult<Option<String>>;

    /// 公開済み記事をカテゴリ名付きで検索する（published_date降順）
    ///
    /// カテゴリとのJOINに基づく読み取りのため、category_idが解決できない
    /// 記事は結果に含まれない。
    async fn search_published(&self, query: &ArticleQuery) -> ContentResult<Vec<Article>>;

    /// IDで記事を1件取得する（公開状態を問わない、ID直接指定の経路用）
    async fn find_article(&self, id: i32) -> ContentResult<Option<Article>>;

    /// 記事を新規登録し、採番済みのレコードを返す
    async fn insert_article(&self, draft: &ArticleDraft) -> ContentResult<Article>;

    /// 記事を全フィールド上書きで更新する。IDが存在しない場合はNone
    async fn update_article(&self, id: i32, draft: &ArticleDraft)
        -> ContentResult<Option<Article>>;

    /// 記事を削除し、削除したレコードを返す。IDが存在しない場合はNone
    async fn delete_article(&self, id: i32) -> ContentResult<Option<Article>>;
}
