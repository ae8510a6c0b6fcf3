use crate::domain::article::{Article, ArticleDraft};
use crate::domain::category::Category;
use crate::domain::store::{ArticleQuery, ContentStore};
use crate::types::{ContentError, ContentResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

// メモリ上の記事レコード（カテゴリ名は読み取り時に解決する）
#[derive(Debug, Clone)]
struct ArticleRecord {
    id: i32,
    title: String,
    author: String,
    category_id: i32,
    published_date: chrono::NaiveDate,
    content: String,
    published: bool,
    feature_image: Option<String>,
}

impl ArticleRecord {
    fn from_draft(id: i32, draft: &ArticleDraft) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            author: draft.author.clone(),
            category_id: draft.category_id,
            published_date: draft.published_date,
            content: draft.content.clone(),
            published: draft.published,
            feature_image: draft.feature_image.clone(),
        }
    }
}

/// メモリ上のContentStore実装
///
/// コンテンツアクセス層とルート層を実際のデータベースなしでテストする
/// ための注入用ストア。IDの採番はmax(id)+1の再計算ではなくアトミックな
/// カウンタで行い、並行した追加でも重複しない。
pub struct MemoryContentStore {
    categories: Mutex<Vec<Category>>,
    articles: Mutex<Vec<ArticleRecord>>,
    next_id: AtomicI32,
}

impl MemoryContentStore {
    /// 空のストアを作成
    pub fn new() -> Self {
        Self {
            categories: Mutex::new(Vec::new()),
            articles: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
        }
    }

    /// カテゴリを投入済みのストアを作成
    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            categories: Mutex::new(categories),
            articles: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
        }
    }

    fn lookup_category_name(categories: &[Category], category_id: i32) -> Option<String> {
        categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.clone())
    }

    /// レコードを読み取り表現へ変換する（カテゴリ未解決時はUnknown）
    fn to_article(categories: &[Category], record: &ArticleRecord) -> Article {
        Article {
            id: record.id,
            title: record.title.clone(),
            author: record.author.clone(),
            category_id: record.category_id,
            category_name: Self::lookup_category_name(categories, record.category_id)
                .unwrap_or_else(|| "Unknown".to_string()),
            published_date: record.published_date,
            content: record.content.clone(),
            published: record.published,
            feature_image: record.feature_image.clone(),
        }
    }

    fn lock_categories(&self) -> ContentResult<std::sync::MutexGuard<'_, Vec<Category>>> {
        self.categories
            .lock()
            .map_err(|e| ContentError::store_failed("カテゴリロックの取得", e))
    }

    fn lock_articles(&self) -> ContentResult<std::sync::MutexGuard<'_, Vec<ArticleRecord>>> {
        self.articles
            .lock()
            .map_err(|e| ContentError::store_failed("記事ロックの取得", e))
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn list_categories(&self) -> ContentResult<Vec<Category>> {
        Ok(self.lock_categories()?.clone())
    }

    async fn category_name(&self, id: i32) -> ContentResult<Option<String>> {
        Ok(Self::lookup_category_name(&self.lock_categories()?, id))
    }

    async fn search_published(&self, query: &ArticleQuery) -> ContentResult<Vec<Article>> {
        let categories = self.lock_categories()?.clone();
        let articles = self.lock_articles()?;

        let mut results: Vec<Article> = articles
            .iter()
            .filter(|record| record.published)
            // JOIN相当: カテゴリが解決できない記事は返さない
            .filter(|record| {
                Self::lookup_category_name(&categories, record.category_id).is_some()
            })
            .filter(|record| {
                query
                    .category_id
                    .map_or(true, |category_id| record.category_id == category_id)
            })
            .filter(|record| {
                query
                    .min_date
                    .map_or(true, |min_date| record.published_date >= min_date)
            })
            .filter(|record| {
                query.author_pattern.as_ref().map_or(true, |pattern| {
                    record
                        .author
                        .to_lowercase()
                        .contains(&pattern.to_lowercase())
                })
            })
            .map(|record| Self::to_article(&categories, record))
            .collect();

        // published_date降順（安定ソートで同日の投入順は保たれる）
        results.sort_by(|a, b| b.published_date.cmp(&a.published_date));

        Ok(results)
    }

    async fn find_article(&self, id: i32) -> ContentResult<Option<Article>> {
        let categories = self.lock_categories()?.clone();
        let articles = self.lock_articles()?;

        Ok(articles
            .iter()
            .find(|record| record.id == id)
            .map(|record| Self::to_article(&categories, record)))
    }

    async fn insert_article(&self, draft: &ArticleDraft) -> ContentResult<Article> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = ArticleRecord::from_draft(id, draft);

        let categories = self.lock_categories()?.clone();
        let article = Self::to_article(&categories, &record);

        self.lock_articles()?.push(record);
        Ok(article)
    }

    async fn update_article(
        &self,
        id: i32,
        draft: &ArticleDraft,
    ) -> ContentResult<Option<Article>> {
        let categories = self.lock_categories()?.clone();
        let mut articles = self.lock_articles()?;

        let Some(record) = articles.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };

        *record = ArticleRecord::from_draft(id, draft);
        Ok(Some(Self::to_article(&categories, record)))
    }

    async fn delete_article(&self, id: i32) -> ContentResult<Option<Article>> {
        let categories = self.lock_categories()?.clone();
        let mut articles = self.lock_articles()?;

        let Some(index) = articles.iter().position(|record| record.id == id) else {
            return Ok(None);
        };

        let removed = articles.remove(index);
        Ok(Some(Self::to_article(&categories, &removed)))
    }
}
