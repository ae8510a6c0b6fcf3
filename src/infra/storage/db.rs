use crate::domain::article::{Article, ArticleDraft};
use crate::domain::category::Category;
use crate::domain::store::{ArticleQuery, ContentStore};
use crate::types::{ContentError, ContentResult};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQLを使用した本番用のContentStore実装
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    /// 接続プールからストアを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 書き込み結果の非正規化用にカテゴリ名を防御的に解決する
    async fn resolve_category_name(&self, category_id: i32) -> ContentResult<String> {
        let name = self.category_name(category_id).await?;
        Ok(name.unwrap_or_else(|| "Unknown".to_string()))
    }

    /// ドラフトと採番済みIDから読み取り表現を組み立てる
    async fn article_from_draft(&self, id: i32, draft: &ArticleDraft) -> ContentResult<Article> {
        Ok(Article {
            id,
            title: draft.title.clone(),
            author: draft.author.clone(),
            category_id: draft.category_id,
            category_name: self.resolve_category_name(draft.category_id).await?,
            published_date: draft.published_date,
            content: draft.content.clone(),
            published: draft.published,
            feature_image: draft.feature_image.clone(),
        })
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn list_categories(&self) -> ContentResult<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ContentError::store_failed("カテゴリ一覧の取得", e))
    }

    async fn category_name(&self, id: i32) -> ContentResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ContentError::store_failed("カテゴリ名の取得", e))
    }

    async fn search_published(&self, query: &ArticleQuery) -> ContentResult<Vec<Article>> {
        // QueryBuilderベースで動的にクエリを構築
        // カテゴリ名の非正規化はINNER JOINで行う（解決できない記事は返さない）
        let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            r#"
            SELECT
                a.id,
                a.title,
                a.author,
                a.category_id,
                c.name AS category_name,
                a.published_date,
                a.content,
                a.published,
                a.feature_image
            FROM articles a
            INNER JOIN categories c ON a.category_id = c.id
            WHERE a.published = TRUE
            "#,
        );

        if let Some(category_id) = query.category_id {
            qb.push(" AND a.category_id = ").push_bind(category_id);
        }
        if let Some(min_date) = query.min_date {
            qb.push(" AND a.published_date >= ").push_bind(min_date);
        }
        if let Some(ref author_pattern) = query.author_pattern {
            let pattern = format!("%{}%", author_pattern);
            qb.push(" AND a.author ILIKE ").push_bind(pattern);
        }

        qb.push(" ORDER BY a.published_date DESC");

        qb.build_query_as::<Article>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ContentError::store_failed("公開記事の検索", e))
    }

    async fn find_article(&self, id: i32) -> ContentResult<Option<Article>> {
        // ID直接指定の経路は公開状態を問わない
        sqlx::query_as::<_, Article>(
            r#"
            SELECT
                a.id,
                a.title,
                a.author,
                a.category_id,
                COALESCE(c.name, 'Unknown') AS category_name,
                a.published_date,
                a.content,
                a.published,
                a.feature_image
            FROM articles a
            LEFT JOIN categories c ON a.category_id = c.id
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ContentError::store_failed("記事の取得", e))
    }

    async fn insert_article(&self, draft: &ArticleDraft) -> ContentResult<Article> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO articles
                (title, author, category_id, published_date, content, published, feature_image)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(draft.category_id)
        .bind(draft.published_date)
        .bind(&draft.content)
        .bind(draft.published)
        .bind(&draft.feature_image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ContentError::store_failed("記事の登録", e))?;

        self.article_from_draft(id, draft).await
    }

    async fn update_article(
        &self,
        id: i32,
        draft: &ArticleDraft,
    ) -> ContentResult<Option<Article>> {
        let result = sqlx::query(
            r#"
            UPDATE articles SET
                title = $1,
                author = $2,
                category_id = $3,
                published_date = $4,
                content = $5,
                published = $6,
                feature_image = $7
            WHERE id = $8
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(draft.category_id)
        .bind(draft.published_date)
        .bind(&draft.content)
        .bind(draft.published)
        .bind(&draft.feature_image)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| ContentError::store_failed("記事の更新", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(self.article_from_draft(id, draft).await?))
    }

    async fn delete_article(&self, id: i32) -> ContentResult<Option<Article>> {
        // 削除済みレコードを返す契約のため、先に読み取ってから消す
        let Some(article) = self.find_article(id).await? else {
            return Ok(None);
        };

        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ContentError::store_failed("記事の削除", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(article))
    }
}

// Postgres接続を必要とするテスト（--features db で実行）
#[cfg(all(test, feature = "db"))]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[sqlx::test(fixtures("../../../fixtures/content_filter.sql"))]
    async fn test_search_published_filters(pool: PgPool) -> Result<(), anyhow::Error> {
        let store = PgContentStore::new(pool);

        // 条件なし: 公開記事のみ・降順
        let all = store.search_published(&ArticleQuery::default()).await?;
        assert_eq!(all.len(), 2, "公開記事は2件のはず");
        assert!(all[0].published_date >= all[1].published_date);
        assert!(all.iter().all(|a| a.published));

        // カテゴリ完全一致
        let query = ArticleQuery {
            category_id: Some(1),
            ..Default::default()
        };
        let tech = store.search_published(&query).await?;
        assert_eq!(tech.len(), 1);
        assert_eq!(tech[0].category_name, "Tech");

        // 日付下限は境界を含む
        let query = ArticleQuery {
            min_date: Some(date(2025, 2, 10)),
            ..Default::default()
        };
        let recent = store.search_published(&query).await?;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].published_date, date(2025, 2, 10));

        // 著者はILIKEの部分一致
        let query = ArticleQuery {
            author_pattern: Some("jan".to_string()),
            ..Default::default()
        };
        let by_author = store.search_published(&query).await?;
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].author, "Jane Doe");

        println!("✅ Postgresクエリフィルターテスト成功");
        Ok(())
    }

    #[sqlx::test(fixtures("../../../fixtures/content_filter.sql"))]
    async fn test_find_article_ignores_published_flag(pool: PgPool) -> Result<(), anyhow::Error> {
        let store = PgContentStore::new(pool);

        // id=3は未公開だがID直接指定では取得できる
        let unpublished = store.find_article(3).await?;
        assert!(unpublished.is_some());
        assert!(!unpublished.unwrap().published);

        let missing = store.find_article(999).await?;
        assert!(missing.is_none());

        Ok(())
    }

    #[sqlx::test(fixtures("../../../fixtures/content_filter.sql"))]
    async fn test_insert_update_delete_cycle(pool: PgPool) -> Result<(), anyhow::Error> {
        let store = PgContentStore::new(pool);

        let draft = ArticleDraft {
            title: "Test Article".to_string(),
            author: "Tester".to_string(),
            category_id: 1,
            published_date: date(2025, 7, 2),
            content: "This is a test article".to_string(),
            published: true,
            feature_image: None,
        };

        // 登録: 採番済みIDとカテゴリ名が返る
        let added = store.insert_article(&draft).await?;
        assert!(added.id > 3, "シーケンスから採番されるべき");
        assert_eq!(added.category_name, "Tech");

        // 更新: 全フィールド上書き
        let mut revised = draft.clone();
        revised.title = "Test Article (改訂)".to_string();
        revised.category_id = 2;
        let updated = store.update_article(added.id, &revised).await?.unwrap();
        assert_eq!(updated.title, "Test Article (改訂)");
        assert_eq!(updated.category_name, "Life");

        // 削除: 削除済みレコードが返り、再取得できない
        let removed = store.delete_article(added.id).await?.unwrap();
        assert_eq!(removed.id, added.id);
        assert!(store.find_article(added.id).await?.is_none());

        // 存在しないIDの更新・削除はNone
        assert!(store.update_article(999, &draft).await?.is_none());
        assert!(store.delete_article(999).await?.is_none());

        println!("✅ Postgres CRUDサイクルテスト成功");
        Ok(())
    }
}
