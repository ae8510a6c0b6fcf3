use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// 記事エンティティ（カテゴリ名を非正規化した読み取り表現）
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub category_id: i32,
    pub category_name: String,
    pub published_date: NaiveDate,
    pub content: String,
    pub published: bool,
    pub feature_image: Option<String>,
}

/// 記事の書き込み表現（全ての可変フィールドを保持する）
///
/// HTTP境界で型変換を済ませてから構築する:
/// - category_idは整数へ変換
/// - publishedはチェックボックスの有無からboolへ変換（既定はfalse）
/// - feature_imageの既定はNone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub author: String,
    pub category_id: i32,
    pub published_date: NaiveDate,
    pub content: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub feature_image: Option<String>,
}

// 公開記事の絞り込み条件（全て省略可能・AND結合）
#[derive(Debug, Default, Clone)]
pub struct ArticleFilter {
    pub category_id: Option<i32>,
    pub min_date: Option<NaiveDate>,
    pub author: Option<String>,
    pub search: Option<String>,
}

impl Article {
    /// 自由文検索にマッチするか判定する
    /// タイトルまたは本文に対する、大文字小文字を区別しない部分一致
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
    }
}
