use crate::domain::store::ContentStore;
use crate::types::{ContentError, ContentResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// カテゴリエンティティ（テーブル定義と一致）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// カテゴリ一覧を取得する。
/// 1件も存在しない場合はNotFoundを返す。
pub async fn list_categories(store: &dyn ContentStore) -> ContentResult<Vec<Category>> {
    let categories = store.list_categories().await?;
    if categories.is_empty() {
        return Err(ContentError::not_found("カテゴリ"));
    }
    Ok(categories)
}

/// カテゴリ名をIDから解決する。
/// 見つからない場合は失敗させず "Unknown" を返す（非正規化時の防御用）。
pub async fn get_category_name_by_id(store: &dyn ContentStore, id: i32) -> ContentResult<String> {
    let name = store.category_name(id).await?;
    Ok(name.unwrap_or_else(|| "Unknown".to_string()))
}
