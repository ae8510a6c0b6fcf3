pub mod model;
pub mod service;

pub use model::{Article, ArticleDraft, ArticleFilter};
pub use service::{
    add_article, delete_article, get_article_by_id, get_article_for_edit, get_filtered_articles,
    list_published_articles, update_article,
};
