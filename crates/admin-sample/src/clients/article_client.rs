//! # Article Client
//!
//! Typed access to the article collection. Wraps a [`RestSource<Article>`]
//! for the plain reads and writes and adds the article-specific actions:
//! publishing and CSV export.

use crate::articles::{article_hooks, ArticleError, ARTICLES_RESOURCE};
use crate::model::{Article, ArticleStatus};
use admin_framework::api::{ApiClient, Attachment, RestSource};
use admin_framework::controller::{CreateController, EditController, ListController};
use admin_framework::envelope::ListPage;
use admin_framework::query::{KeyValues, PageQuery};
use admin_framework::sortable::Filter;
use admin_framework::{ListSource, ResourceSource, SourceError};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Debug, Serialize)]
struct ExportRequest {
    filter: std::collections::BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct ArticleClient {
    source: RestSource<Article>,
}

impl ArticleClient {
    pub fn new(api: Arc<ApiClient>, api_url_path: &str) -> Self {
        let path = format!("/{}/{}", api_url_path, ARTICLES_RESOURCE);
        Self {
            source: RestSource::new(api, path),
        }
    }

    pub fn source(&self) -> RestSource<Article> {
        self.source.clone()
    }

    /// Paged list view over all articles.
    pub fn list_view(&self) -> ListController<RestSource<Article>> {
        ListController::new(self.source())
    }

    /// List view that never shows drafts, whatever filters the user sets.
    pub fn published_view(&self) -> ListController<PublishedArticles> {
        ListController::new(PublishedArticles {
            inner: self.source(),
        })
    }

    /// Edit view for one article. The slug follows the title in `locale`.
    pub fn edit_view(&self, id: u64, locale: &str) -> EditController<RestSource<Article>> {
        EditController::new(self.source(), id).with_hooks(article_hooks(locale))
    }

    pub fn create_view(&self, locale: &str) -> CreateController<RestSource<Article>> {
        CreateController::new(self.source(), Article::default()).with_hooks(article_hooks(locale))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: u64) -> Result<Article, ArticleError> {
        self.source
            .get_model(&id)
            .await
            .map_err(|e| ArticleError::for_id(id, e))
    }

    #[instrument(skip(self, article), fields(slug = %article.slug))]
    pub async fn create(&self, article: &Article) -> Result<Article, ArticleError> {
        let created = self.source.create_model(article).await?;
        info!(id = created.id, "Article created");
        Ok(created)
    }

    /// Puts a draft live.
    #[instrument(skip(self, article), fields(id = article.id))]
    pub async fn publish(&self, article: &Article) -> Result<Article, ArticleError> {
        if article.status == ArticleStatus::Published {
            return Err(ArticleError::AlreadyPublished(article.id));
        }
        debug!("Publishing article");
        let path = format!("{}/publish", self.source.item_path(article.id));
        let published: Article = self.source.api().post(&path, &()).await?;
        info!(status = ?published.status, "Article published");
        Ok(published)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<(), ArticleError> {
        self.source
            .api()
            .delete::<Article>(&self.source.item_path(id), &[])
            .await?;
        info!("Article deleted");
        Ok(())
    }

    /// Downloads the articles matching `filters` as a file.
    #[instrument(skip(self, filters), fields(filters = filters.len()))]
    pub async fn export(&self, filters: &[Filter]) -> Result<Attachment, ArticleError> {
        let filter: KeyValues = filters
            .iter()
            .map(|f| (f.key.as_str(), f.value.as_str()))
            .collect();
        let request = ExportRequest {
            filter: filter.into_pairs().into_iter().collect(),
        };
        let path = format!("{}/export", self.source.path());
        Ok(self.source.api().post_for_blob(&path, &request).await?)
    }
}

/// Article list source that pins the `status` filter to `published`.
#[derive(Clone, Debug)]
pub struct PublishedArticles {
    inner: RestSource<Article>,
}

#[async_trait]
impl ListSource for PublishedArticles {
    type Item = Article;

    async fn get_list(&self, query: &PageQuery) -> Result<ListPage<Article>, SourceError> {
        let mut query = query.clone();
        query
            .filter
            .get_or_insert_with(KeyValues::new)
            .insert("status", "published");
        self.inner.get_list(&query).await
    }
}
