use admin_framework::text::slugify_translatable;
use admin_framework::translatable::TranslatableProperty;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

/// A news article with a title in several languages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: TranslatableProperty,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub status: ArticleStatus,
}

impl Article {
    /// New draft with an English title.
    pub fn new(title: &str, body: impl Into<String>) -> Self {
        let mut article = Self {
            body: body.into(),
            ..Self::default()
        };
        article.title.set("en", title);
        article.refresh_slug("en");
        article
    }

    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }

    /// Rebuilds the slug from the title in `locale`. Keeps the old slug if
    /// that translation is missing.
    pub fn refresh_slug(&mut self, locale: &str) {
        if let Some(slug) = slugify_translatable(&self.title, locale) {
            self.slug = slug;
        }
    }
}
