//! # Articles
//!
//! News articles under `/{api_url_path}/articles`. Titles are translatable
//! and the slug follows the title: [`article_hooks`] recomputes it right
//! before an article is created or saved.
//!
//! ## Usage
//!
//! ```rust
//! use admin_framework::controller::EditController;
//! use admin_framework::mock::MockSource;
//! use admin_sample::articles::article_hooks;
//! use admin_sample::model::Article;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockSource::new();
//!     let article = Article::new("Launch day", "...");
//!     mock.expect_get().return_ok(article.clone());
//!     mock.expect_update().return_ok(article);
//!
//!     let mut editor = EditController::new(mock.clone(), 1).with_hooks(article_hooks("en"));
//!     editor.initialize().await;
//!     if let Some(draft) = editor.model_mut() {
//!         draft.title.set("en", "Launch week");
//!     }
//!     editor.update().await;
//!
//!     assert_eq!(mock.updated_models()[0].slug, "launch-week");
//! }
//! ```

pub mod error;

pub use error::*;

use crate::model::Article;
use admin_framework::hooks::Hooks;

pub const ARTICLES_RESOURCE: &str = "articles";

/// Hooks that keep the slug in sync with the title in `locale`.
pub fn article_hooks(locale: &str) -> Hooks<Article> {
    let on_create = locale.to_string();
    let on_update = locale.to_string();
    Hooks::new()
        .before_create(move |article: &mut Article| article.refresh_slug(&on_create))
        .before_update(move |article: &mut Article| article.refresh_slug(&on_update))
}
