//! # Admin Sample
//!
//! Demo run against a live backend:
//!
//! 1. Load `environment.json` (`--prod` for `environment.prod.json`) from the
//!    working directory.
//! 2. Restore the session from `admin-cookies.json`, or sign in with
//!    `ADMIN_USERNAME` / `ADMIN_PASSWORD`.
//! 3. List the published articles and retitle the first one.
//!
//! ```bash
//! RUST_LOG=info ADMIN_USERNAME=admin@example.com ADMIN_PASSWORD=secret cargo run -p admin-sample
//! ```

use admin_framework::session::FileCookieStore;
use admin_framework::sortable::{Filter, SortDirection};
use admin_framework::telemetry::setup_tracing;
use admin_framework::Environment;
use admin_sample::lifecycle::AdminSystem;
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};

const COOKIE_FILE: &str = "admin-cookies.json";

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let production = std::env::args().any(|arg| arg == "--prod");
    let env = Environment::load(".", production).map_err(|e| e.to_string())?;
    let store = FileCookieStore::open(COOKIE_FILE).map_err(|e| e.to_string())?;
    let system = AdminSystem::new(env, Arc::new(store)).map_err(|e| e.to_string())?;

    let mut signed_in = system.start().await;
    if !signed_in {
        if let (Ok(username), Ok(password)) = (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            signed_in = system
                .auth
                .obtain_access_token(&username, &password)
                .await
                .map_err(|e| e.to_string())?;
        }
    }
    if !signed_in {
        warn!("Not signed in; set ADMIN_USERNAME and ADMIN_PASSWORD");
        return system.shutdown().await;
    }
    if let Some(user) = system.auth.current_user() {
        info!(user = %user.display_name(), "Signed in");
    }

    let mut list = system.articles.published_view();
    let span = tracing::info_span!("article_list");
    async {
        list.add_or_update_filter_no_refresh(Filter::new("author", "me"));
        list.set_single_order("created_at", SortDirection::Desc).await;
    }
    .instrument(span)
    .await;
    info!(total = list.paginator().total_items, shown = list.list().len(), "Articles listed");

    let locale = system.languages.current_lang();
    if let Some(first) = list.list().first() {
        let mut editor = system.articles.edit_view(first.id, &locale);
        editor.initialize().await;
        if let Some(article) = editor.model_mut() {
            article.title.set(&locale, "Frissített cím");
        }
        editor.update().await;
        match editor.error_kind() {
            None => info!(slug = ?editor.model().map(|a| a.slug.clone()), "Article saved"),
            Some(kind) => error!(%kind, "Article not saved"),
        }
        system.core_events.refresh_list_view();
    }

    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}
