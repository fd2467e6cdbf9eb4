//! Resource clients: typed wrappers over [`RestSource`](admin_framework::RestSource)
//! that add each resource's custom actions and build its views.

pub mod article_client;
pub mod user_client;

pub use article_client::{ArticleClient, PublishedArticles};
pub use user_client::UserClient;
