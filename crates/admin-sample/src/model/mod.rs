//! Resource models as the backend serializes them.

pub mod article;
pub mod user;

pub use article::{Article, ArticleStatus};
pub use user::User;
