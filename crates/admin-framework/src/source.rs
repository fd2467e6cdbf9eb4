//! # Resource Sources
//!
//! Controllers never talk to the network themselves. They are handed a
//! *source*: an implementation of [`ResourceSource`] (single models) or
//! [`ListSource`] (paged lists) that knows how to fetch, create and update.
//!
//! Writing the loading/error/dirty-check lifecycle once against these traits
//! is what lets one controller serve every resource type. A source only has
//! to implement the operations its views use; the rest default to
//! [`SourceError::Unsupported`].

use crate::envelope::ListPage;
use crate::error::SourceError;
use crate::query::PageQuery;
use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// Fetch/create/update operations for one resource type.
#[async_trait]
pub trait ResourceSource: Send + Sync + 'static {
    /// Identifier used to address a single model.
    type Id: Clone + Send + Sync + Display + Debug;

    /// The model. `PartialEq` drives the dirty check against the loaded baseline.
    type Model: Clone + PartialEq + Send + Sync + Debug + 'static;

    async fn get_model(&self, id: &Self::Id) -> Result<Self::Model, SourceError>;

    async fn create_model(&self, _model: &Self::Model) -> Result<Self::Model, SourceError> {
        Err(SourceError::Unsupported("create"))
    }

    async fn update_model(
        &self,
        _id: &Self::Id,
        _model: &Self::Model,
    ) -> Result<Self::Model, SourceError> {
        Err(SourceError::Unsupported("update"))
    }
}

/// Paged list retrieval for one resource type.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + Debug + 'static;

    async fn get_list(&self, query: &PageQuery) -> Result<ListPage<Self::Item>, SourceError>;
}
