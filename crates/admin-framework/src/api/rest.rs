//! REST-backed sources: `GET {path}/{id}`, `POST {path}`, `PUT {path}/{id}`
//! and `GET {path}?page=..&size=..` for lists.

use crate::api::client::ApiClient;
use crate::envelope::ListPage;
use crate::error::SourceError;
use crate::query::PageQuery;
use crate::source::{ListSource, ResourceSource};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;

/// A resource collection addressed by a base path such as `/api/users`.
pub struct RestSource<M> {
    api: Arc<ApiClient>,
    path: String,
    _model: PhantomData<fn() -> M>,
}

impl<M> Clone for RestSource<M> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            path: self.path.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> Debug for RestSource<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestSource").field("path", &self.path).finish()
    }
}

impl<M> RestSource<M> {
    pub fn new(api: Arc<ApiClient>, path: impl Into<String>) -> Self {
        Self {
            api,
            path: path.into().trim_end_matches('/').to_string(),
            _model: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// `{path}/{id}`
    pub fn item_path(&self, id: impl fmt::Display) -> String {
        format!("{}/{}", self.path, id)
    }
}

#[async_trait]
impl<M> ResourceSource for RestSource<M>
where
    M: DeserializeOwned + Serialize + Clone + PartialEq + Debug + Send + Sync + 'static,
{
    type Id = u64;
    type Model = M;

    async fn get_model(&self, id: &u64) -> Result<M, SourceError> {
        Ok(self.api.get_one(&self.item_path(id), &[]).await?)
    }

    async fn create_model(&self, model: &M) -> Result<M, SourceError> {
        Ok(self.api.post(&self.path, model).await?)
    }

    async fn update_model(&self, id: &u64, model: &M) -> Result<M, SourceError> {
        Ok(self.api.put(&self.item_path(id), model).await?)
    }
}

#[async_trait]
impl<M> ListSource for RestSource<M>
where
    M: DeserializeOwned + Clone + Debug + Send + Sync + 'static,
{
    type Item = M;

    async fn get_list(&self, query: &PageQuery) -> Result<ListPage<M>, SourceError> {
        let params = query.to_params(&Method::GET);
        Ok(self.api.get_list(&self.path, &params).await?)
    }
}
