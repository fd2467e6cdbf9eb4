//! # API Client
//!
//! Typed access to the REST backend. Every request carries the standard
//! header set (`Content-Type`, `Accept`, `Accept-Language` and, while a
//! session token is stored, `Authorization: Bearer`). Enveloped responses are
//! unwrapped and their notifications surfaced; failures are reported through
//! the [`ErrorReporter`] and then returned.

use crate::api::errors::ErrorReporter;
use crate::config::Environment;
use crate::envelope::{unwrap_envelope, Envelope, ListPage, Unwrapped};
use crate::error::{ApiError, FieldErrors};
use crate::notification::NotificationSink;
use crate::session::SessionGuard;
use crate::text::filename;
use reqwest::header::{HeaderName, ACCEPT, ACCEPT_LANGUAGE, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// File name used when a download does not name its file.
pub const DEFAULT_ATTACHMENT_NAME: &str = "export";

const JSON: &str = "application/json";

/// A downloaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Writes the file into `dir`, ignoring any directory part of its name.
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let target = dir.as_ref().join(filename(&self.file_name));
        tokio::fs::write(&target, &self.bytes).await?;
        Ok(target)
    }
}

/// Extracts the quoted file name of a `content-disposition` header.
pub fn attachment_file_name(disposition: &str) -> String {
    match (disposition.find('"'), disposition.rfind('"')) {
        (Some(start), Some(end)) if end > start + 1 => disposition[start + 1..end].to_string(),
        _ => DEFAULT_ATTACHMENT_NAME.to_string(),
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: FieldErrors,
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<SessionGuard>,
    locale: watch::Receiver<String>,
    notifications: Arc<dyn NotificationSink>,
    errors: ErrorReporter,
}

impl ApiClient {
    pub fn new(
        env: &Environment,
        session: Arc<SessionGuard>,
        locale: watch::Receiver<String>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: env.api_url.trim_end_matches('/').to_string(),
            http,
            session,
            errors: ErrorReporter::new(Arc::clone(&notifications), env.show_notifications),
            locale,
            notifications,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionGuard> {
        &self.session
    }

    pub fn errors(&self) -> &ErrorReporter {
        &self.errors
    }

    pub fn current_locale(&self) -> String {
        self.locale.borrow().clone()
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| ApiError::InvalidPath(format!("{}: {}", joined, e)))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        let builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .header(ACCEPT_LANGUAGE, self.current_locale());
        Ok(match self.session.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Unwraps an envelope and surfaces its notifications.
    pub fn handle_response<T>(&self, envelope: Envelope<T>) -> Unwrapped<T> {
        unwrap_envelope(envelope, self.notifications.as_ref())
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let result = async {
            let response = check_status(builder.send().await?).await?;
            let bytes = response.bytes().await?;
            let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
            serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
        }
        .await;
        if let Err(e) = &result {
            warn!(error = %e, "API request failed");
            self.errors.report(e);
        }
        result
    }

    /// GET without envelope handling.
    #[instrument(skip(self, params))]
    pub async fn get_raw<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        debug!(?params, "GET");
        let builder = self.request(Method::GET, path)?.query(params);
        self.execute(builder).await
    }

    #[instrument(skip(self, params))]
    pub async fn get_one<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        let envelope: Envelope<T> = self.get_raw(path, params).await?;
        Ok(self.handle_response(envelope).data)
    }

    /// GET a page of items. The count is the envelope's pagination total (0 if absent).
    #[instrument(skip(self, params))]
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<ListPage<T>, ApiError> {
        let envelope: Envelope<Vec<T>> = self.get_raw(path, params).await?;
        let page: ListPage<T> = self.handle_response(envelope).into();
        debug!(items = page.data.len(), total = page.count, "List received");
        Ok(page)
    }

    #[instrument(skip(self, body))]
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path)?.json(body);
        let envelope: Envelope<T> = self.execute(builder).await?;
        Ok(self.handle_response(envelope).data)
    }

    #[instrument(skip(self, body))]
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::PUT, path)?.json(body);
        let envelope: Envelope<T> = self.execute(builder).await?;
        Ok(self.handle_response(envelope).data)
    }

    /// DELETE. An empty body or a `null` payload yields `None`.
    #[instrument(skip(self, params))]
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Option<T>, ApiError> {
        let builder = self.request(Method::DELETE, path)?.query(params);
        let envelope: Option<Envelope<Option<T>>> = self.execute(builder).await?;
        Ok(envelope.and_then(|e| self.handle_response(e).data))
    }

    /// Form-encoded POST returning a bare (non-enveloped) JSON body.
    ///
    /// Used for the OAuth endpoints, which authenticate the client with HTTP
    /// Basic credentials instead of a bearer token.
    #[instrument(skip(self, form, client_credentials))]
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
        client_credentials: (&str, &str),
    ) -> Result<T, ApiError> {
        let (client_id, client_secret) = client_credentials;
        let builder = self
            .http
            .post(self.url(path)?)
            .header(ACCEPT, JSON)
            .header(ACCEPT_LANGUAGE, self.current_locale())
            .basic_auth(client_id, Some(client_secret))
            .form(form);
        self.execute(builder).await
    }

    #[instrument(skip(self, params))]
    pub async fn get_blob(&self, path: &str, params: &[(String, String)]) -> Result<Attachment, ApiError> {
        let builder = self.request(Method::GET, path)?.query(params);
        self.download(builder).await
    }

    #[instrument(skip(self, body))]
    pub async fn post_for_blob<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Attachment, ApiError> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.download(builder).await
    }

    async fn download(&self, builder: RequestBuilder) -> Result<Attachment, ApiError> {
        let result = async {
            let response = check_status(builder.send().await?).await?;
            let header = |name: HeaderName| {
                response
                    .headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            let disposition = header(CONTENT_DISPOSITION).ok_or(ApiError::MissingAttachment)?;
            let content_type = header(CONTENT_TYPE);
            let bytes = response.bytes().await?.to_vec();
            Ok(Attachment {
                file_name: attachment_file_name(&disposition),
                content_type,
                bytes,
            })
        }
        .await;
        match &result {
            Ok(file) => info!(file_name = %file.file_name, size = file.bytes.len(), "File downloaded"),
            Err(ApiError::MissingAttachment) => {
                warn!("Download response has no content-disposition header");
                self.errors.common_error();
            }
            Err(e) => {
                warn!(error = %e, "Download failed");
                self.errors.report(e);
            }
        }
        result
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let field_errors = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.errors)
        .unwrap_or_default();
    Err(ApiError::Http {
        status,
        field_errors,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_file_name() {
        assert_eq!(
            attachment_file_name(r#"attachment; filename="report-2024.csv""#),
            "report-2024.csv"
        );
        assert_eq!(attachment_file_name("attachment"), DEFAULT_ATTACHMENT_NAME);
        assert_eq!(attachment_file_name(r#"attachment; filename="""#), DEFAULT_ATTACHMENT_NAME);
    }
}
