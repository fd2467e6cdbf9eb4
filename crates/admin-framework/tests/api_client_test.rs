use admin_framework::api::ApiClient;
use admin_framework::config::Environment;
use admin_framework::envelope::ListPage;
use admin_framework::error::ApiError;
use admin_framework::mock::RecordingSink;
use admin_framework::notification::NotificationKind;
use admin_framework::session::{MemoryCookieStore, SessionConfig, SessionGuard, TokenResponse};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
struct Tag {
    id: u64,
    name: String,
}

struct Harness {
    server: MockServer,
    api: ApiClient,
    session: Arc<SessionGuard>,
    sink: Arc<RecordingSink>,
}

async fn harness() -> Harness {
    let server = MockServer::start().await;
    let env = Environment {
        api_url: server.uri(),
        ..Environment::default()
    };
    let session = Arc::new(SessionGuard::new(
        Arc::new(MemoryCookieStore::new()),
        SessionConfig::default(),
    ));
    let (_locale_tx, locale) = watch::channel("en".to_string());
    let sink = Arc::new(RecordingSink::new());
    let api = ApiClient::new(&env, session.clone(), locale, sink.clone()).unwrap();
    Harness {
        server,
        api,
        session,
        sink,
    }
}

#[tokio::test]
async fn test_get_one_sends_standard_headers_and_unwraps() {
    let h = harness().await;
    h.session
        .store(&TokenResponse {
            access_token: "tok".to_string(),
            refresh_token: "ref".to_string(),
            expires_in: 3600,
            token_type: None,
        })
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/tags/1"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(header("accept-language", "en"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 1, "name": "rust"},
            "meta": {"notifications": [{"title": "Hi", "message": "Loaded", "status": "success"}]}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let tag: Tag = h.api.get_one("/api/tags/1", &[]).await.unwrap();

    assert_eq!(tag, Tag { id: 1, name: "rust".to_string() });
    let shown = h.sink.notifications();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].kind, NotificationKind::Success);
}

#[tokio::test]
async fn test_get_list_uses_pagination_total() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .and(query_param("page", "2"))
        .and(query_param("filter[status]", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 11, "name": "a"}, {"id": 12, "name": "b"}],
            "meta": {"pagination": {"total": 42, "count": 2, "current_page": 2}}
        })))
        .mount(&h.server)
        .await;

    let params = vec![
        ("page".to_string(), "2".to_string()),
        ("filter[status]".to_string(), "active".to_string()),
    ];
    let page: ListPage<Tag> = h.api.get_list("/api/tags", &params).await.unwrap();

    assert_eq!(page.count, 42);
    assert_eq!(page.data.len(), 2);
}

#[tokio::test]
async fn test_list_without_pagination_counts_zero() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&h.server)
        .await;

    let page: ListPage<Tag> = h.api.get_list("/api/tags", &[]).await.unwrap();
    assert_eq!(page, ListPage::new(vec![], 0));
}

#[tokio::test]
async fn test_validation_errors_are_reported_per_field() {
    let h = harness().await;
    Mock::given(method("PUT"))
        .and(path("/api/tags/1"))
        .and(body_json(json!({"id": 1, "name": ""})))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": {"name": ["is required", "is too short"]}
        })))
        .mount(&h.server)
        .await;

    let body = Tag { id: 1, name: String::new() };
    let err = h.api.put::<Tag, _>("/api/tags/1", &body).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(err.field_errors().map(|f| f.len()), Some(1));
    let shown = h.sink.notifications();
    assert_eq!(shown.len(), 1);
    assert_eq!((shown[0].title.as_str(), shown[0].message.as_str()), ("name", "is required"));
    assert_eq!(shown[0].kind, NotificationKind::Error);
}

#[tokio::test]
async fn test_not_found_maps_to_status_message() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/tags/9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.server)
        .await;

    let err = h.api.get_one::<Tag>("/api/tags/9", &[]).await.unwrap_err();

    assert!(matches!(err, ApiError::Http { .. }));
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(h.sink.notifications()[0].title, "404");
}

#[tokio::test]
async fn test_delete_with_empty_body_returns_none() {
    let h = harness().await;
    Mock::given(method("DELETE"))
        .and(path("/api/tags/3"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&h.server)
        .await;

    let deleted: Option<Tag> = h.api.delete("/api/tags/3", &[]).await.unwrap();
    assert_eq!(deleted, None);
}

#[tokio::test]
async fn test_blob_download_and_save() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/api/tags/export"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", r#"attachment; filename="tags.csv""#)
                .set_body_raw("id,name\n1,rust\n", "text/csv"),
        )
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tags/raw"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("raw", "text/plain"))
        .mount(&h.server)
        .await;

    let file = h.api.post_for_blob("/api/tags/export", &json!({})).await.unwrap();
    assert_eq!(file.file_name, "tags.csv");
    assert_eq!(file.content_type.as_deref(), Some("text/csv"));

    let dir = tempfile::tempdir().unwrap();
    let saved = file.save_to(dir.path()).await.unwrap();
    assert_eq!(std::fs::read_to_string(saved).unwrap(), "id,name\n1,rust\n");

    let err = h.api.get_blob("/api/tags/raw", &[]).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingAttachment));
    assert_eq!(h.sink.notifications().len(), 1);
}
