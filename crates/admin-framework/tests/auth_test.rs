use admin_framework::api::ApiClient;
use admin_framework::auth::{AuthGuard, AuthService, SessionRefresher};
use admin_framework::config::Environment;
use admin_framework::mock::RecordingSink;
use admin_framework::permission::PermissionService;
use admin_framework::session::{MemoryCookieStore, SessionConfig, SessionGuard, TokenResponse};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("admin:secret")
const BASIC_CREDENTIALS: &str = "Basic YWRtaW46c2VjcmV0";

async fn setup() -> (MockServer, Arc<AuthService>) {
    let server = MockServer::start().await;
    let env = Environment {
        api_url: server.uri(),
        client_id: "admin".to_string(),
        client_secret: "secret".to_string(),
        ..Environment::default()
    };
    let session = Arc::new(SessionGuard::new(
        Arc::new(MemoryCookieStore::new()),
        SessionConfig::default(),
    ));
    let (_tx, locale) = watch::channel("hu".to_string());
    let api = Arc::new(
        ApiClient::new(&env, session, locale, Arc::new(RecordingSink::new())).unwrap(),
    );
    (server, Arc::new(AuthService::new(api, &env)))
}

fn token_body(access: &str, expires_in: u64) -> serde_json::Value {
    json!({
        "access_token": access,
        "refresh_token": format!("{}-refresh", access),
        "expires_in": expires_in,
        "token_type": "Bearer"
    })
}

async fn mount_me(server: &MockServer, bearer: &str) {
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", format!("Bearer {}", bearer).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": 1,
                "email": "ada@example.com",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "permissions": [{"id": 3, "name": "users.edit", "type": "menu"}]
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_password_grant_signs_in() {
    let (server, auth) = setup().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("authorization", BASIC_CREDENTIALS))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=ada%40example.com"))
        .and(body_string_contains("client_id=admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("first", 3600)))
        .expect(1)
        .mount(&server)
        .await;
    mount_me(&server, "first").await;

    let permissions = PermissionService::new(auth.subscribe_user());
    let guard = AuthGuard::new(&auth);
    assert!(!guard.can_activate());

    let signed_in = auth.obtain_access_token("ada@example.com", "pw").await.unwrap();

    assert!(signed_in);
    assert!(auth.is_authenticated());
    assert!(guard.can_activate());
    assert_eq!(auth.session().access_token().as_deref(), Some("first"));
    assert_eq!(
        auth.current_user().map(|u| u.display_name()).as_deref(),
        Some("Ada Lovelace")
    );
    assert!(permissions.can_activate("users.edit"));
    assert!(!permissions.can_activate("users.delete"));
}

#[tokio::test]
async fn test_failed_user_load_purges_session() {
    let (server, auth) = setup().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    auth.session()
        .store(&TokenResponse {
            access_token: "stale".to_string(),
            refresh_token: "stale-refresh".to_string(),
            expires_in: 3600,
            token_type: None,
        })
        .unwrap();

    assert!(auth.check_auth().await.is_err());

    assert!(!auth.is_authenticated());
    assert!(auth.current_user().is_none());
    assert!(!auth.session().has_valid_token());
}

#[tokio::test]
async fn test_check_auth_without_token_skips_request() {
    let (server, auth) = setup().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(!auth.check_auth().await.unwrap());
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_refresher_exchanges_nearly_expired_token() {
    let (server, auth) = setup().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=old-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("renewed", 3600)))
        .expect(1)
        .mount(&server)
        .await;
    mount_me(&server, "renewed").await;

    let refresher = tokio::spawn(SessionRefresher::new(auth.clone()).run());
    let mut authenticated = auth.subscribe_authenticated();

    // Ten seconds left is inside the warning window, so the event fires at once.
    auth.session()
        .store(&TokenResponse {
            access_token: "old".to_string(),
            refresh_token: "old-refresh".to_string(),
            expires_in: 10,
            token_type: None,
        })
        .unwrap();

    tokio::time::timeout(Duration::from_secs(5), authenticated.wait_for(|a| *a))
        .await
        .expect("refresh did not complete")
        .unwrap();

    assert_eq!(auth.session().access_token().as_deref(), Some("renewed"));
    refresher.abort();
}
