use crate::clients::{ArticleClient, UserClient};
use admin_framework::auth::{AuthGuard, AuthService, SessionRefresher};
use admin_framework::events::CoreEvents;
use admin_framework::language::LanguageService;
use admin_framework::permission::PermissionService;
use admin_framework::{ApiClient, ApiError, CookieStore, Environment, NotificationCenter, SessionGuard};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Runtime orchestrator of the admin client.
///
/// `AdminSystem` is responsible for:
/// - **Wiring**: one session guard, notification centre, language service
///   and API client shared by every resource client
/// - **Background work**: the [`SessionRefresher`] loop
/// - **Startup**: language list and session check ([`AdminSystem::start`])
///
/// # Example
///
/// ```ignore
/// let env = Environment::load(".", false)?;
/// let store = Arc::new(FileCookieStore::open("cookies.json")?);
/// let system = AdminSystem::new(env, store)?;
/// system.start().await;
///
/// let mut articles = system.articles.list_view();
/// articles.initialize().await;
///
/// system.shutdown().await?;
/// ```
pub struct AdminSystem {
    pub env: Environment,
    pub session: Arc<SessionGuard>,
    pub notifications: Arc<NotificationCenter>,
    pub languages: Arc<LanguageService>,
    pub api: Arc<ApiClient>,
    pub auth: Arc<AuthService>,
    pub core_events: CoreEvents,

    pub users: UserClient,
    pub articles: ArticleClient,

    /// Background tasks, aborted on shutdown.
    handles: Vec<JoinHandle<()>>,
}

impl AdminSystem {
    /// Builds and wires every service. Must be called inside a Tokio runtime.
    ///
    /// A token persisted by an earlier run re-arms its expiry warning here,
    /// after the refresher is already listening.
    pub fn new(env: Environment, store: Arc<dyn CookieStore>) -> Result<Self, ApiError> {
        let session = Arc::new(SessionGuard::new(Arc::clone(&store), env.session_config()));
        let notifications = Arc::new(NotificationCenter::new());
        let languages = Arc::new(LanguageService::new(store, &env));
        let api = Arc::new(ApiClient::new(
            &env,
            Arc::clone(&session),
            languages.locale_receiver(),
            notifications.clone(),
        )?);
        let auth = Arc::new(AuthService::new(Arc::clone(&api), &env));

        let refresher = tokio::spawn(SessionRefresher::new(Arc::clone(&auth)).run());
        session.resume();

        let users = UserClient::new(Arc::clone(&api), &env.api_url_path);
        let articles = ArticleClient::new(Arc::clone(&api), &env.api_url_path);
        info!(api_url = %env.api_url, locale = %languages.current_lang(), "Admin system ready");

        Ok(Self {
            env,
            session,
            notifications,
            languages,
            api,
            auth,
            core_events: CoreEvents::new(),
            users,
            articles,
            handles: vec![refresher],
        })
    }

    /// Loads the language list and restores the signed-in user, if any.
    /// Returns whether a user is signed in.
    pub async fn start(&self) -> bool {
        self.languages.initialize(&self.api).await;
        match self.auth.check_auth().await {
            Ok(authenticated) => authenticated,
            Err(e) => {
                warn!(error = %e, "Stored session rejected");
                false
            }
        }
    }

    pub fn permissions(&self) -> PermissionService {
        PermissionService::new(self.auth.subscribe_user())
    }

    pub fn auth_guard(&self) -> AuthGuard {
        AuthGuard::new(&self.auth)
    }

    /// Stops the background tasks and waits for them to finish.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if every task stopped or was cancelled
    /// - `Err(String)` if a task panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down admin system...");

        for handle in &self.handles {
            handle.abort();
        }
        for handle in self.handles {
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    error!("Background task failed: {:?}", e);
                    return Err(format!("Background task failed: {:?}", e));
                }
            }
        }

        self.notifications.clear_all();
        info!("Admin system shutdown complete.");
        Ok(())
    }
}
