//! The application context and route dispatch.
//!
//! [`App`] owns everything a request needs: the immutable configuration,
//! the article store, and the session layer. It is constructed once at
//! startup and shared read-only across connections.

use bytes::Bytes;
use gazette_core::Config;
use gazette_extract::{response, Cookies, ExtractionContext};
use gazette_store::ArticleStore;
use http::{Response, StatusCode};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::handlers;
use crate::session::{Sessions, SESSION_COOKIE};

/// Application context shared by all requests.
pub struct App {
    config: Config,
    store: ArticleStore,
    sessions: Sessions,
}

impl App {
    /// Creates the context from loaded configuration and an opened store.
    #[must_use]
    pub fn new(config: Config, store: ArticleStore) -> Self {
        let sessions = Sessions::new(config.secret_key.clone());
        Self {
            config,
            store,
            sessions,
        }
    }

    /// Returns the application configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the article store.
    #[must_use]
    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    /// Returns the session layer.
    #[must_use]
    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// Resolves this request's session values as a JSON object, the shape
    /// the field extraction pipeline consumes.
    ///
    /// Returns `None` when the request has no cookie, the cookie fails
    /// verification, or the session holds no values yet; extraction then
    /// treats the source as absent.
    pub(crate) fn session_object(&self, cookies: &Cookies) -> Option<Map<String, Value>> {
        let cookie = cookies.get(SESSION_COOKIE)?;
        let id = self.sessions.verify(cookie)?;
        let god_password = self.sessions.god_password(&id)?;

        let mut object = Map::new();
        object.insert("god_password".to_string(), Value::String(god_password));
        Some(object)
    }

    /// Dispatches a request to its handler.
    ///
    /// Fixed routes match first; any other single-segment GET path is
    /// treated as an article slug.
    pub async fn handle(&self, ctx: ExtractionContext) -> Response<Bytes> {
        let method = ctx.method().clone();
        let path = ctx.path().to_string();
        debug!(%method, %path, "handling request");

        match (method.as_str(), path.as_str()) {
            ("GET", "/") => unwrap_api(handlers::articles(self, &ctx)),
            ("GET", "/health") => handlers::health(),
            ("GET", "/post") => unwrap_api(handlers::authoring(self, &ctx)),
            ("POST", "/api/post") => unwrap_api(handlers::create_article(self, &ctx)),
            ("POST", "/api/set-god-password") => {
                unwrap_api(handlers::set_god_password(self, &ctx))
            }
            ("GET", slug_path) => {
                let slug = &slug_path[1..];
                if slug.is_empty() || slug.contains('/') {
                    not_found(&path)
                } else {
                    handlers::article(self, slug)
                }
            }
            _ => not_found(&path),
        }
    }
}

fn unwrap_api(result: Result<Response<Bytes>, gazette_core::AppError>) -> Response<Bytes> {
    result.unwrap_or_else(|err| response::error(&err))
}

fn not_found(path: &str) -> Response<Bytes> {
    response::json_with_status(
        StatusCode::NOT_FOUND,
        &json!({"text": "Not found!", "error": "not_found", "path": path}),
    )
}
