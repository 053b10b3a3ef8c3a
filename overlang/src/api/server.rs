//! API server setup and configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderValue, Method};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::api::routes;
use crate::database::DbPool;
use crate::database::repositories::{
    JobRepository, MemberRepository, ProjectRepository, SegmentRepository, SqlxJobRepository,
    SqlxMemberRepository, SqlxProjectRepository, SqlxSegmentRepository,
};
use crate::error::Result;
use crate::identity::{DisabledVerifier, IdentityVerifier};
use crate::member::MemberService;

/// Path excluded from request tracing.
const HEALTH_PATH: &str = "/api/v1/health";

/// Default frontend origin allowed by CORS.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Preflight cache lifetime.
const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Origins allowed to make credentialed cross-origin requests
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }
}

impl ApiServerConfig {
    /// Load API server config from environment variables, falling back to defaults.
    ///
    /// Supported env vars:
    /// - `API_BIND_ADDRESS` (e.g. "0.0.0.0")
    /// - `API_PORT` (e.g. "8080")
    /// - `CORS_ALLOWED_ORIGINS` (comma separated)
    pub fn from_env_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(bind_address) = std::env::var("API_BIND_ADDRESS")
            && !bind_address.trim().is_empty()
        {
            config.bind_address = bind_address;
        }

        if let Ok(port) = std::env::var("API_PORT")
            && let Ok(parsed) = port.parse::<u16>()
        {
            config.port = parsed;
        }

        if let Ok(origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
            let parsed = parse_origins(&origins);
            if !parsed.is_empty() {
                config.cors_allowed_origins = parsed;
            }
        }

        config
    }

    fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::PATCH,
                Method::OPTIONS,
            ])
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
            .max_age(CORS_MAX_AGE)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool, probed by the health endpoint
    pub pool: DbPool,
    /// Verifier for bearer credentials
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Member reconciliation
    pub member_service: Arc<MemberService>,
    pub project_repository: Arc<dyn ProjectRepository>,
    pub job_repository: Arc<dyn JobRepository>,
    pub segment_repository: Arc<dyn SegmentRepository>,
}

impl AppState {
    /// Create state backed by SQLx repositories on `pool`.
    ///
    /// Identity verification starts disabled; see [`AppState::with_verifier`].
    pub fn new(pool: DbPool) -> Self {
        let member_repository: Arc<dyn MemberRepository> =
            Arc::new(SqlxMemberRepository::new(pool.clone()));
        Self {
            verifier: Arc::new(DisabledVerifier),
            member_service: Arc::new(MemberService::new(member_repository)),
            project_repository: Arc::new(SqlxProjectRepository::new(pool.clone())),
            job_repository: Arc::new(SqlxJobRepository::new(pool.clone())),
            segment_repository: Arc::new(SqlxSegmentRepository::new(pool.clone())),
            pool,
        }
    }

    /// Set the identity verifier.
    pub fn with_verifier(mut self, verifier: Arc<dyn IdentityVerifier>) -> Self {
        self.verifier = verifier;
        self
    }
}

/// API server.
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
    cancel_token: CancellationToken,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Get the cancellation token for graceful shutdown.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Build the router with all middleware and routes.
    pub fn build_router(&self) -> Router {
        routes::create_router(self.state.clone())
            .layer(self.config.cors_layer())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|req: &Request| {
                        if req.uri().path().starts_with(HEALTH_PATH) {
                            Span::none()
                        } else {
                            use tower_http::trace::MakeSpan;
                            tower_http::trace::DefaultMakeSpan::new()
                                .level(tracing::Level::INFO)
                                .make_span(req)
                        }
                    })
                    .on_request(|req: &Request, span: &Span| {
                        if span.is_disabled() {
                            return;
                        }
                        use tower_http::trace::OnRequest;
                        tower_http::trace::DefaultOnRequest::new()
                            .level(tracing::Level::INFO)
                            .on_request(req, span);
                    })
                    .on_response(
                        |res: &axum::http::Response<_>, latency: Duration, span: &Span| {
                            if span.is_disabled() {
                                return;
                            }
                            use tower_http::trace::OnResponse;
                            tower_http::trace::DefaultOnResponse::new()
                                .level(tracing::Level::INFO)
                                .on_response(res, latency, span);
                        },
                    ),
            )
    }

    /// Start the server and serve until the cancel token fires.
    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.bind_address, self.config.port)
            .parse()
            .map_err(|e| crate::error::Error::ApiError(format!("Invalid address: {}", e)))?;

        let router = self.build_router();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("API server listening on http://{}", addr);

        let cancel_token = self.cancel_token.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                tracing::info!("API server shutting down...");
            })
            .await
            .map_err(|e| crate::error::Error::ApiError(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ApiServerConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_allowed_origins, vec![DEFAULT_CORS_ORIGIN]);
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" http://a.test, ,http://b.test "),
            vec!["http://a.test", "http://b.test"]
        );
        assert!(parse_origins(" , ").is_empty());
    }

    #[tokio::test]
    async fn test_server_creation() {
        let pool = crate::database::init_pool("sqlite::memory:").await.unwrap();
        let server = ApiServer::new(ApiServerConfig::default(), AppState::new(pool));

        let token = server.cancel_token();
        assert!(!token.is_cancelled());
        server.shutdown();
        assert!(token.is_cancelled());
    }
}
