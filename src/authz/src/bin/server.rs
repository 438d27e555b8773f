//! # Authorization HTTP Server
//!
//! HTTP front for the Facilium authorization core. Thin route handlers
//! resolve the caller's session from a bearer token and shell out to the
//! enforcement guards; the only logic here is translating structured
//! authorization failures into transport status codes.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /v1/me` - Caller's identity, roles, and permission union
//! - `GET|PUT|DELETE /v1/organization` - Organization routes (view/edit/delete)
//! - `POST /v1/facilities`, `DELETE /v1/facilities/:id` - Facility routes
//! - `GET /v1/members` - Membership listing (any member permission)
//!
//! ## Configuration
//!
//! Environment variables:
//! - `PORT` - HTTP server port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    serve, Router,
};
use facilium_authz::{
    guard::{require_any_permission, require_permission},
    registry::{permission, role},
    AccessResolver, AuthzError, MemorySessions, Registry, Requirement, Session,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared application state
#[derive(Clone)]
struct AppState {
    registry: Arc<Registry>,
    sessions: Arc<MemorySessions>,
}

impl AppState {
    /// Resolver bound to this request's bearer token.
    fn resolver(&self, headers: &HeaderMap) -> AccessResolver {
        let token = bearer_token(headers);
        AccessResolver::new(
            Arc::clone(&self.registry),
            Arc::new(self.sessions.for_token(token)),
        )
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<Requirement>,
}

/// Application error type
#[derive(Debug)]
struct AppError(AuthzError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AuthzError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthzError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthzError::SessionLookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let missing = self.0.missing_requirement().cloned();
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
            missing,
        });

        (status, body).into_response()
    }
}

impl From<AuthzError> for AppError {
    fn from(err: AuthzError) -> Self {
        AppError(err)
    }
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// GET /health - Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: facilium_authz::VERSION.to_string(),
    })
}

/// Caller introspection response
#[derive(Debug, Serialize)]
struct MeResponse {
    user_id: String,
    roles: Vec<String>,
    permissions: BTreeSet<String>,
}

/// GET /v1/me - The caller's resolved identity
async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<MeResponse>, AppError> {
    let access = state.resolver(&headers).resolve().await?;
    let session = access.session().ok_or(AuthzError::Unauthorized)?;

    Ok(Json(MeResponse {
        user_id: session.user_id.clone(),
        roles: access.roles().to_vec(),
        permissions: access.permissions().into_iter().collect(),
    }))
}

#[derive(Debug, Serialize)]
struct OrganizationResponse {
    id: String,
    name: String,
}

/// GET /v1/organization - requires org:view
async fn view_organization(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<OrganizationResponse>, AppError> {
    require_permission(&state.resolver(&headers), permission::ORG_VIEW).await?;

    Ok(Json(OrganizationResponse {
        id: "org-1".to_string(),
        name: "Facilium Demo Org".to_string(),
    }))
}

/// PUT /v1/organization - requires org:edit
async fn edit_organization(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let access = require_permission(&state.resolver(&headers), permission::ORG_EDIT).await?;
    info!(user_id = %access.session().map(|s| s.user_id.as_str()).unwrap_or(""), "organization updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/organization - requires org:delete
async fn delete_organization(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    require_permission(&state.resolver(&headers), permission::ORG_DELETE).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct FacilityResponse {
    id: String,
}

/// POST /v1/facilities - requires facility:create
async fn create_facility(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<FacilityResponse>), AppError> {
    require_permission(&state.resolver(&headers), permission::FACILITY_CREATE).await?;

    Ok((
        StatusCode::CREATED,
        Json(FacilityResponse {
            id: "facility-1".to_string(),
        }),
    ))
}

/// DELETE /v1/facilities/:id - requires facility:delete
async fn delete_facility(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&state.resolver(&headers), permission::FACILITY_DELETE).await?;
    info!(facility_id = %id, "facility deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/members - requires any member permission
async fn list_members(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<String>>, AppError> {
    require_any_permission(
        &state.resolver(&headers),
        [permission::MEMBER_VIEW, permission::MEMBER_MANAGE],
    )
    .await?;

    Ok(Json(vec!["alice".to_string(), "bob".to_string()]))
}

/// Create the HTTP router with all endpoints
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_check))
        .route("/v1/me", get(me))
        .route(
            "/v1/organization",
            get(view_organization)
                .put(edit_organization)
                .delete(delete_organization),
        )
        .route("/v1/facilities", post(create_facility))
        .route("/v1/facilities/:id", delete(delete_facility))
        .route("/v1/members", get(list_members))
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
        .with_state(state)
}

/// Seed demo sessions, one per role.
async fn seed_sessions(sessions: &MemorySessions) {
    for role in role::ALL {
        let token = format!("{}-token", role);
        let session = Session::new(format!("user:{}", role)).with_roles([role]);
        sessions.insert(&token, session).await;
        info!(token = %token, role = %role, "seeded demo session");
    }
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }

    info!("Starting graceful shutdown");
}

/// Main server entrypoint
#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Facilium authorization server v{}",
        facilium_authz::VERSION
    );

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let sessions = Arc::new(MemorySessions::new());
    seed_sessions(&sessions).await;

    let state = AppState {
        registry: Arc::new(Registry::default()),
        sessions,
    };

    let app = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}
