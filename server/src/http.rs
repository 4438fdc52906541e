use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderName, HeaderValue},
    routing::{get, post},
};
use platform_api::{ApiError, ApiResult, internal_error};
use platform_db::DbPool;
use products_hr::{EmployeeProfile, HrError, HrModule, LoginIdentity};
use sea_orm::{ConnectionTrait, Statement};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::AppConfig;

const WELCOME_MESSAGE: &str = "Welcome to the Employee Profile API.";
const LOGIN_MESSAGE: &str = "Login successful";

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub hr: HrModule,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Arc<AppConfig>) -> Self {
        Self {
            hr: HrModule::new(pool.clone()),
            pool,
            config,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(addr = %config.addr, "directory server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

/// Credentials are allowed, so methods and headers are mirrored from the
/// preflight rather than wildcarded.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    CorsLayer::new()
        .allow_credentials(true)
        .allow_headers(AllowHeaders::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_origin(AllowOrigin::list(allowed))
}

pub fn build_router(state: AppState) -> Router {
    let header_name = HeaderName::from_static("x-request-id");
    let cors = cors_layer(&state.config.cors_allowed_origins);
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/login", post(login_handler))
        .route("/api/employee/{id}", get(employee_handler))
        .route("/api/employees", get(employees_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: WELCOME_MESSAGE,
    })
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    #[serde(flatten)]
    identity: LoginIdentity,
    message: &'static str,
}

async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(credentials) = payload.map_err(|err| ApiError::InvalidInput(err.body_text()))?;
    let identity = state
        .hr
        .authenticate(&credentials.email, &credentials.password)
        .await
        .map_err(hr_error)?;
    info!(employee_id = identity.id, "login successful");
    Ok(Json(LoginResponse {
        identity,
        message: LOGIN_MESSAGE,
    }))
}

async fn employee_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<EmployeeProfile>> {
    let Path(raw) = id.map_err(|err| ApiError::InvalidInput(err.body_text()))?;
    let id = parse_employee_id(&raw)?;
    let profile = state.hr.profile(id).await.map_err(hr_error)?;
    Ok(Json(profile))
}

/// Any integer is a valid id; one too large to have been assigned simply
/// does not exist.
fn parse_employee_id(raw: &str) -> ApiResult<i64> {
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(id);
    }
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Err(ApiError::NotFound("Employee"))
    } else {
        Err(ApiError::InvalidInput(format!(
            "employee id must be an integer, got {raw:?}"
        )))
    }
}

async fn employees_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<EmployeeProfile>>> {
    let profiles = state.hr.profiles().await.map_err(hr_error)?;
    Ok(Json(profiles))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_ok = state
        .pool
        .execute(Statement::from_string(
            state.pool.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

fn hr_error(err: HrError) -> ApiError {
    match err {
        HrError::AuthFailure => ApiError::Unauthorized,
        HrError::NotFound(_) => ApiError::NotFound("Employee"),
        other => internal_error(other),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
