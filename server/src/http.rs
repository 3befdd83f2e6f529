use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use entity::{Employee, EmployeeDraft};
use platform_store::{EmployeeStore, StoreError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: EmployeeStore,
    pub config: Arc<AppConfig>,
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

    info!(%config.addr, "staffstore listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/get-all-employees", get(list_employees_handler))
        .route("/api/add-employee", post(add_employee_handler))
        .route("/api/update-employee/{id}", put(update_employee_handler))
        .route("/api/delete-employee/{id}", delete(delete_employee_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = tokio::fs::try_exists(state.store.path())
        .await
        .unwrap_or(false);
    Json(HealthResponse {
        ok: true,
        store_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    ok: bool,
    store_ok: bool,
    version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeWritten {
    message: &'static str,
    employee: Employee,
    total_employees: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeDeleted {
    message: &'static str,
    deleted_employee: Employee,
    remaining_employees: usize,
}

type HttpResult<T> = Result<T, ApiError>;

async fn list_employees_handler(
    State(state): State<AppState>,
) -> HttpResult<Json<Vec<Employee>>> {
    let employees = state
        .store
        .list()
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to read file"))?;
    Ok(Json(employees))
}

async fn add_employee_handler(
    State(state): State<AppState>,
    Json(draft): Json<EmployeeDraft>,
) -> HttpResult<(StatusCode, Json<EmployeeWritten>)> {
    let (employee, total_employees) = state
        .store
        .add(draft)
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to add employee"))?;
    Ok((
        StatusCode::CREATED,
        Json(EmployeeWritten {
            message: "Employee added successfully",
            employee,
            total_employees,
        }),
    ))
}

async fn update_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<EmployeeDraft>,
) -> HttpResult<Json<EmployeeWritten>> {
    let target = parse_employee_id(&id)?;
    let (employee, total_employees) = state
        .store
        .update(target, draft)
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to update employee"))?;
    Ok(Json(EmployeeWritten {
        message: "Employee updated successfully",
        employee,
        total_employees,
    }))
}

async fn delete_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HttpResult<Json<EmployeeDeleted>> {
    let target = parse_employee_id(&id)?;
    let (deleted_employee, remaining_employees) = state
        .store
        .remove(target)
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to delete employee"))?;
    Ok(Json(EmployeeDeleted {
        message: "Employee deleted successfully",
        deleted_employee,
        remaining_employees,
    }))
}

/// Identifier text is validated before the store is touched, so a malformed
/// id can never be preceded by a file mutation.
fn parse_employee_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId {
        provided: raw.to_string(),
    })
}

/// Request-boundary failure taxonomy. Each variant maps to one status code
/// and a structured JSON body with an `error` key plus context fields.
#[derive(Debug)]
enum ApiError {
    FileMissing { path: PathBuf },
    UnknownEmployee { id: Uuid },
    InvalidId { provided: String },
    Internal { action: &'static str, message: String },
}

impl ApiError {
    fn from_store(err: StoreError, action: &'static str) -> Self {
        match err {
            StoreError::FileMissing { path } => Self::FileMissing { path },
            StoreError::UnknownEmployee { id } => Self::UnknownEmployee { id },
            StoreError::Io(_) | StoreError::Malformed(_) => Self::Internal {
                action,
                message: err.to_string(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provided_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::FileMissing { path } => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "File not found",
                    message: None,
                    path: Some(path.display().to_string()),
                    provided_id: None,
                },
            ),
            ApiError::UnknownEmployee { id } => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "Employee not found",
                    message: Some(format!("No employee found with ID: {id}")),
                    path: None,
                    provided_id: Some(id.to_string()),
                },
            ),
            ApiError::InvalidId { provided } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "Invalid ID format",
                    message: Some("ID must be a valid UUID".into()),
                    path: None,
                    provided_id: Some(provided),
                },
            ),
            ApiError::Internal { action, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: action,
                    message: Some(message),
                    path: None,
                    provided_id: None,
                },
            ),
        };
        (status, Json(body)).into_response()
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
