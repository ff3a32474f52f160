//! Employee REST API
//!
//! Reads are answered from the cache, writes go through the upstream first.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use roster_common::{Employee, EmployeeDraft, EmployeeId};
use roster_core::{EmployeeService, RefreshScheduler};
use roster_upstream::ClientMetrics;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::error::ApiError;

/// Body returned by a successful delete
pub const DELETE_SUCCESS_MESSAGE: &str = "Employee deleted successfully.";

/// Shared application state for the API
#[derive(Clone)]
pub struct ApiState {
    /// Employee operations
    pub service: EmployeeService,
    /// Background refresh, reported by the health endpoint
    pub scheduler: Arc<RefreshScheduler>,
    /// Upstream client settings, reported by the health endpoint
    pub upstream: Option<ClientMetrics>,
}

impl ApiState {
    /// Create state for the given service and scheduler
    pub fn new(service: EmployeeService, scheduler: Arc<RefreshScheduler>) -> Self {
        Self {
            service,
            scheduler,
            upstream: None,
        }
    }

    /// Attach upstream client metrics
    pub fn with_upstream_metrics(mut self, metrics: ClientMetrics) -> Self {
        self.upstream = Some(metrics);
        self
    }
}

/// Health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` once the cache is warm, `warming` before
    pub status: &'static str,
    /// Whether the cache has been populated
    pub cache_warm: bool,
    /// Number of cached employees
    pub cache_size: usize,
    /// Whether the refresh loop is running
    pub scheduler_running: bool,
    /// Time of the last successful reconciliation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reconciled: Option<String>,
    /// Upstream client settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<ClientMetrics>,
}

type ApiResult<T> = Result<T, ApiError>;

/// Create the API router with all endpoints
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/employees", get(get_all_employees).post(create_employee))
        .route("/employees/search/:name", get(get_employees_by_name_search))
        .route("/employees/highestSalary", get(get_highest_salary))
        .route(
            "/employees/topTenHighestEarningEmployeeNames",
            get(get_top_ten_highest_earning_employee_names),
        )
        .route(
            "/employees/:id",
            get(get_employee_by_id).delete(delete_employee_by_id),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Service health and cache state
async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let cache = state.service.cache_status();
    Json(HealthResponse {
        status: if cache.warm { "ok" } else { "warming" },
        cache_warm: cache.warm,
        cache_size: cache.size,
        scheduler_running: state.scheduler.is_running().await,
        last_reconciled: cache.last_reconciled.map(|t| t.to_rfc3339()),
        upstream: state.upstream.clone(),
    })
}

/// Every employee
async fn get_all_employees(State(state): State<ApiState>) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(state.service.get_all_employees().await?))
}

/// Employees whose name contains the path fragment
async fn get_employees_by_name_search(
    Path(name): Path<String>,
    State(state): State<ApiState>,
) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(state.service.get_employees_by_name_search(&name).await?))
}

/// A single employee
async fn get_employee_by_id(
    Path(id): Path<String>,
    State(state): State<ApiState>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(state.service.get_employee_by_id(&EmployeeId::new(id)).await?))
}

/// Highest salary as a bare integer
async fn get_highest_salary(State(state): State<ApiState>) -> ApiResult<Json<u32>> {
    Ok(Json(state.service.get_highest_salary().await?))
}

/// Names of the best paid employees
async fn get_top_ten_highest_earning_employee_names(
    State(state): State<ApiState>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.get_top_earner_names().await?))
}

/// Create an employee
async fn create_employee(
    State(state): State<ApiState>,
    payload: Result<Json<EmployeeDraft>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let Json(draft) = payload?;
    Ok(Json(state.service.create_employee(draft).await?))
}

/// Delete an employee by id
async fn delete_employee_by_id(
    Path(id): Path<String>,
    State(state): State<ApiState>,
) -> ApiResult<(StatusCode, &'static str)> {
    state
        .service
        .delete_employee_by_id(&EmployeeId::new(id))
        .await?;
    Ok((StatusCode::OK, DELETE_SUCCESS_MESSAGE))
}

/// Serve the API until `shutdown` resolves
pub async fn start_server<F>(state: ApiState, bind_address: &str, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Starting employee API on {}", bind_address);

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(bind_address).await?;

    info!("Employee API listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Employee API stopped");
    Ok(())
}
