//! HTTP API server with observability for the trainer workload service.
//!
//! Provides REST endpoints for recording trainings and querying monthly
//! workload summaries, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use workload_store::WorkloadStore;

use routes::workloads::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: WorkloadStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/api/v1/workloads",
            axum::routing::post(routes::workloads::record::<S>)
                .delete(routes::workloads::cancel::<S>),
        )
        .route(
            "/api/v1/workloads/{username}",
            get(routes::workloads::get_workload::<S>),
        )
        .route(
            "/api/v1/workloads/{username}/months/{year}/{month}",
            get(routes::workloads::get_monthly_minutes::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the shared state wiring command and query handlers over one store.
pub fn create_default_state<S: WorkloadStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    use application::{WorkloadCommandHandler, WorkloadQueryHandler};

    Arc::new(AppState {
        commands: WorkloadCommandHandler::new(store.clone()),
        queries: WorkloadQueryHandler::new(store),
    })
}
