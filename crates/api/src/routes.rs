//! Route tree and middleware stack.

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::{board, demands, health, projects, reports, stages};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// GET    /projects                 list
/// POST   /projects                 create
/// GET    /projects/{id}            get_by_id
/// PUT    /projects/{id}            update
/// DELETE /projects/{id}            delete (cascades owned demands)
///
/// GET    /demands                  list (project_id/stage_id/responsible filters)
/// POST   /demands                  create
/// GET    /demands/{id}             get_by_id
/// PUT    /demands/{id}             update
/// DELETE /demands/{id}             delete
/// PATCH  /demands/{id}/status      change_status
///
/// GET    /stages                   list (ordered)
/// POST   /stages                   create
/// GET    /stages/{id}              get_by_id
/// PUT    /stages/{id}              update
/// DELETE /stages/{id}              delete (detaches referencing demands)
///
/// GET    /board                    kanban columns
/// GET    /reports/delay-risk       risk table (?today=YYYY-MM-DD)
/// GET    /reports/dashboard        dashboard metrics
/// GET    /reports/s-curve          cumulative planned vs actual
/// GET    /reports/gantt            task bars (?level=demand|project)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/demands", get(demands::list).post(demands::create))
        .route(
            "/demands/{id}",
            get(demands::get_by_id)
                .put(demands::update)
                .delete(demands::delete),
        )
        .route(
            "/demands/{id}/status",
            axum::routing::patch(demands::change_status),
        )
        .route("/stages", get(stages::list).post(stages::create))
        .route(
            "/stages/{id}",
            get(stages::get_by_id)
                .put(stages::update)
                .delete(stages::delete),
        )
        .route("/board", get(board::board))
        .route("/reports/delay-risk", get(reports::delay_risk))
        .route("/reports/dashboard", get(reports::dashboard))
        .route("/reports/s-curve", get(reports::s_curve))
        .route("/reports/gantt", get(reports::gantt))
}

/// Build the full application router with the production middleware stack
/// (CORS, request id, timeout, tracing, panic recovery).
///
/// Shared by `main.rs` and the integration tests so both exercise the same
/// layers.
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE]);

    let request_id_header = HeaderName::from_static("x-request-id");
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .merge(health::router())
        .nest("/api/v1", api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}
