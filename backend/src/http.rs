//! Routes and middleware.
//!
//! - `GET /` → `200 text/plain` greeting
//! - `GET /health` → `200` JSON `{ "status": "ok", "uptime": <secs>, "dbStatus"?: <str> }`

use crate::db::DbStatus;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

pub const GREETING: &str = "Hello from sample backend";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_status: Option<&'static str>,
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler));

    let router = if state.report_errors {
        router.layer(middleware::from_fn(report_server_errors))
    } else {
        router
    };

    router.with_state(state)
}

async fn root_handler() -> &'static str {
    GREETING
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match state.db.get().await {
        DbStatus::NotConfigured => None,
        status => Some(status.as_str()),
    };

    Json(HealthResponse {
        status: "ok",
        uptime: state.started.elapsed().as_secs_f64(),
        db_status,
    })
}

/// Sends a Sentry event for every 5xx response; the response itself passes
/// through untouched. Without an initialised client this only costs the
/// status check.
pub async fn report_server_errors(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();
    if status.is_server_error() {
        tracing::error!(method = %method, route = %route, status = status.as_u16(), "server error");
        sentry::with_scope(
            |scope| {
                scope.set_tag("method", &method);
                scope.set_tag("route", &route);
                scope.set_tag("status", status.as_u16());
            },
            || sentry::capture_message(&format!("{method} {route} responded {status}"), sentry::Level::Error),
        );
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_omits_missing_db_status() {
        let body = serde_json::to_value(HealthResponse {
            status: "ok",
            uptime: 1.5,
            db_status: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"status": "ok", "uptime": 1.5}));

        let body = serde_json::to_value(HealthResponse {
            status: "ok",
            uptime: 0.0,
            db_status: Some("connected"),
        })
        .unwrap();
        assert_eq!(body["dbStatus"], "connected");
    }
}
