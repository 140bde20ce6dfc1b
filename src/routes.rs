use crate::middlewares::trace_id::{TraceId, TraceIdLayer};
use crate::services;
use crate::state::AppState;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post, put},
};
use std::time::Duration;
use tracing::Span;

pub fn build() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(|| async { axum::http::StatusCode::OK }))
        .route("/api/auth/login", post(services::login))
        .route("/api/laptops/register", post(services::register))
        .route(
            "/api/laptops/check-duplicates",
            post(services::check_duplicates),
        )
        .route("/api/laptops/search", get(services::search))
        .route("/api/laptops/stats", get(services::stats))
        .route("/api/laptops/{id}/verify", put(services::verify))
        .route(
            "/api/laptops/{id}",
            get(services::get)
                .put(services::update)
                .delete(services::delete),
        )
        .route("/api/laptops", get(services::list))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let trace_id = request.extensions().get::<TraceId>().unwrap();
                    tracing::debug_span!(
                        "request",
                        trace_id = %trace_id,
                    )
                })
                .on_request(|req: &Request<Body>, _span: &Span| {
                    tracing::trace!(
                        method = %req.method(),
                        uri = %req.uri(),
                        version = %format!("{:?}", req.version()),
                        "started processing request"
                    );
                })
                .on_response(|res: &Response, latency: Duration, _span: &Span| {
                    tracing::trace!(
                        status = ?res.status(),
                        latency = %format!("{}ms", latency.as_millis()),
                        "finished processing request"
                    );
                }),
        )
        .layer(TraceIdLayer::new())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        )
}
