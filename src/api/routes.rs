use crate::api::handlers::{battery, health, measurement, summary, wind};
use crate::config::Config;
use crate::db::DbPool;
use axum::{extract::Request, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

pub fn create_router(pool: DbPool, config: Config) -> Router {
    let public_routes = Router::new().route("/health", get(health::health));

    // Authentication is handled at ingress level
    let api_routes = Router::new()
        .route(
            "/api/v1/measurement/battery/current",
            get(battery::get_current),
        )
        .route("/api/v1/measurement/wind/current", get(wind::get_current))
        .route(
            "/api/v1/measurement/{metric}/hourly/{date}",
            get(measurement::get_hourly),
        )
        .route(
            "/api/v1/measurement/{metric}/daily/week/{date}",
            get(measurement::get_daily_for_week),
        )
        .route(
            "/api/v1/measurement/{metric}/daily/month/{date}",
            get(measurement::get_daily_for_month),
        )
        .route(
            "/api/v1/measurement/{metric}/seven-day-period/{date}",
            get(measurement::get_seven_day_period),
        )
        .route(
            "/api/v1/measurement/{metric}/monthly/{date}",
            get(measurement::get_monthly),
        )
        .route(
            "/api/v1/measurement/{metric}/sum/{span}/{date}",
            get(summary::get_sum),
        )
        .route(
            "/api/v1/measurement/{metric}/avg/{span}/{date}",
            get(summary::get_avg),
        );

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .with_state((pool, config))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &Request| {
                            tracing::span!(
                                Level::INFO,
                                "http_request",
                                method = %request.method(),
                                uri = %request.uri(),
                            )
                        })
                        .on_request(|_request: &Request, _span: &tracing::Span| {
                            tracing::event!(Level::DEBUG, "received request");
                        })
                        .on_response(
                            |response: &axum::response::Response,
                             latency: std::time::Duration,
                             _span: &tracing::Span| {
                                tracing::event!(
                                    Level::INFO,
                                    status = response.status().as_u16(),
                                    latency = ?latency,
                                    "request completed"
                                );
                            },
                        )
                        .on_failure(
                            |error: tower_http::classify::ServerErrorsFailureClass,
                             _latency: std::time::Duration,
                             _span: &tracing::Span| {
                                tracing::event!(Level::ERROR, error = %error, "request failed");
                            },
                        ),
                )
                .layer(CorsLayer::permissive()),
        )
}
