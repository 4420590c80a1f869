//! [axum] integration of the [GeoFilter].
//!
//! ```no_run
//! use axum::Router;
//! use axum::middleware::from_fn_with_state;
//! use axum::routing::get;
//! use geofence::{FilterConfig, GeoFilter, middleware};
//! use std::net::SocketAddr;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = FilterConfig::builder(["HR", "SI"]).build()?;
//!
//! let app = Router::new()
//!     .route("/", get(async || "Dobar dan!"))
//!     .layer(from_fn_with_state(GeoFilter::new(config), middleware::middleware));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8888").await?;
//! let service = app.into_make_service_with_connect_info::<SocketAddr>();
//! axum::serve(listener, service).await?;
//! # Ok(())
//! # }
//! ```

use crate::errors::FilterError;
use crate::filter::GeoFilter;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use tracing::error;

/// Runs the [GeoFilter] before the request handler.
///
/// Rejected requests get a `403 Forbidden` response with the configured
/// message. If the client location can't be resolved, the request fails with
/// `500 Internal Server Error`.
pub async fn middleware(State(filter): State<GeoFilter>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();

    match filter.check(&parts) {
        Ok(()) => next.run(Request::from_parts(parts, body)).await,
        Err(FilterError::Denied(denied)) => denied.into_response(),
        Err(FilterError::Resolver(error)) => {
            error!("Failed to resolve client location: {error:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
