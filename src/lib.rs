//! Donalytics is a revenue analytics engine for fundraising dashboards.
//!
//! It answers "how much was raised, from whom and how often" for a date range, and
//! compares the answer against a second, non-overlapping range. The library provides:
//!
//! - pure analytics: date range validation, comparison range resolution, frequency
//!   classification, aggregation, trend bucketing, percentage changes and series
//!   overlays;
//! - a filter store that holds the dashboard's shared filters and per-chart comparison
//!   settings, and only ever commits valid states;
//! - a JSON REST API that serves both of the above from a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

pub mod analytics;
mod app_state;
pub mod comparison;
pub mod config;
pub mod dashboard;
pub mod database_id;
pub mod date_range;
mod db;
pub mod endpoints;
mod error;
pub mod filters;
mod logging;
pub mod revenue;
mod routing;
pub mod source;
mod timezone;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::local_today;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
