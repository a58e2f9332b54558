//! HTTP layer: the axum server that builds and serves bundles.

pub mod handler;

use chrono::{DateTime, Utc};
use std::time::SystemTime;

pub use handler::{create_router, AppState};

/// Format a timestamp as an HTTP date (`Sun, 06 Nov 1994 08:49:37 GMT`).
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
