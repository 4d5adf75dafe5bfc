//! Health-check handlers for process supervisors and load balancers.
//!
//! | Check     | Path       | Answer                  |
//! |-----------|------------|-------------------------|
//! | Liveness  | `/healthz` | `200 ok` while running  |
//! | Readiness | `/readyz`  | `200 ready`             |
//!
//! The store is loaded before the listener binds, so once requests arrive the
//! service is ready; neither check touches the store lock.

use crate::{Request, Response};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Always `200 OK` with body `"ready"`.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
