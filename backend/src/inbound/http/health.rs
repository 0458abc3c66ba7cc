//! Liveness and readiness probes for orchestrators and load balancers.
//!
//! ```text
//! GET /health/ready   200 {"status":"ready","store":"postgres"} | 503
//! GET /health/live    200 {"status":"live","store":"postgres"}  | 503
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Which entity store backs the running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    Postgres,
}

/// Probe response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeStatus {
    #[schema(example = "ready")]
    status: &'static str,
    store: StoreKind,
}

/// Shared probe state. Starts live but not ready.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    store: StoreKind,
}

impl HealthState {
    pub fn new(store: StoreKind) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            store,
        }
    }

    /// Mark the service as ready once migrations and wiring are complete.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness so orchestrators stop routing during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe(&self, ok: bool, status: &'static str) -> HttpResponse {
        let mut response = if ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(ProbeStatus {
                status: if ok { status } else { "unavailable" },
                store: self.store,
            })
    }
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Ready to handle traffic", body = ProbeStatus),
        (status = 503, description = "Not ready", body = ProbeStatus)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    state.probe(state.is_ready(), "ready")
}

/// Liveness probe. Returns 503 once the process is draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Alive", body = ProbeStatus),
        (status = 503, description = "Shutting down", body = ProbeStatus)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    state.probe(state.is_alive(), "live")
}
