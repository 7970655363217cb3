//! Focus REST Service
//!
//! Exposes the focus kernel over HTTP for the graph UI and IDE tooling.
//!
//! ## Endpoints
//!
//! - `GET  /api/config` - Read the persisted focus selection
//! - `POST /api/config` - Replace the focus selection in full
//! - `GET  /api/graph` - Build and return the dependency graph
//! - `POST /api/apply-idea` - Write the IDE exclusion descriptor
//! - `GET  /api/events` - SSE stream of change events
//! - `GET  /health` - Service health check
//! - `GET  /health/live` - Liveness probe

pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::ServiceState;
