//! Axum routes for the focus service.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};

use crate::descriptor;
use crate::graph::{DependencyGraph, GraphBuilder};
use crate::reach;
use crate::types::FocusConfig;

use super::state::ServiceState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Graph payload: nodes plus directed edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphResponse {
    /// One node per project in the universe.
    pub nodes: Vec<NodeDto>,
    /// One entry per edge, multiplicity preserved.
    pub edges: Vec<EdgeDto>,
}

/// Graph node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDto {
    /// Project identifier.
    pub id: String,
    /// Display label; equals the identifier.
    pub label: String,
}

/// Graph edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDto {
    /// The declaring project.
    pub from: String,
    /// The dependency target.
    pub to: String,
}

impl From<&DependencyGraph> for GraphResponse {
    fn from(graph: &DependencyGraph) -> Self {
        Self {
            nodes: graph
                .registry()
                .iter()
                .map(|id| NodeDto {
                    id: id.to_string(),
                    label: id.to_string(),
                })
                .collect(),
            edges: graph
                .edges()
                .into_iter()
                .map(|e| EdgeDto {
                    from: e.from.to_string(),
                    to: e.to.to_string(),
                })
                .collect(),
        }
    }
}

/// Acknowledgement for mutating operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    /// Always true; failures use [`ErrorResponse`] instead.
    pub success: bool,
}

/// Error payload: `{ "error": message }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl ErrorResponse {
    /// Create an error response.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!(error = %self.error, "request error");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

/// Service health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status string.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Wire schema version.
    pub schema_version: String,
    /// Number of connected event subscribers.
    pub subscriber_count: usize,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    /// Always "alive" while the process runs.
    pub status: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Read the persisted focus selection.
async fn get_config_handler(State(state): State<ServiceState>) -> Json<FocusConfig> {
    Json(state.config_store.load())
}

/// Replace the persisted focus selection in full.
async fn post_config_handler(
    State(state): State<ServiceState>,
    Json(body): Json<FocusConfig>,
) -> Result<Json<AckResponse>, ErrorResponse> {
    // Re-normalize: wire payloads may carry duplicate focused identifiers
    let config = FocusConfig::new(body.focused_projects, body.downstream_hops);
    state
        .config_store
        .save(&config)
        .map_err(|e| ErrorResponse::new(e.to_string()))?;
    Ok(Json(AckResponse { success: true }))
}

/// Build and return the current dependency graph.
async fn get_graph_handler(
    State(state): State<ServiceState>,
) -> Result<Json<GraphResponse>, ErrorResponse> {
    let graph = GraphBuilder::new(&state.workspace)
        .build()
        .map_err(|e| ErrorResponse::new(e.to_string()))?;
    Ok(Json(GraphResponse::from(&graph)))
}

/// Write the IDE exclusion descriptor from the current selection.
async fn apply_idea_handler(
    State(state): State<ServiceState>,
) -> Result<Json<AckResponse>, ErrorResponse> {
    let graph = GraphBuilder::new(&state.workspace)
        .build()
        .map_err(|e| ErrorResponse::new(e.to_string()))?;

    let config = state.config_store.load();
    let included = reach::included_set(&graph, &config);
    let excluded = reach::excluded_set(&graph, &included);

    descriptor::write_exclusions(&state.workspace.descriptor_path(), &excluded)
        .map_err(|e| ErrorResponse::new(e.to_string()))?;

    tracing::info!(
        included = included.len(),
        excluded = excluded.len(),
        "wrote IDE exclusion descriptor"
    );
    Ok(Json(AckResponse { success: true }))
}

/// Stream change events to the client.
///
/// Each connection is its own bus subscription; disconnecting drops the
/// receiver and the registry entry is pruned on the next publish. Events
/// missed while disconnected are not replayed.
async fn events_handler(
    State(state): State<ServiceState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let subscriber = state.bus.subscribe();
    let stream = ReceiverStream::new(subscriber.receiver)
        .map(|notification| Event::default().event("change").json_data(&notification));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Health check endpoint.
async fn health_handler(State(state): State<ServiceState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: crate::FOCUS_KERNEL_SCHEMA_VERSION.to_string(),
        subscriber_count: state.bus.subscriber_count(),
    })
}

/// Liveness probe endpoint.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the focus service.
pub fn create_router(state: ServiceState) -> Router {
    Router::new()
        // Focus selection
        .route("/api/config", get(get_config_handler).post(post_config_handler))
        // Dependency graph
        .route("/api/graph", get(get_graph_handler))
        // IDE descriptor generation
        .route("/api/apply-idea", post(apply_idea_handler))
        // Pushed change events
        .route("/api/events", get(events_handler))
        // Health checks
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .with_state(state)
}
