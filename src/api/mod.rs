pub mod error;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;
use crate::market::{JobId, NewJob, NewProposal, ProposalId, SharedStore, StatusUpdate, Store};

pub use error::ApiError;

#[derive(Clone)]
pub struct ApiState {
    pub store: SharedStore,
}

impl ApiState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        let store = if config.seed {
            Store::seeded()
        } else {
            Store::new()
        };
        Self::new(store.into_shared())
    }
}

/// Acknowledgement and error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/jobs", get(list_jobs_handler).post(create_job_handler))
        .route(
            "/jobs/{id}",
            patch(update_job_handler).delete(delete_job_handler),
        )
        .route("/profiles", get(list_profiles_handler))
        .route("/proposals", post(create_proposal_handler))
        .route(
            "/proposals/{id}",
            get(list_proposals_handler).delete(delete_proposal_handler),
        )
        .route("/proposals/by-id/{id}", get(get_proposal_handler))
        .layer(cors)
        .with_state(state)
}

/// Serve the API on an already bound listener until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    state: ApiState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

/// Bind `config.listen_addr` and serve until `shutdown` is cancelled.
pub async fn run_api(config: &ServerConfig, shutdown: CancellationToken) -> std::io::Result<()> {
    let state = ApiState::from_config(config);

    let listener = match TcpListener::bind(config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.listen_addr, error = %e, "Failed to bind API server");
            return Err(e);
        }
    };

    tracing::info!(addr = %config.listen_addr, seeded = config.seed, "Server running");
    serve(listener, state, shutdown).await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn list_jobs_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let store = state.store.read().await;
    let jobs: Vec<_> = store.list_jobs().into_iter().cloned().collect();
    Json(jobs)
}

async fn list_profiles_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let store = state.store.read().await;
    let profiles: Vec<_> = store.list_profiles().into_iter().cloned().collect();
    Json(profiles)
}

async fn create_job_handler(
    State(state): State<ApiState>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(fields) = payload?;
    let job = state.store.write().await.create_job(fields);
    tracing::info!(job_id = %job.id, title = %job.title, "Job created");
    Ok((StatusCode::CREATED, Json(job)))
}

async fn update_job_handler(
    State(state): State<ApiState>,
    id: Result<Path<JobId>, PathRejection>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let Json(update) = payload?;

    match state.store.write().await.update_job_status(id, update.status) {
        Ok(job) => {
            tracing::info!(job_id = %id, status = %job.status, "Job status updated");
            Ok(Json(job))
        }
        Err(e) => {
            tracing::warn!(job_id = %id, "Status update for unknown job");
            Err(e.into())
        }
    }
}

async fn delete_job_handler(
    State(state): State<ApiState>,
    id: Result<Path<JobId>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let removed = state.store.write().await.delete_job(id);
    tracing::info!(job_id = %id, removed, "Job deleted");
    Ok(Json(Message::new("Job deleted")))
}

async fn create_proposal_handler(
    State(state): State<ApiState>,
    payload: Result<Json<NewProposal>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(fields) = payload?;
    let proposal = state.store.write().await.create_proposal(fields);
    tracing::info!(
        proposal_id = %proposal.id,
        job_id = %proposal.job_id,
        freelancer = %proposal.freelancer_name,
        "New proposal added"
    );
    Ok((StatusCode::CREATED, Json(proposal)))
}

async fn list_proposals_handler(
    State(state): State<ApiState>,
    job_id: Result<Path<JobId>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(job_id) = job_id?;
    let store = state.store.read().await;
    let found: Vec<_> = store
        .proposals_for_job(job_id)
        .into_iter()
        .cloned()
        .collect();
    tracing::info!(job_id = %job_id, found = found.len(), "Fetching proposals");
    Ok(Json(found))
}

async fn get_proposal_handler(
    State(state): State<ApiState>,
    id: Result<Path<ProposalId>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let store = state.store.read().await;
    let proposal = store.get_proposal(id)?.clone();
    Ok(Json(proposal))
}

async fn delete_proposal_handler(
    State(state): State<ApiState>,
    id: Result<Path<ProposalId>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let removed = state.store.write().await.delete_proposal(id);
    tracing::info!(proposal_id = %id, removed, "Proposal removed");
    Ok(Json(Message::new("Proposal removed")))
}
