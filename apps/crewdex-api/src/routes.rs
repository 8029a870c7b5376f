use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use time::OffsetDateTime;

use crewdex_service::{
	CandidatesRequest, CandidatesResponse, ScoreRequest, ScoreResponse, ServiceError,
	TaxonomyReport,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search/candidates", post(search_candidates))
		.route("/v1/search/score", post(search_score))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/taxonomies/{taxonomy}", get(taxonomy_report))
		.route("/v1/admin/snapshot", get(snapshot_report))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search_candidates(
	State(state): State<AppState>,
	Json(payload): Json<CandidatesRequest>,
) -> Result<Json<CandidatesResponse>, ApiError> {
	let service = state.service.clone();
	// The pipeline is synchronous; keep it off the runtime's I/O threads.
	let response = tokio::task::spawn_blocking(move || service.candidates(payload))
		.await
		.map_err(task_failure)??;

	Ok(Json(response))
}

async fn search_score(
	State(state): State<AppState>,
	Json(payload): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
	let service = state.service.clone();
	let response = tokio::task::spawn_blocking(move || service.score_candidates(payload))
		.await
		.map_err(task_failure)??;

	Ok(Json(response))
}

async fn taxonomy_report(
	State(state): State<AppState>,
	Path(taxonomy): Path<String>,
) -> Result<Json<TaxonomyReport>, ApiError> {
	match state.service.taxonomy_report(&taxonomy)? {
		Some(report) => Ok(Json(report)),
		None => Err(json_error(
			StatusCode::NOT_FOUND,
			"unknown_taxonomy",
			format!("No taxonomy named {taxonomy}."),
			None,
		)),
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotReport {
	profiles: usize,
	credits: usize,
	#[serde(with = "time::serde::rfc3339::option")]
	generated_at: Option<OffsetDateTime>,
}

async fn snapshot_report(State(state): State<AppState>) -> Json<SnapshotReport> {
	Json(SnapshotReport {
		profiles: state.store.profile_count(),
		credits: state.store.credit_count(),
		generated_at: state.store.generated_at(),
	})
}

fn task_failure(err: tokio::task::JoinError) -> ApiError {
	json_error(
		StatusCode::INTERNAL_SERVER_ERROR,
		"internal",
		format!("Search task failed: {err}."),
		None,
	)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self {
			status,
			error_code: error_code.into(),
			message: message.into(),
			fields,
		}
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidFilter { fields } => json_error(
				StatusCode::UNPROCESSABLE_ENTITY,
				"invalid_filter",
				"Unknown or malformed term ids in the filter set.",
				Some(fields),
			),
			ServiceError::Collaborator { message } => {
				json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", message, None)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code,
			message: self.message,
			fields: self.fields,
		};
		(self.status, Json(body)).into_response()
	}
}
