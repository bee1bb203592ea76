// Copyright 2026 The OmniCare Project
// SPDX-License-Identifier: Apache-2.0

// HTTP surface of the relay.
//
// Responsibilities:
// - Route POST /analyze and POST /analyze-stream, plus a heartbeat
// - Gate every request behind consent validation before any upstream call
// - Map pre-flight failures to 400 and pre-stream upstream failures to 500
// - Relay token streams to the client one fragment per body frame, so
//   each token is flushed to the transport as it arrives

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use tokio_stream::StreamExt;
use uuid::Uuid;

use crate::consent::{self, ConsentViolation};
use crate::query::{AnalysisResult, MedicalQuery};
use crate::stream::StreamContext;
use crate::upstream::{EngineClient, UpstreamError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures that can still be reported with a status code. Anything that
/// happens after the first token is written is not representable here;
/// the stream is truncated and the failure lives only in the logs.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Rejected(#[from] ConsentViolation),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, public_message) = match &self {
            // Rejection reasons are written for the caller; upstream
            // detail stays in the logs.
            RelayError::Rejected(violation) => (StatusCode::BAD_REQUEST, violation.to_string()),
            RelayError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error while processing the medical analysis".to_string(),
            ),
        };
        (status, public_message).into_response()
    }
}

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state injected into axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: EngineClient,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Heartbeat endpoint: GET /heartbeat -> 200 OK
pub async fn heartbeat() -> StatusCode {
    StatusCode::OK
}

/// Buffered analysis: validate, forward, return the engine's result as
/// JSON unchanged.
pub async fn analyze(
    State(state): State<AppState>,
    Json(query): Json<MedicalQuery>,
) -> Result<Json<AnalysisResult>, RelayError> {
    let request_id = Uuid::new_v4().to_string();

    if let Err(violation) = consent::validate(&query) {
        tracing::warn!(
            request_id = %request_id,
            patient_id = %query.patient_id,
            reason = %violation,
            "query rejected before any upstream call"
        );
        return Err(violation.into());
    }

    tracing::info!(
        request_id = %request_id,
        patient_id = %query.patient_id,
        urgency_level = query.urgency_level,
        "forwarding case to the analysis engine"
    );

    match state.engine.analyze(&query).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                patient_id = %query.patient_id,
                error = %e,
                "analysis engine call failed"
            );
            Err(e.into())
        }
    }
}

/// Streaming analysis: validate, open the token stream, then relay each
/// fragment as its own body frame.
///
/// The status code is committed when the first byte goes out. Everything
/// up to and including opening the upstream stream can still fail with a
/// 400 or 500; once tokens flow, the only failure mode left is an early
/// end of body.
pub async fn analyze_stream(
    State(state): State<AppState>,
    Json(query): Json<MedicalQuery>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();

    if let Err(violation) = consent::validate(&query) {
        tracing::warn!(
            request_id = %request_id,
            patient_id = %query.patient_id,
            reason = %violation,
            "query rejected before any upstream call"
        );
        return RelayError::from(violation).into_response();
    }

    let ctx = StreamContext {
        request_id: request_id.clone(),
        patient_id: query.patient_id.clone(),
    };

    match state.engine.analyze_stream(&query, ctx).await {
        Ok(tokens) => {
            tracing::info!(
                request_id = %request_id,
                patient_id = %query.patient_id,
                "token stream opened"
            );

            // One token per frame: the transport flushes each frame as it
            // is produced, so the client observes generation progress
            // rather than a transport-granularity burst at the end.
            let body =
                Body::from_stream(tokens.map(|token| Ok::<_, Infallible>(Bytes::from(token))));

            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                patient_id = %query.patient_id,
                error = %e,
                "analysis engine refused the stream"
            );
            RelayError::from(e).into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Router construction
// ---------------------------------------------------------------------------

/// Build the axum router with both analysis routes and the heartbeat.
pub fn build_router(engine: EngineClient) -> Router {
    let state = AppState { engine };

    Router::new()
        .route("/analyze", post(analyze))
        .route("/analyze-stream", post(analyze_stream))
        .route("/heartbeat", get(heartbeat))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
