use crate::errors::CalcError;
use crate::estimate::{EstimateRequest, EstimateResponse};
use crate::state::{AppState, EngineEvent, Snapshot};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;

fn unknown_ticker(ticker: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("unknown ticker: {ticker}") })),
    )
        .into_response()
}

async fn send_event(state: &AppState, event: EngineEvent) -> Response {
    state.counters.input_events.fetch_add(1, portable_atomic::Ordering::Relaxed);
    match state.engine_tx.send(event).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "status": "accepted" })),
        )
            .into_response(),
        Err(e) => {
            let err = CalcError::ChannelClosed(e.to_string());
            tracing::error!(error = %err, "engine unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

/// POST /api/estimate -- stateless evaluation of the posted inputs
pub async fn post_estimate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EstimateRequest>,
) -> Json<EstimateResponse> {
    Json(state.estimate(&request))
}

/// GET /api/presets -- the watchlist
pub async fn get_presets(
    State(state): State<Arc<AppState>>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "presets": state.presets.all() }))
}

/// GET /api/presets/{ticker} -- one preset and its evaluation
pub async fn get_preset(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Response {
    let Some(preset) = state.presets.get(&ticker) else {
        return unknown_ticker(&ticker);
    };
    let estimate = state.estimate(&EstimateRequest::from(preset));
    Json(serde_json::json!({ "preset": preset, "estimate": estimate })).into_response()
}

/// POST /api/presets/{ticker}/apply -- make a preset the active inputs
pub async fn apply_preset(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Response {
    if state.presets.get(&ticker).is_none() {
        return unknown_ticker(&ticker);
    }
    send_event(&state, EngineEvent::PresetSelected { ticker }).await
}

/// PUT /api/inputs -- replace the active inputs
pub async fn put_inputs(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EstimateRequest>,
) -> Response {
    send_event(&state, EngineEvent::InputsChanged(Box::new(request))).await
}

/// GET /api/state -- latest snapshot (from watch channel, no lock)
pub async fn get_state(
    State(state): State<Arc<AppState>>,
) -> Json<Snapshot> {
    let snapshot = state.snapshot_rx.borrow().clone();
    Json(snapshot)
}

/// GET /api/counters -- performance counters (lock-free reads)
pub async fn get_counters(
    State(state): State<Arc<AppState>>,
) -> Json<serde_json::Value> {
    use portable_atomic::Ordering::Relaxed;
    Json(serde_json::json!({
        "estimates_computed": state.counters.estimates_computed.load(Relaxed),
        "invalid_inputs": state.counters.invalid_inputs.load(Relaxed),
        "input_events": state.counters.input_events.load(Relaxed),
        "presets_applied": state.counters.presets_applied.load(Relaxed),
        "errors_recovered": state.counters.errors_recovered.load(Relaxed),
        "ws_messages_sent": state.counters.ws_messages_sent.load(Relaxed),
    }))
}
