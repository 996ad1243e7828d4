mod config;
mod errors;
mod estimate;
mod market;
mod models;
mod report;
mod risk;
mod server;
mod state;

use crate::errors::{CalcError, CalcResult};
use crate::estimate::EstimateRequest;
use crate::market::presets::PresetBook;
use crate::state::*;
use portable_atomic::Ordering;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("option_sizer starting");

    // Load config
    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let presets = match PresetBook::load(cfg.presets_path.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("preset load error: {e}");
            std::process::exit(1);
        }
    };

    // Create bounded channel
    let (engine_tx, engine_rx) = mpsc::channel::<EngineEvent>(64);

    // Create shared state
    let app_state = AppState::new(cfg.clone(), presets, engine_tx.clone());

    // ── Spawn tasks ──

    // 1. Engine task (serialises recomputation on input changes)
    let engine_state = app_state.clone();
    tokio::spawn(async move {
        run_engine(engine_state, engine_rx).await;
    });

    // 2. Start on the configured ticker, else the first watchlist entry
    let initial = cfg
        .initial_ticker
        .clone()
        .or_else(|| app_state.presets.first().map(|p| p.ticker.clone()));
    if let Some(ticker) = initial {
        if engine_tx.send(EngineEvent::PresetSelected { ticker }).await.is_err() {
            tracing::error!("engine channel closed before startup");
        }
    }

    // 3. Axum HTTP + WS server
    let app = server::build_router(app_state.clone());

    let addr = format!("0.0.0.0:{}", cfg.server_port);
    tracing::info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    let shutdown_tx = engine_tx.clone();
    let shutdown = async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("ctrl-c received");
        let _ = shutdown_tx.send(EngineEvent::Shutdown).await;
    };

    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
        tracing::error!("server error: {e}");
    }
}

/// Core engine loop. Each event is evaluated to completion before the next.
/// The active inputs are owned here; no locks.
async fn run_engine(state: Arc<AppState>, mut rx: mpsc::Receiver<EngineEvent>) {
    tracing::info!("engine task started");

    let mut active = EstimateRequest::default();
    let mut revision: u64 = 0;

    while let Some(event) = rx.recv().await {
        if matches!(event, EngineEvent::Shutdown) {
            tracing::info!("shutdown event received");
            break;
        }

        if let Err(e) = process_event(event, &mut active, &mut revision, &state) {
            tracing::warn!(error = %e, "engine event rejected");
            state.counters.errors_recovered.fetch_add(1, Ordering::Relaxed);
        }
    }

    tracing::info!("engine task shutting down");
}

fn process_event(
    event: EngineEvent,
    active: &mut EstimateRequest,
    revision: &mut u64,
    state: &Arc<AppState>,
) -> CalcResult<()> {
    match event {
        EngineEvent::InputsChanged(request) => {
            *active = *request;
        }

        EngineEvent::PresetSelected { ticker } => {
            let preset = state
                .presets
                .get(&ticker)
                .ok_or_else(|| CalcError::InvalidInput(format!("unknown ticker: {ticker}")))?;

            tracing::info!(ticker = %preset.ticker, "preset applied");
            *active = EstimateRequest::from(preset);
            state.counters.presets_applied.fetch_add(1, Ordering::Relaxed);
            state.broadcast(WsMessage::PresetApplied {
                ticker: preset.ticker.clone(),
                name: preset.name.clone(),
            });
        }

        EngineEvent::Shutdown => return Ok(()),
    }

    publish(active, revision, state);
    Ok(())
}

/// Evaluate the active inputs and push the snapshot to watchers and WS clients.
fn publish(active: &EstimateRequest, revision: &mut u64, state: &Arc<AppState>) {
    *revision += 1;
    let estimate = state.estimate(active);

    match &estimate.result {
        Some(r) => tracing::debug!(
            revision = *revision,
            delta = r.pricing.delta,
            price = r.pricing.price,
            contracts = ?r.sizing.contracts_used,
            "estimate updated"
        ),
        None => tracing::debug!(revision = *revision, "estimate updated without result"),
    }

    let snapshot = Snapshot {
        revision: *revision,
        updated_at: chrono::Utc::now().to_rfc3339(),
        inputs: active.clone(),
        estimate,
    };
    let _ = state.snapshot_tx.send(snapshot.clone());
    state.broadcast(WsMessage::Estimate(Box::new(snapshot)));
}
