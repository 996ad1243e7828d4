use crate::config::AppConfig;
use crate::estimate::{self, EstimateContext, EstimateRequest, EstimateResponse};
use crate::market::presets::PresetBook;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

// ── Messages INTO the engine (bounded channel) ──

#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Replace the active inputs and recompute.
    InputsChanged(Box<EstimateRequest>),
    /// Load a watchlist preset as the active inputs and recompute.
    PresetSelected { ticker: String },
    Shutdown,
}

// ── Messages OUT of the engine ──

#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type")]
pub enum WsMessage {
    #[serde(rename = "estimate")]
    Estimate(Box<Snapshot>),

    #[serde(rename = "preset_applied")]
    PresetApplied { ticker: String, name: String },
}

// ── Latest evaluation for dashboards (sent via watch channel) ──

/// The active inputs and their evaluation. Caller-side cache only;
/// never read back by the pricing or sizing code.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Snapshot {
    pub revision: u64,
    pub updated_at: String,
    pub inputs: EstimateRequest,
    pub estimate: EstimateResponse,
}

// ── Performance Counters (lock-free) ──

pub struct PerfCounters {
    pub estimates_computed: AtomicU64,
    pub invalid_inputs: AtomicU64,
    pub input_events: AtomicU64,
    pub presets_applied: AtomicU64,
    pub errors_recovered: AtomicU64,
    pub ws_messages_sent: AtomicU64,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            estimates_computed: AtomicU64::new(0),
            invalid_inputs: AtomicU64::new(0),
            input_events: AtomicU64::new(0),
            presets_applied: AtomicU64::new(0),
            errors_recovered: AtomicU64::new(0),
            ws_messages_sent: AtomicU64::new(0),
        }
    }
}

// ── Application shared state (channels, not locks) ──

pub struct AppState {
    pub config: AppConfig,
    pub presets: PresetBook,

    // Engine -> Dashboard: latest snapshot (watch = single producer, multi consumer)
    pub snapshot_tx: watch::Sender<Snapshot>,
    pub snapshot_rx: watch::Receiver<Snapshot>,

    // Engine -> Dashboard: event stream (broadcast for WS clients)
    pub ws_tx: broadcast::Sender<WsMessage>,

    // Routes -> Engine: bounded event channel
    pub engine_tx: mpsc::Sender<EngineEvent>,

    // Lock-free performance counters
    pub counters: PerfCounters,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        presets: PresetBook,
        engine_tx: mpsc::Sender<EngineEvent>,
    ) -> Arc<Self> {
        let (ws_tx, _) = broadcast::channel(256);

        let inputs = EstimateRequest::default();
        let ctx = context_for(&config);
        let initial = Snapshot {
            revision: 0,
            updated_at: String::new(),
            estimate: estimate::run_estimate(&inputs, &ctx, &presets),
            inputs,
        };
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        Arc::new(Self {
            config,
            presets,
            snapshot_tx,
            snapshot_rx,
            ws_tx,
            engine_tx,
            counters: PerfCounters::new(),
        })
    }

    pub fn context(&self) -> EstimateContext {
        context_for(&self.config)
    }

    /// Run one evaluation and count it. Stateless.
    pub fn estimate(&self, request: &EstimateRequest) -> EstimateResponse {
        let response = estimate::run_estimate(request, &self.context(), &self.presets);
        self.counters.estimates_computed.fetch_add(1, Ordering::Relaxed);
        if response.result.is_none() {
            self.counters.invalid_inputs.fetch_add(1, Ordering::Relaxed);
        }
        response
    }

    #[inline]
    pub fn broadcast(&self, msg: WsMessage) {
        self.counters.ws_messages_sent.fetch_add(1, Ordering::Relaxed);
        let _ = self.ws_tx.send(msg);
    }
}

fn context_for(config: &AppConfig) -> EstimateContext {
    EstimateContext {
        default_risk_free_rate: config.default_risk_free_rate,
        strike_step: config.strike_step,
        today: chrono::Utc::now().date_naive(),
    }
}
