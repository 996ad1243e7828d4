use crate::errors::{CalcError, CalcResult};
use crate::models::OptionType;
use std::path::Path;

/// One watchlist entry with the calculator's default parameters for it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StockPreset {
    pub ticker: String,
    pub name: String,
    pub stock_price: f64,
    pub stock_move: f64,
    #[serde(default)]
    pub option_type: OptionType,
    pub strike_price: f64,
    pub days_to_expiration: f64,
    pub implied_vol: f64,
    #[serde(default = "default_rate")]
    pub risk_free_rate: f64,
    #[serde(default)]
    pub target_profit: f64,
    #[serde(default)]
    pub contract_override: Option<f64>,
}

fn default_rate() -> f64 {
    3.0
}

/// Ordered watchlist. Lookups are case-insensitive on ticker.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PresetBook {
    presets: Vec<StockPreset>,
}

impl PresetBook {
    pub fn new(presets: Vec<StockPreset>) -> Self {
        Self { presets }
    }

    /// Load from a JSON array file, or fall back to the built-in watchlist.
    pub fn load(path: Option<&Path>) -> CalcResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)?;
        let presets: Vec<StockPreset> = serde_json::from_str(&raw)?;
        if presets.is_empty() {
            return Err(CalcError::Config(format!(
                "preset file {} contains no presets",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), count = presets.len(), "presets loaded");
        Ok(Self::new(presets))
    }

    pub fn all(&self) -> &[StockPreset] {
        &self.presets
    }

    pub fn first(&self) -> Option<&StockPreset> {
        self.presets.first()
    }

    pub fn get(&self, ticker: &str) -> Option<&StockPreset> {
        let ticker = ticker.trim();
        self.presets
            .iter()
            .find(|p| p.ticker.eq_ignore_ascii_case(ticker))
    }

    /// "Apple Inc. (AAPL)" for a known ticker, the raw ticker otherwise,
    /// "Custom" when no ticker is entered.
    pub fn label(&self, ticker: Option<&str>) -> String {
        match ticker.map(str::trim).filter(|t| !t.is_empty()) {
            None => "Custom".to_string(),
            Some(t) => match self.get(t) {
                Some(p) => format!("{} ({})", p.name, p.ticker),
                None => t.to_string(),
            },
        }
    }
}

impl Default for PresetBook {
    fn default() -> Self {
        Self::new(default_presets())
    }
}

pub fn default_presets() -> Vec<StockPreset> {
    let preset = |ticker: &str, name: &str, price: f64, mv: f64, strike: f64, days: f64, vol: f64| {
        StockPreset {
            ticker: ticker.to_string(),
            name: name.to_string(),
            stock_price: price,
            stock_move: mv,
            option_type: OptionType::Call,
            strike_price: strike,
            days_to_expiration: days,
            implied_vol: vol,
            risk_free_rate: 3.0,
            target_profit: 1000.0,
            contract_override: None,
        }
    };

    vec![
        preset("AAPL", "Apple Inc.", 192.15, 2.0, 195.0, 30.0, 32.0),
        preset("MSFT", "Microsoft Corp.", 415.39, 3.5, 420.0, 35.0, 28.0),
        preset("TSLA", "Tesla Inc.", 235.27, 5.0, 240.0, 25.0, 55.0),
        preset("NVDA", "NVIDIA Corp.", 1185.5, 40.0, 1200.0, 40.0, 48.0),
        preset("SPY", "SPDR S&P 500 ETF", 553.8, 5.0, 555.0, 20.0, 20.0),
    ]
}
