pub mod black_scholes;
pub mod normal;

use crate::errors::{CalcError, CalcResult};

/// All pricing models implement this trait.
/// evaluate() must be a pure function: deterministic output from inputs only.
/// Send + Sync required for sharing across tokio tasks.
pub trait PricingModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Price the option and compute its delta.
    /// Returns InvalidInput when a market parameter is non-positive. Never panics.
    fn evaluate(&self, inputs: &MarketInputs) -> CalcResult<PricingResult>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    #[default]
    Call,
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// Market and contract parameters for one evaluation.
/// Vol and rate are in percentage points (32.0 = 32%).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarketInputs {
    pub stock_price: f64,
    pub strike_price: f64,
    pub days_to_expiration: f64,
    pub implied_vol: f64,
    pub risk_free_rate: f64,
    pub option_type: OptionType,
}

impl MarketInputs {
    /// Reject any non-positive or non-finite required parameter.
    /// The rate may be zero or negative but must be finite.
    pub fn validate(&self) -> CalcResult<()> {
        let required = [
            ("stock_price", self.stock_price),
            ("strike_price", self.strike_price),
            ("implied_vol", self.implied_vol),
            ("days_to_expiration", self.days_to_expiration),
        ];
        for (field, value) in required {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::InvalidInput(format!(
                    "{field} must be positive, got {value}"
                )));
            }
        }
        if !self.risk_free_rate.is_finite() {
            return Err(CalcError::InvalidInput(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        Ok(())
    }
}

/// Theoretical premium per share and delta.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PricingResult {
    pub delta: f64,
    pub price: f64,
}

/// Entry point used by the estimate layer: Black-Scholes evaluation.
#[inline]
pub fn evaluate_pricing(inputs: &MarketInputs) -> CalcResult<PricingResult> {
    black_scholes::BlackScholes.evaluate(inputs)
}
