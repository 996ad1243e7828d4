//! Caller-side control flow around the core:
//!
//!   raw request -> defaults -> MarketInputs / SizingInputs
//!     -> evaluate_pricing -> size_position -> formatted response
//!
//! Invalid market inputs yield a response with `result: None` and every
//! display field set to the placeholder. Nothing here is cached.

use crate::errors::{CalcError, CalcResult};
use crate::market::presets::{PresetBook, StockPreset};
use crate::market::strikes::{self, StrikeLadder};
use crate::models::{self, MarketInputs, OptionType, PricingResult};
use crate::report::format::DisplayFields;
use crate::report::summary;
use crate::risk::sizing::{self, SizingInputs, SizingResult};
use chrono::NaiveDate;

/// Raw calculator inputs. Every field optional, as entered.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EstimateRequest {
    pub ticker: Option<String>,
    pub stock_price: Option<f64>,
    pub stock_move: Option<f64>,
    pub option_type: Option<OptionType>,
    pub strike_price: Option<f64>,
    pub days_to_expiration: Option<f64>,
    /// Used only when days_to_expiration is absent.
    pub expiration_date: Option<NaiveDate>,
    pub implied_vol: Option<f64>,
    pub risk_free_rate: Option<f64>,
    pub target_profit: Option<f64>,
    /// Manual contract count as entered; only a positive whole number is used.
    #[serde(deserialize_with = "deserialize_loose_number")]
    pub contract_override: Option<f64>,
}

/// Number or numeric string. Anything else reads as absent rather than
/// failing the whole request.
fn deserialize_loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<serde_json::Value> = serde::Deserialize::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A finite, positive, whole override becomes a contract count.
fn whole_contracts(n: f64) -> Option<i64> {
    (n.is_finite() && n >= 1.0 && n.fract() == 0.0 && n <= i64::MAX as f64).then_some(n as i64)
}

/// Caller defaults applied before the core runs.
#[derive(Debug, Clone, Copy)]
pub struct EstimateContext {
    pub default_risk_free_rate: f64,
    pub strike_step: f64,
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Estimate {
    pub inputs: MarketInputs,
    pub pricing: PricingResult,
    pub sizing: SizingResult,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct EstimateResponse {
    pub ticker_label: String,
    pub result: Option<Estimate>,
    pub display: DisplayFields,
    pub summary: String,
    pub contract_note: String,
    pub loss_caption: String,
    pub strikes: StrikeLadder,
}

impl EstimateRequest {
    pub fn option_type(&self) -> OptionType {
        self.option_type.unwrap_or_default()
    }

    pub fn target_profit(&self) -> f64 {
        self.target_profit.unwrap_or(0.0)
    }

    fn days(&self, today: NaiveDate) -> Option<f64> {
        self.days_to_expiration
            .or_else(|| self.expiration_date.map(|d| (d - today).num_days() as f64))
    }

    /// Build validated market inputs. Missing required fields are InvalidInput.
    pub fn market_inputs(&self, ctx: &EstimateContext) -> CalcResult<MarketInputs> {
        let missing = |field: &str| CalcError::InvalidInput(format!("{field} is required"));

        let inputs = MarketInputs {
            stock_price: self.stock_price.ok_or_else(|| missing("stock_price"))?,
            strike_price: self.strike_price.ok_or_else(|| missing("strike_price"))?,
            days_to_expiration: self
                .days(ctx.today)
                .ok_or_else(|| missing("days_to_expiration"))?,
            implied_vol: self.implied_vol.ok_or_else(|| missing("implied_vol"))?,
            risk_free_rate: self.risk_free_rate.unwrap_or(ctx.default_risk_free_rate),
            option_type: self.option_type(),
        };
        inputs.validate()?;
        Ok(inputs)
    }

    pub fn sizing_inputs(&self) -> SizingInputs {
        SizingInputs {
            assumed_move: self.stock_move,
            target_profit: Some(self.target_profit()),
            contract_override: self.contract_override.and_then(whole_contracts),
        }
    }
}

impl From<&StockPreset> for EstimateRequest {
    fn from(p: &StockPreset) -> Self {
        Self {
            ticker: Some(p.ticker.clone()),
            stock_price: Some(p.stock_price),
            stock_move: Some(p.stock_move),
            option_type: Some(p.option_type),
            strike_price: Some(p.strike_price),
            days_to_expiration: Some(p.days_to_expiration),
            expiration_date: None,
            implied_vol: Some(p.implied_vol),
            risk_free_rate: Some(p.risk_free_rate),
            target_profit: Some(p.target_profit),
            contract_override: p.contract_override,
        }
    }
}

/// Core evaluation only. Err means "no result".
pub fn evaluate(request: &EstimateRequest, ctx: &EstimateContext) -> CalcResult<Estimate> {
    let inputs = request.market_inputs(ctx)?;
    let pricing = models::evaluate_pricing(&inputs)?;
    let sizing = sizing::size_position(&pricing, &request.sizing_inputs());
    Ok(Estimate { inputs, pricing, sizing })
}

/// Full caller pass: evaluate, then format every output cell.
pub fn run_estimate(
    request: &EstimateRequest,
    ctx: &EstimateContext,
    presets: &PresetBook,
) -> EstimateResponse {
    let ticker_label = presets.label(request.ticker.as_deref());
    let strikes = strikes::suggest_strikes(
        request.stock_price,
        request.option_type(),
        request.strike_price,
        ctx.strike_step,
    );
    let stock_move = request.stock_move;
    let target = request.target_profit();

    match evaluate(request, ctx) {
        Ok(estimate) => EstimateResponse {
            ticker_label,
            display: DisplayFields::from_result(&estimate.pricing, &estimate.sizing, stock_move),
            summary: summary::summary(&estimate.sizing, stock_move, target),
            contract_note: summary::contract_note(&estimate.sizing, stock_move, target),
            loss_caption: summary::loss_caption(Some(&estimate.sizing), stock_move),
            result: Some(estimate),
            strikes,
        },
        Err(e) => {
            tracing::debug!(error = %e, "estimate has no result");
            EstimateResponse {
                ticker_label,
                result: None,
                display: DisplayFields::placeholder(),
                summary: summary::NO_RESULT_SUMMARY.to_string(),
                contract_note: summary::NO_RESULT_CONTRACT_NOTE.to_string(),
                loss_caption: summary::loss_caption(None, stock_move),
                strikes,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::format::PLACEHOLDER;

    fn ctx() -> EstimateContext {
        EstimateContext {
            default_risk_free_rate: 3.0,
            strike_step: 2.5,
            today: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        }
    }

    fn aapl() -> EstimateRequest {
        let book = PresetBook::default();
        EstimateRequest::from(book.get("AAPL").unwrap())
    }

    #[test]
    fn test_reference_preset_estimate() {
        let resp = run_estimate(&aapl(), &ctx(), &PresetBook::default());
        let est = resp.result.unwrap();
        assert!((est.pricing.delta - 0.465).abs() < 0.01);
        assert_eq!(est.sizing.auto_contracts, Some(11));
        assert_eq!(resp.ticker_label, "Apple Inc. (AAPL)");
        assert_eq!(resp.display.contracts, "11");
        assert_eq!(resp.display.delta, "0.465");
        assert_eq!(resp.summary, "To make $1000.00 with $2.00, you need ~11 contract(s).");
        assert_eq!(resp.strikes.len(), 6);
    }

    #[test]
    fn test_invalid_stock_price_gives_placeholders() {
        let req = EstimateRequest { stock_price: Some(0.0), ..aapl() };
        let resp = run_estimate(&req, &ctx(), &PresetBook::default());
        assert!(resp.result.is_none());
        assert_eq!(resp.display, DisplayFields::placeholder());
        assert_eq!(resp.display.delta, PLACEHOLDER);
        assert_eq!(resp.summary, summary::NO_RESULT_SUMMARY);
        assert_eq!(resp.loss_caption, "Set a move to see risk.");
        assert!(resp.strikes.is_empty());
    }

    #[test]
    fn test_missing_vol_is_invalid() {
        let req = EstimateRequest { implied_vol: None, ..aapl() };
        assert!(matches!(evaluate(&req, &ctx()), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn test_default_rate_applied() {
        let req = EstimateRequest { risk_free_rate: None, ..aapl() };
        let est = evaluate(&req, &ctx()).unwrap();
        assert_eq!(est.inputs.risk_free_rate, 3.0);
    }

    #[test]
    fn test_expiration_date_sets_days() {
        let req = EstimateRequest {
            days_to_expiration: None,
            expiration_date: NaiveDate::from_ymd_opt(2026, 2, 4),
            ..aapl()
        };
        let est = evaluate(&req, &ctx()).unwrap();
        assert_eq!(est.inputs.days_to_expiration, 30.0);
    }

    #[test]
    fn test_past_expiration_is_invalid() {
        let req = EstimateRequest {
            days_to_expiration: None,
            expiration_date: NaiveDate::from_ymd_opt(2025, 12, 31),
            ..aapl()
        };
        assert!(evaluate(&req, &ctx()).is_err());
    }

    #[test]
    fn test_override_flows_through() {
        let req = EstimateRequest { contract_override: Some(3.0), ..aapl() };
        let resp = run_estimate(&req, &ctx(), &PresetBook::default());
        let sizing = resp.result.unwrap().sizing;
        assert!(sizing.override_used);
        assert_eq!(sizing.contracts_used, Some(3));
        assert_eq!(resp.display.contracts, "3");
    }

    #[test]
    fn test_override_must_be_positive_whole_number() {
        for (raw, expected) in [
            (3.0, Some(3)),
            (2.5, None),
            (0.0, None),
            (-2.0, None),
            (f64::NAN, None),
            (f64::INFINITY, None),
        ] {
            let req = EstimateRequest { contract_override: Some(raw), ..aapl() };
            assert_eq!(req.sizing_inputs().contract_override, expected, "raw={raw}");
        }
    }

    #[test]
    fn test_loose_override_deserializes() {
        let parse = |json: &str| serde_json::from_str::<EstimateRequest>(json).unwrap();
        assert_eq!(parse(r#"{"contract_override": 3}"#).contract_override, Some(3.0));
        assert_eq!(parse(r#"{"contract_override": 2.5}"#).contract_override, Some(2.5));
        assert_eq!(parse(r#"{"contract_override": " 4 "}"#).contract_override, Some(4.0));
        assert_eq!(parse(r#"{"contract_override": "lots"}"#).contract_override, None);
        assert_eq!(parse(r#"{"contract_override": null}"#).contract_override, None);
        assert_eq!(parse(r#"{"contract_override": true}"#).contract_override, None);
        assert_eq!(parse(r#"{}"#).contract_override, None);
    }

    #[test]
    fn test_request_deserializes_partial_json() {
        let json = r#"{"stock_price": 100, "expiration_date": "2026-03-20"}"#;
        let req: EstimateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.stock_price, Some(100.0));
        assert_eq!(req.expiration_date, NaiveDate::from_ymd_opt(2026, 3, 20));
        assert_eq!(req.option_type(), OptionType::Call);
        assert_eq!(req.target_profit(), 0.0);
    }

    #[test]
    fn test_delta_only_without_move() {
        let req = EstimateRequest { stock_move: None, ..aapl() };
        let resp = run_estimate(&req, &ctx(), &PresetBook::default());
        assert!(resp.result.is_some());
        assert_eq!(resp.display.contracts, PLACEHOLDER);
        assert_eq!(resp.summary, "Delta calculated. Add a price move to estimate contracts.");
    }
}
