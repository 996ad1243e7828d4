use crate::models::PricingResult;
use crate::risk::downside;
use crate::risk::sizing::SizingResult;

/// Shown in place of any absent output field.
pub const PLACEHOLDER: &str = "—";

pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{value:.decimals$}")
}

/// "$12.34" / "-$12.34"
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let abs = value.abs();
    if value < 0.0 {
        format!("-${abs:.2}")
    } else {
        format!("${abs:.2}")
    }
}

fn currency_or_placeholder(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), format_currency)
}

/// Formatted output fields, one string per result cell.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DisplayFields {
    pub delta: String,
    pub option_price: String,
    pub per_contract: String,
    pub contracts: String,
    pub total_cost: String,
    pub required_move: String,
    pub loss_value: String,
}

impl DisplayFields {
    pub fn placeholder() -> Self {
        Self {
            delta: PLACEHOLDER.to_string(),
            option_price: PLACEHOLDER.to_string(),
            per_contract: PLACEHOLDER.to_string(),
            contracts: PLACEHOLDER.to_string(),
            total_cost: PLACEHOLDER.to_string(),
            required_move: PLACEHOLDER.to_string(),
            loss_value: PLACEHOLDER.to_string(),
        }
    }

    pub fn from_result(
        pricing: &PricingResult,
        sizing: &SizingResult,
        stock_move: Option<f64>,
    ) -> Self {
        // Zero P&L and zero cost read as "nothing to show"
        let per_contract = sizing.per_contract_pnl.filter(|v| *v != 0.0);
        let total_cost = sizing.total_cost.filter(|v| *v != 0.0);

        let contracts = sizing
            .contracts_used
            .or(sizing.auto_contracts)
            .map_or_else(|| PLACEHOLDER.to_string(), |n| n.to_string());

        let adverse = stock_move.and_then(downside::downside_move);
        let loss_value = match (adverse, sizing.downside_loss) {
            (None, _) | (Some(_), None) => PLACEHOLDER.to_string(),
            (Some(_), Some(loss)) if loss == 0.0 => format_currency(0.0),
            (Some(_), Some(loss)) => format_currency(-loss),
        };

        Self {
            delta: format_number(pricing.delta, 3),
            option_price: format_currency(pricing.price),
            per_contract: currency_or_placeholder(per_contract),
            contracts,
            total_cost: currency_or_placeholder(total_cost),
            required_move: currency_or_placeholder(sizing.required_move),
            loss_value,
        }
    }
}
