//! Delta-based contract sizing.
//!
//! Profit from a move is approximated linearly:
//!
//!   profit = delta * 100 * contracts * move
//!
//! Forward sizing holds the move fixed and solves for contracts (rounded up so
//! the target is never undershot). The reverse view holds contracts fixed and
//! solves for the move needed to reach the target.
//!
//! Every output field degrades to None on its own; sizing never fails.

use crate::models::PricingResult;
use crate::risk::downside;

/// Shares per standard equity option contract.
pub const SHARES_PER_CONTRACT: f64 = 100.0;

/// Caller-supplied sizing objective. All fields optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SizingInputs {
    /// Expected favorable price move in dollars (signed).
    pub assumed_move: Option<f64>,
    /// Target profit in dollars; negative values are clamped to 0.
    pub target_profit: Option<f64>,
    /// Manual contract count; zero or negative is treated as absent.
    pub contract_override: Option<i64>,
}

/// Sizing result. Stack-allocated.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SizingResult {
    pub per_contract_pnl: Option<f64>,
    pub auto_contracts: Option<u64>,
    pub contracts_used: Option<u64>,
    pub required_move: Option<f64>,
    pub total_cost: Option<f64>,
    pub override_used: bool,
    pub downside_loss: Option<f64>,
    pub downside_move: Option<f64>,
}

/// Which side of the linear profit relation is held fixed.
#[derive(Debug, Clone, Copy)]
enum Held {
    Move(f64),
    Contracts(u64),
}

/// Solve `target = delta * 100 * contracts * move` for the free variable.
/// None when the held exposure is zero or the ratio is not finite.
#[inline]
fn solve_exposure(delta: f64, target: f64, held: Held) -> Option<f64> {
    let held_value = match held {
        Held::Move(m) => m,
        Held::Contracts(n) => n as f64,
    };
    let exposure = delta * SHARES_PER_CONTRACT * held_value;
    if exposure == 0.0 || !exposure.is_finite() {
        return None;
    }
    finite(target / exposure)
}

#[inline]
fn finite(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

/// Size a position from a pricing result and a sizing objective.
/// Pure function: deterministic from inputs.
pub fn size_position(pricing: &PricingResult, inputs: &SizingInputs) -> SizingResult {
    let delta = pricing.delta;
    let assumed_move = inputs.assumed_move.filter(|m| m.is_finite());

    let per_contract_pnl = assumed_move.and_then(|m| finite(delta * SHARES_PER_CONTRACT * m));

    let target_profit = inputs.target_profit.filter(|t| t.is_finite()).unwrap_or(0.0).max(0.0);

    // Round up so auto-sized positions meet or exceed the target.
    let auto_contracts = match (per_contract_pnl, assumed_move) {
        (Some(pnl), Some(m)) if pnl > 0.0 => solve_exposure(delta, target_profit, Held::Move(m))
            .map(f64::ceil)
            .filter(|n| *n >= 1.0 && *n <= u64::MAX as f64)
            .map(|n| n as u64),
        _ => None,
    };

    let override_contracts = inputs.contract_override.filter(|n| *n > 0).map(|n| n as u64);
    let override_used = override_contracts.is_some();
    let contracts_used = override_contracts.or(auto_contracts);

    let required_move = contracts_used
        .and_then(|n| solve_exposure(delta, target_profit, Held::Contracts(n)));

    let total_cost = contracts_used
        .and_then(|n| finite(n as f64 * pricing.price * SHARES_PER_CONTRACT));

    let downside_move = assumed_move.and_then(downside::downside_move);
    let downside_loss = downside::downside_loss(delta, assumed_move, contracts_used);

    SizingResult {
        per_contract_pnl,
        auto_contracts,
        contracts_used,
        required_move,
        total_cost,
        override_used,
        downside_loss,
        downside_move,
    }
}
