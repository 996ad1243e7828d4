use crate::report::format::{format_currency, format_number};
use crate::risk::downside;
use crate::risk::sizing::SizingResult;

pub const NO_RESULT_SUMMARY: &str = "Enter the required inputs to see estimates.";
pub const NO_RESULT_CONTRACT_NOTE: &str = "Provide a target and stock move to size properly.";

fn move_text(stock_move: Option<f64>, fallback: &str) -> String {
    match stock_move.filter(|m| m.is_finite()) {
        Some(m) => format!("${}", format_number(m, 2)),
        None => fallback.to_string(),
    }
}

fn profit_text(target_profit: f64) -> String {
    format!("${}", format_number(target_profit, 2))
}

/// One-sentence description of the sizing outcome.
pub fn summary(sizing: &SizingResult, stock_move: Option<f64>, target_profit: f64) -> String {
    let Some(contracts) = sizing.contracts_used else {
        return "Delta calculated. Add a price move to estimate contracts.".to_string();
    };
    let mv = move_text(stock_move, "the assumed move");
    let profit = profit_text(target_profit);

    if sizing.override_used {
        if let Some(auto) = sizing.auto_contracts {
            return format!(
                "To make {profit} with {mv}, you set {contracts} contract(s); estimated need is ~{auto}."
            );
        }
        let est_profit = sizing
            .per_contract_pnl
            .filter(|p| *p != 0.0)
            .map(|p| p * contracts as f64);
        return match est_profit {
            Some(p) => format!(
                "Using {contracts} contract(s) and {mv}, estimated profit is {}.",
                format_currency(p)
            ),
            None => format!("Using {contracts} contract(s); add a price move to see profit."),
        };
    }

    format!("To make {profit} with {mv}, you need ~{contracts} contract(s).")
}

pub fn contract_note(sizing: &SizingResult, stock_move: Option<f64>, target_profit: f64) -> String {
    if sizing.contracts_used.or(sizing.auto_contracts).is_none() {
        return "Provide target profit and expected move to size contracts.".to_string();
    }
    let mv = match stock_move.filter(|m| m.is_finite()) {
        Some(m) => format!("${} move", format_number(m, 2)),
        None => "an assumed move".to_string(),
    };
    format!("Sizing for {} target with {mv}.", profit_text(target_profit))
}

/// Caption under the downside figure. `sizing` is None when there is no result.
pub fn loss_caption(sizing: Option<&SizingResult>, stock_move: Option<f64>) -> String {
    let adverse = stock_move.and_then(downside::downside_move);
    let (Some(sizing), Some(adverse)) = (sizing, adverse) else {
        return "Set a move to see risk.".to_string();
    };
    let drop = format_number(adverse.abs(), 2);

    match sizing.downside_loss {
        None => "Need contracts to compute downside.".to_string(),
        Some(loss) if loss == 0.0 => {
            format!("A ${drop} drop does not reduce value for this setup.")
        }
        Some(_) => match sizing.contracts_used.or(sizing.auto_contracts) {
            Some(n) => format!("{n} contract(s) lose this amount if price falls ${drop}."),
            None => "Contracts not set; enter a move and target.".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(auto: Option<u64>, used: Option<u64>, override_used: bool) -> SizingResult {
        SizingResult {
            per_contract_pnl: Some(93.0),
            auto_contracts: auto,
            contracts_used: used,
            override_used,
            downside_loss: used.map(|n| 93.0 * n as f64),
            downside_move: Some(-2.0),
            ..SizingResult::default()
        }
    }

    #[test]
    fn test_auto_summary() {
        let s = summary(&sized(Some(11), Some(11), false), Some(2.0), 1000.0);
        assert_eq!(s, "To make $1000.00 with $2.00, you need ~11 contract(s).");
    }

    #[test]
    fn test_override_with_auto_summary() {
        let s = summary(&sized(Some(11), Some(3), true), Some(2.0), 1000.0);
        assert_eq!(
            s,
            "To make $1000.00 with $2.00, you set 3 contract(s); estimated need is ~11."
        );
    }

    #[test]
    fn test_override_without_auto_summary() {
        let s = summary(&sized(None, Some(3), true), Some(2.0), 0.0);
        assert_eq!(s, "Using 3 contract(s) and $2.00, estimated profit is $279.00.");

        let no_move = SizingResult {
            contracts_used: Some(3),
            override_used: true,
            ..SizingResult::default()
        };
        assert_eq!(
            summary(&no_move, None, 0.0),
            "Using 3 contract(s); add a price move to see profit."
        );
    }

    #[test]
    fn test_no_contracts_summary() {
        let s = summary(&SizingResult::default(), None, 1000.0);
        assert_eq!(s, "Delta calculated. Add a price move to estimate contracts.");
    }

    #[test]
    fn test_contract_note() {
        assert_eq!(
            contract_note(&sized(Some(11), Some(11), false), Some(2.0), 1000.0),
            "Sizing for $1000.00 target with $2.00 move."
        );
        assert_eq!(
            contract_note(&SizingResult::default(), Some(2.0), 1000.0),
            "Provide target profit and expected move to size contracts."
        );
    }

    #[test]
    fn test_loss_captions() {
        assert_eq!(loss_caption(None, Some(2.0)), "Set a move to see risk.");
        assert_eq!(
            loss_caption(Some(&SizingResult::default()), Some(2.0)),
            "Need contracts to compute downside."
        );
        assert_eq!(
            loss_caption(Some(&sized(Some(4), Some(4), false)), Some(2.0)),
            "4 contract(s) lose this amount if price falls $2.00."
        );
        let flat = SizingResult { downside_loss: Some(0.0), ..SizingResult::default() };
        assert_eq!(
            loss_caption(Some(&flat), Some(-3.0)),
            "A $3.00 drop does not reduce value for this setup."
        );
    }
}
