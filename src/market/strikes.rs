use crate::models::OptionType;
use smallvec::SmallVec;

/// Strikes within this distance of the entered strike are marked active.
const ACTIVE_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Moneyness {
    Itm,
    Otm,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct StrikeChoice {
    pub kind: Moneyness,
    pub strike: f64,
    pub active: bool,
}

pub type StrikeLadder = SmallVec<[StrikeChoice; 6]>;

/// Three ITM then three OTM strikes around the at-the-money strike.
///
/// ATM is the stock price rounded to the nearest `step`. ITM is below ATM
/// for calls and above for puts. Non-positive strikes are dropped.
pub fn suggest_strikes(
    stock_price: Option<f64>,
    option_type: OptionType,
    current_strike: Option<f64>,
    step: f64,
) -> StrikeLadder {
    let mut ladder = StrikeLadder::new();

    let Some(spot) = stock_price.filter(|s| s.is_finite() && *s > 0.0) else {
        return ladder;
    };
    if !step.is_finite() || step <= 0.0 {
        return ladder;
    }

    let atm = (spot / step).round() * step;
    let offsets = [step, 2.0 * step, 3.0 * step];
    let (itm_sign, otm_sign) = match option_type {
        OptionType::Call => (-1.0, 1.0),
        OptionType::Put => (1.0, -1.0),
    };

    let candidates = offsets
        .iter()
        .map(|o| (Moneyness::Itm, atm + itm_sign * o))
        .chain(offsets.iter().map(|o| (Moneyness::Otm, atm + otm_sign * o)));

    for (kind, strike) in candidates {
        if strike <= 0.0 {
            continue;
        }
        let active = current_strike.is_some_and(|k| (k - strike).abs() < ACTIVE_TOLERANCE);
        ladder.push(StrikeChoice { kind, strike, active });
    }

    ladder
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strikes(ladder: &StrikeLadder) -> Vec<(Moneyness, f64)> {
        ladder.iter().map(|c| (c.kind, c.strike)).collect()
    }

    #[test]
    fn test_call_ladder() {
        let ladder = suggest_strikes(Some(192.15), OptionType::Call, Some(195.0), 2.5);
        assert_eq!(
            strikes(&ladder),
            vec![
                (Moneyness::Itm, 190.0),
                (Moneyness::Itm, 187.5),
                (Moneyness::Itm, 185.0),
                (Moneyness::Otm, 195.0),
                (Moneyness::Otm, 197.5),
                (Moneyness::Otm, 200.0),
            ]
        );
        let active: Vec<f64> = ladder.iter().filter(|c| c.active).map(|c| c.strike).collect();
        assert_eq!(active, vec![195.0]);
    }

    #[test]
    fn test_put_ladder_flips_sides() {
        let ladder = suggest_strikes(Some(100.0), OptionType::Put, None, 2.5);
        assert_eq!(ladder[0], StrikeChoice { kind: Moneyness::Itm, strike: 102.5, active: false });
        assert_eq!(ladder[3], StrikeChoice { kind: Moneyness::Otm, strike: 97.5, active: false });
    }

    #[test]
    fn test_low_price_drops_non_positive() {
        let ladder = suggest_strikes(Some(4.0), OptionType::Call, None, 2.5);
        // atm = 5.0; ITM 2.5, 0.0 (dropped), -2.5 (dropped)
        assert_eq!(ladder.len(), 4);
        assert!(ladder.iter().all(|c| c.strike > 0.0));
    }

    #[test]
    fn test_no_price_no_ladder() {
        assert!(suggest_strikes(None, OptionType::Call, None, 2.5).is_empty());
        assert!(suggest_strikes(Some(0.0), OptionType::Call, None, 2.5).is_empty());
    }

    #[test]
    fn test_moneyness_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Moneyness::Itm).unwrap(), "\"ITM\"");
    }
}
