use crate::risk::sizing::SHARES_PER_CONTRACT;

/// The adverse move: always -|move|, whatever the sign of the assumed move.
/// None for a zero or non-finite move.
#[inline]
pub fn downside_move(assumed_move: f64) -> Option<f64> {
    if !assumed_move.is_finite() || assumed_move == 0.0 {
        return None;
    }
    Some(-assumed_move.abs())
}

/// Dollar loss if price moves against the position by |assumed_move|.
///
/// Returns Some(0.0) when the adverse move does not reduce position value
/// (e.g. a put on a drop). None when the move or contract count is missing.
#[inline]
pub fn downside_loss(
    delta: f64,
    assumed_move: Option<f64>,
    contracts: Option<u64>,
) -> Option<f64> {
    if !delta.is_finite() {
        return None;
    }
    let adverse = assumed_move.and_then(downside_move)?;
    let contracts = contracts?;

    let per_contract = delta * SHARES_PER_CONTRACT * adverse;
    let total = per_contract * contracts as f64;
    if !total.is_finite() || total >= 0.0 {
        return Some(0.0);
    }
    Some(total.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downside_move_always_negative() {
        assert_eq!(downside_move(5.0), Some(-5.0));
        assert_eq!(downside_move(-3.5), Some(-3.5));
        assert_eq!(downside_move(0.0), None);
        assert_eq!(downside_move(f64::NAN), None);
    }

    #[test]
    fn test_call_loses_on_drop() {
        assert_eq!(downside_loss(0.5, Some(5.0), Some(4)), Some(1000.0));
    }

    #[test]
    fn test_put_gains_on_drop() {
        assert_eq!(downside_loss(-0.4, Some(2.0), Some(10)), Some(0.0));
    }

    #[test]
    fn test_move_sign_does_not_matter() {
        assert_eq!(
            downside_loss(0.3, Some(-2.0), Some(3)),
            downside_loss(0.3, Some(2.0), Some(3))
        );
    }

    #[test]
    fn test_missing_inputs() {
        assert_eq!(downside_loss(0.5, None, Some(4)), None);
        assert_eq!(downside_loss(0.5, Some(5.0), None), None);
        assert_eq!(downside_loss(f64::NAN, Some(5.0), Some(4)), None);
    }

    #[test]
    fn test_loss_never_negative() {
        for delta in [-1.0, -0.5, 0.0, 0.25, 1.0] {
            for mv in [-10.0, -0.1, 0.1, 10.0] {
                for n in [1, 7, 100] {
                    let loss = downside_loss(delta, Some(mv), Some(n)).unwrap();
                    assert!(loss >= 0.0, "loss={loss} delta={delta} mv={mv} n={n}");
                    if delta <= 0.0 {
                        assert_eq!(loss, 0.0);
                    }
                }
            }
        }
    }
}
