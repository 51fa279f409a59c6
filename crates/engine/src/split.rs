//! Split calculator.
//!
//! Distributes a total amount across an ordered list of participants. All the
//! arithmetic happens on integer minor units, so the shares always add up to
//! the total.

use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine};

/// Named rule for dividing a total among participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Everyone owes the same amount; leftover cents go to the earliest
    /// listed participants, one each.
    Equal,
}

impl SplitStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
        }
    }

    fn amounts(self, total: MoneyCents, count: usize) -> Vec<MoneyCents> {
        match self {
            Self::Equal => equal_amounts(total, count),
        }
    }
}

impl TryFrom<&str> for SplitStrategy {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal" => Ok(Self::Equal),
            other => Err(EngineError::InvalidSplitStrategy(other.to_string())),
        }
    }
}

impl std::fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount owed by one participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitShare {
    pub participant_id: String,
    pub amount: MoneyCents,
}

/// Computes each participant's share of `total` under the named strategy.
///
/// The output keeps the order of `participants` and sums to `total` exactly.
///
/// # Errors
///
/// - [`EngineError::InvalidSplitStrategy`] for an unknown strategy name
/// - [`EngineError::InvalidAmount`] for a negative total
/// - [`EngineError::InvalidParticipants`] when no participant is given
///
/// # Examples
///
/// ```rust
/// use engine::{MoneyCents, compute_split};
///
/// let shares = compute_split(MoneyCents::new(100), &["a", "b", "c"], "equal").unwrap();
/// let amounts: Vec<i64> = shares.iter().map(|s| s.amount.cents()).collect();
/// assert_eq!(amounts, vec![34, 33, 33]);
/// ```
pub fn compute_split<S: AsRef<str>>(
    total: MoneyCents,
    participants: &[S],
    strategy: &str,
) -> ResultEngine<Vec<SplitShare>> {
    let strategy = SplitStrategy::try_from(strategy)?;
    split_with(total, participants, strategy)
}

/// Same as [`compute_split`] with an already parsed strategy.
pub fn split_with<S: AsRef<str>>(
    total: MoneyCents,
    participants: &[S],
    strategy: SplitStrategy,
) -> ResultEngine<Vec<SplitShare>> {
    if total.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "total must be >= 0, got {total}"
        )));
    }
    if participants.is_empty() {
        return Err(EngineError::InvalidParticipants(
            "at least one participant is required".to_string(),
        ));
    }

    let amounts = strategy.amounts(total, participants.len());
    Ok(participants
        .iter()
        .zip(amounts)
        .map(|(participant, amount)| SplitShare {
            participant_id: participant.as_ref().to_string(),
            amount,
        })
        .collect())
}

fn equal_amounts(total: MoneyCents, count: usize) -> Vec<MoneyCents> {
    // `count` is bounded by memory, so the cast cannot truncate.
    let n = count as i64;
    let base = total.cents() / n;
    let remainder = total.cents() - base * n;

    (0..n)
        .map(|i| MoneyCents::new(if i < remainder { base + 1 } else { base }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(shares: &[SplitShare]) -> Vec<i64> {
        shares.iter().map(|s| s.amount.cents()).collect()
    }

    #[test]
    fn remainder_goes_to_earliest_participants() {
        let shares = compute_split(MoneyCents::new(100), &["a", "b", "c"], "equal").unwrap();
        assert_eq!(cents(&shares), vec![34, 33, 33]);
        assert_eq!(shares[0].participant_id, "a");
        assert_eq!(shares[2].participant_id, "c");
    }

    #[test]
    fn single_cent_between_two() {
        let shares = compute_split(MoneyCents::new(1), &["a", "b"], "equal").unwrap();
        assert_eq!(cents(&shares), vec![1, 0]);
    }

    #[test]
    fn single_participant_owes_everything() {
        let shares = compute_split(MoneyCents::new(12_345), &["a"], "equal").unwrap();
        assert_eq!(cents(&shares), vec![12_345]);
    }

    #[test]
    fn zero_total_gives_zero_shares() {
        let shares = compute_split(MoneyCents::ZERO, &["a", "b", "c", "d"], "equal").unwrap();
        assert!(shares.iter().all(|s| s.amount.is_zero()));
        assert_eq!(shares.len(), 4);
    }

    #[test]
    fn negative_total_is_rejected() {
        let err = compute_split(MoneyCents::new(-1), &["a"], "equal").unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn empty_participants_are_rejected() {
        let none: [&str; 0] = [];
        let err = compute_split(MoneyCents::new(10), &none, "equal").unwrap_err();
        assert!(matches!(err, EngineError::InvalidParticipants(_)));
    }

    #[test]
    fn unknown_strategy_names_the_value() {
        let err = compute_split(MoneyCents::new(10), &["a"], "unknown").unwrap_err();
        assert_eq!(err, EngineError::InvalidSplitStrategy("unknown".to_string()));
    }

    #[test]
    fn strategy_is_checked_before_amount() {
        let err = compute_split(MoneyCents::new(-5), &["a"], "percent").unwrap_err();
        assert!(matches!(err, EngineError::InvalidSplitStrategy(_)));
    }

    #[test]
    fn shares_always_sum_to_total_and_differ_by_at_most_one() {
        let ids: Vec<String> = (0..23).map(|i| format!("p{i}")).collect();
        for n in 1..=ids.len() {
            for total in (0..2_000).chain([99_999, 1_000_000_007]) {
                let shares =
                    compute_split(MoneyCents::new(total), &ids[..n], "equal").unwrap();
                assert_eq!(shares.len(), n);

                let sum: MoneyCents = shares.iter().map(|s| s.amount).sum();
                assert_eq!(sum.cents(), total, "n={n} total={total}");

                let max = shares.iter().map(|s| s.amount).max().unwrap();
                let min = shares.iter().map(|s| s.amount).min().unwrap();
                assert!((max - min).cents() <= 1, "n={n} total={total}");
            }
        }
    }

    #[test]
    fn split_is_deterministic() {
        let ids = ["x", "y", "z", "w"];
        let first = compute_split(MoneyCents::new(1_003), &ids, "equal").unwrap();
        for _ in 0..10 {
            let again = compute_split(MoneyCents::new(1_003), &ids, "equal").unwrap();
            assert_eq!(first, again);
        }
        assert_eq!(cents(&first), vec![251, 251, 251, 250]);
    }
}
