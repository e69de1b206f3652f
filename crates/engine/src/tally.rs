//! Weighted-vote tallying shared by bookings and expenses.
//!
//! The tally is a pure function over `(voting_power, choice)` pairs plus the
//! total voting power of the property, so it can be tested without a
//! database and recomputed idempotently: the result depends only on the vote
//! set, never on arrival order.

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// A voter's choice on a pending booking or expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Approve,
    Reject,
}

impl VoteChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl TryFrom<&str> for VoteChoice {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(EngineError::Validation(format!(
                "invalid vote choice: {other}"
            ))),
        }
    }
}

/// Outcome of a decisive tally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

/// The recomputed state of a vote, decisive or not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub total_power: i64,
    pub threshold: i64,
    pub approvals_power: i64,
    pub rejections_power: i64,
}

impl VoteTally {
    /// Strict majority of the reached power, if any.
    ///
    /// Abstaining owners count against both sides: the threshold is computed
    /// from the property's **total** voting power, not from the votes cast.
    /// With `total_power == 0` the threshold is 1 and no vote set can reach
    /// it, so such items stay pending indefinitely.
    #[must_use]
    pub fn decision(&self) -> Option<Decision> {
        if self.approvals_power >= self.threshold {
            Some(Decision::Approved)
        } else if self.rejections_power >= self.threshold {
            Some(Decision::Rejected)
        } else {
            None
        }
    }

    /// Human-readable audit line recorded on the decided item.
    #[must_use]
    pub fn decision_summary(&self) -> Option<String> {
        match self.decision()? {
            Decision::Approved => Some(format!(
                "Approved with {}/{} voting power",
                self.approvals_power, self.total_power
            )),
            Decision::Rejected => Some(format!(
                "Rejected with {}/{} voting power",
                self.rejections_power, self.total_power
            )),
        }
    }
}

/// Tallies the full vote set against the property's total voting power.
pub fn tally_votes<I>(votes: I, total_power: i64) -> VoteTally
where
    I: IntoIterator<Item = (i64, VoteChoice)>,
{
    let mut approvals_power = 0;
    let mut rejections_power = 0;
    for (power, choice) in votes {
        match choice {
            VoteChoice::Approve => approvals_power += power,
            VoteChoice::Reject => rejections_power += power,
        }
    }

    VoteTally {
        total_power,
        threshold: total_power / 2 + 1,
        approvals_power,
        rejections_power,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_of_total_power_approves() {
        // Total 4 → threshold 3: approvals worth 2 + 1 reach it.
        let tally = tally_votes(
            [(2, VoteChoice::Approve), (1, VoteChoice::Approve)],
            4,
        );
        assert_eq!(tally.threshold, 3);
        assert_eq!(tally.decision(), Some(Decision::Approved));
        assert_eq!(
            tally.decision_summary().as_deref(),
            Some("Approved with 3/4 voting power")
        );
    }

    #[test]
    fn short_of_threshold_stays_undecided() {
        // One approval worth 2 out of total 4: abstentions block the decision.
        let tally = tally_votes([(2, VoteChoice::Approve)], 4);
        assert_eq!(tally.decision(), None);
        assert_eq!(tally.decision_summary(), None);
    }

    #[test]
    fn rejections_reach_threshold_too() {
        let tally = tally_votes(
            [(2, VoteChoice::Reject), (1, VoteChoice::Reject)],
            4,
        );
        assert_eq!(tally.decision(), Some(Decision::Rejected));
        assert_eq!(
            tally.decision_summary().as_deref(),
            Some("Rejected with 3/4 voting power")
        );
    }

    #[test]
    fn single_owner_above_half_decides_alone() {
        let tally = tally_votes([(3, VoteChoice::Approve)], 5);
        assert_eq!(tally.threshold, 3);
        assert_eq!(tally.decision(), Some(Decision::Approved));
    }

    #[test]
    fn zero_power_votes_never_move_the_tally() {
        let tally = tally_votes([(0, VoteChoice::Approve)], 4);
        assert_eq!(tally.approvals_power, 0);
        assert_eq!(tally.decision(), None);
    }

    #[test]
    fn zero_total_power_is_undecidable() {
        // threshold = 0/2 + 1 = 1: no combination of votes summing to <= 0
        // power ever reaches it. Misconfigured properties stay pending.
        let tally = tally_votes(std::iter::empty(), 0);
        assert_eq!(tally.threshold, 1);
        assert_eq!(tally.decision(), None);

        let tally = tally_votes([(0, VoteChoice::Approve), (0, VoteChoice::Reject)], 0);
        assert_eq!(tally.decision(), None);
    }

    #[test]
    fn recomputation_is_idempotent_and_order_independent() {
        let votes = [
            (2, VoteChoice::Approve),
            (1, VoteChoice::Reject),
            (1, VoteChoice::Approve),
        ];
        let forward = tally_votes(votes, 4);
        let mut reversed = votes;
        reversed.reverse();
        assert_eq!(forward, tally_votes(reversed, 4));
        assert_eq!(forward, tally_votes(votes, 4));
    }
}
