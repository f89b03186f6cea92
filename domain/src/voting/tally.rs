//! Vote tallying
//!
//! [`tally`] is a pure function over a session and its stored votes. It is
//! recomputed from scratch on every call, so a preview and the final result
//! of a session always agree.

use super::session::VotingSession;
use super::vote::Vote;
use crate::core::ids::{MemberId, OptionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Computed counts and quorum status for a session at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyResult {
    /// Number of votes selecting each option (every option is present)
    pub per_option: BTreeMap<OptionId, usize>,
    /// Distinct voters with a live vote
    pub total_voters: usize,
    /// Eligible-voter snapshot the percentage is computed against
    pub eligible_voter_count: usize,
    /// `total_voters / eligible_voter_count * 100`
    pub participation_pct: f64,
    pub quorum_required_pct: u8,
    pub quorum_met: bool,
}

impl TallyResult {
    /// Count for a single option (0 for unknown ids).
    pub fn count(&self, option: &OptionId) -> usize {
        self.per_option.get(option).copied().unwrap_or(0)
    }

    /// Options sharing the highest non-zero count.
    pub fn leaders(&self) -> Vec<OptionId> {
        let Some(top) = self.per_option.values().copied().max() else {
            return Vec::new();
        };
        if top == 0 {
            return Vec::new();
        }
        self.per_option
            .iter()
            .filter(|(_, count)| **count == top)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Visual participation summary, e.g. "[●●●○]"
    pub fn participation_summary(&self) -> String {
        let mut summary = String::from("[");
        for i in 0..self.eligible_voter_count {
            summary.push(if i < self.total_voters { '●' } else { '○' });
        }
        summary.push(']');
        summary
    }
}

/// Tally `votes` against `session`'s options and quorum rule.
///
/// Votes for other sessions are ignored. If a voter appears more than once
/// the last record wins. Each selection counts independently, so
/// multi-select sessions are tallied approval-style.
pub fn tally<'a>(session: &VotingSession, votes: impl IntoIterator<Item = &'a Vote>) -> TallyResult {
    let live: BTreeMap<&MemberId, &Vote> = votes
        .into_iter()
        .filter(|v| v.session_id == session.id)
        .map(|v| (&v.voter_id, v))
        .collect();

    let mut per_option: BTreeMap<OptionId, usize> = session
        .options
        .iter()
        .map(|o| (o.id.clone(), 0))
        .collect();

    for vote in live.values() {
        for selection in &vote.selections {
            if let Some(count) = per_option.get_mut(selection) {
                *count += 1;
            }
        }
    }

    let total_voters = live.len();
    let eligible_voter_count = session.eligible_voter_count();
    let participation_pct = if eligible_voter_count == 0 {
        0.0
    } else {
        total_voters as f64 * 100.0 / eligible_voter_count as f64
    };

    TallyResult {
        per_option,
        total_voters,
        eligible_voter_count,
        participation_pct,
        quorum_required_pct: session.quorum.percent(),
        quorum_met: session.quorum.is_satisfied(total_voters, eligible_voter_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{GroupId, SessionId};
    use crate::voting::session::{SessionKind, SessionSpec, VoteOption};
    use chrono::Utc;

    fn session(voters: usize, quorum: u8, max_selections: usize, kind: SessionKind) -> VotingSession {
        let spec = SessionSpec::new(GroupId::new("g"), "Pick", kind)
            .with_option(VoteOption::new("x", "X"))
            .with_option(VoteOption::new("y", "Y"))
            .with_option(VoteOption::new("z", "Z"))
            .with_max_selections(max_selections)
            .with_quorum(quorum);
        let eligible = (1..=voters).map(|i| MemberId::new(format!("v{}", i)));
        VotingSession::create(SessionId::new("s"), spec, eligible, Utc::now()).unwrap()
    }

    fn vote(voter: &str, selections: &[&str]) -> Vote {
        Vote::new(
            SessionId::new("s"),
            MemberId::new(voter),
            selections.iter().map(|s| OptionId::new(*s)).collect(),
            Utc::now(),
        )
    }

    #[test]
    fn test_quorum_arithmetic() {
        let s = session(12, 75, 1, SessionKind::Decision);
        let mut votes: Vec<Vote> = (1..=8).map(|i| vote(&format!("v{}", i), &["x"])).collect();

        let result = tally(&s, &votes);
        assert_eq!(result.total_voters, 8);
        assert!((result.participation_pct - 66.666).abs() < 0.01);
        assert!(!result.quorum_met);

        votes.push(vote("v9", &["y"]));
        let result = tally(&s, &votes);
        assert_eq!(result.participation_pct, 75.0);
        assert!(result.quorum_met);
    }

    #[test]
    fn test_two_of_four_meets_half_quorum() {
        let s = session(4, 50, 1, SessionKind::Decision);
        let votes = vec![vote("v1", &["x"]), vote("v2", &["y"])];

        let result = tally(&s, &votes);
        assert_eq!(result.participation_pct, 50.0);
        assert!(result.quorum_met);
        assert_eq!(result.count(&OptionId::new("x")), 1);
        assert_eq!(result.count(&OptionId::new("y")), 1);
        assert_eq!(result.count(&OptionId::new("z")), 0);
    }

    #[test]
    fn test_approval_style_multi_select() {
        let s = session(3, 0, 2, SessionKind::AdminElection);
        let votes = vec![vote("v1", &["x", "y"]), vote("v2", &["y", "z"]), vote("v3", &["y"])];

        let result = tally(&s, &votes);
        assert_eq!(result.total_voters, 3);
        assert_eq!(result.count(&OptionId::new("x")), 1);
        assert_eq!(result.count(&OptionId::new("y")), 3);
        assert_eq!(result.count(&OptionId::new("z")), 1);
        assert_eq!(result.leaders(), vec![OptionId::new("y")]);
    }

    #[test]
    fn test_duplicate_voter_last_record_wins() {
        let s = session(4, 50, 1, SessionKind::Decision);
        let votes = vec![vote("v1", &["x"]), vote("v1", &["z"])];

        let result = tally(&s, &votes);
        assert_eq!(result.total_voters, 1);
        assert_eq!(result.count(&OptionId::new("x")), 0);
        assert_eq!(result.count(&OptionId::new("z")), 1);
    }

    #[test]
    fn test_ignores_votes_for_other_sessions() {
        let s = session(4, 50, 1, SessionKind::Decision);
        let mut foreign = vote("v1", &["x"]);
        foreign.session_id = SessionId::new("other");

        let result = tally(&s, &[foreign]);
        assert_eq!(result.total_voters, 0);
        assert!(result.leaders().is_empty());
    }

    #[test]
    fn test_tally_is_deterministic() {
        let s = session(4, 50, 1, SessionKind::Decision);
        let votes = vec![vote("v2", &["y"]), vote("v1", &["x"])];
        assert_eq!(tally(&s, &votes), tally(&s, &votes));
    }

    #[test]
    fn test_participation_summary() {
        let s = session(4, 50, 1, SessionKind::Decision);
        let result = tally(&s, &[vote("v1", &["x"])]);
        assert_eq!(result.participation_summary(), "[●○○○]");
    }

    #[test]
    fn test_leaders_tie() {
        let s = session(4, 50, 1, SessionKind::Decision);
        let result = tally(&s, &[vote("v1", &["x"]), vote("v2", &["y"])]);
        assert_eq!(result.leaders(), vec![OptionId::new("x"), OptionId::new("y")]);
    }
}
