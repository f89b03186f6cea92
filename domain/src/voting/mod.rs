//! Voting domain
//!
//! Group decisions are made in quorum-gated voting sessions:
//!
//! ```text
//! SessionSpec ──create──▶ VotingSession (active)
//!                             │  admit_vote ──▶ Vote (one live record per voter)
//!                             │
//!                             └─ close ──▶ tally ──▶ completed | cancelled
//! ```
//!
//! - [`session`] - the session entity and its state machine
//! - [`vote`] - vote records and the re-vote policy
//! - [`tally`] - pure tally computation
//! - [`quorum`] - the participation threshold

pub mod quorum;
pub mod session;
pub mod tally;
pub mod vote;

pub use quorum::QuorumThreshold;
pub use session::{CloseReason, SessionKind, SessionSpec, SessionStatus, VoteOption, VotingSession};
pub use tally::{TallyResult, tally};
pub use vote::{RevotePolicy, Vote};
