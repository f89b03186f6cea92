//! Quorum threshold for voting sessions
//!
//! A session's result only becomes final when enough of the eligible voters
//! took part. The threshold is a whole percentage of the eligible-voter
//! snapshot taken when the session was created.

use serde::{Deserialize, Serialize};

/// Minimum participation, as a percentage (0-100) of eligible voters.
///
/// # Example
///
/// ```
/// use governance_domain::voting::QuorumThreshold;
///
/// let quorum = QuorumThreshold::new(75).unwrap();
/// assert!(!quorum.is_satisfied(8, 12)); // 66.7%
/// assert!(quorum.is_satisfied(9, 12));  // 75.0%
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct QuorumThreshold(u8);

impl QuorumThreshold {
    /// Creates a threshold, rejecting values above 100.
    pub fn new(percent: u8) -> Result<Self, String> {
        if percent > 100 {
            return Err(format!(
                "quorum percentage must be between 0 and 100, got {}",
                percent
            ));
        }
        Ok(Self(percent))
    }

    /// The threshold as a whole percentage.
    pub fn percent(&self) -> u8 {
        self.0
    }

    /// Check whether `participants` out of `eligible` voters meet the threshold.
    ///
    /// Integer arithmetic keeps boundary cases exact (9 of 12 is exactly 75%).
    pub fn is_satisfied(&self, participants: usize, eligible: usize) -> bool {
        if eligible == 0 {
            return false;
        }
        participants * 100 >= self.0 as usize * eligible
    }

    /// Smallest number of participants that satisfies the threshold.
    pub fn min_participants_needed(&self, eligible: usize) -> usize {
        (self.0 as usize * eligible).div_ceil(100)
    }

    /// Human-readable description of this threshold
    pub fn description(&self) -> String {
        match self.0 {
            0 => "no quorum required".to_string(),
            100 => "all eligible voters must take part".to_string(),
            p => format!("at least {}% participation", p),
        }
    }
}

impl TryFrom<u8> for QuorumThreshold {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuorumThreshold> for u8 {
    fn from(value: QuorumThreshold) -> Self {
        value.0
    }
}

impl std::fmt::Display for QuorumThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for QuorumThreshold {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num_str = s
            .trim()
            .trim_start_matches("percentage:")
            .trim_end_matches('%');
        let p: u8 = num_str
            .parse()
            .map_err(|_| format!("Invalid quorum percentage: {}", s))?;
        Self::new(p)
    }
}
