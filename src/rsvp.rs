//! Reply transitions.
//!
//! `Pending -> Responded -> Responded -> ...`: a guest may change their mind
//! any number of times and the latest submission wins. Nothing moves a
//! guest back to `Pending`.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::RsvpState;

/// Largest party a single invitation may bring.
pub const MAX_PARTY_SIZE: u32 = 10;

/// A reply as submitted from the invitation page.
///
/// `guest_count` is kept signed so that nonsense such as `-2` is reported
/// as a validation failure rather than a malformed body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Submission {
    pub is_attending: bool,
    #[serde(default)]
    pub guest_count: i64,
}

impl Submission {
    #[must_use]
    pub const fn attending(guest_count: i64) -> Self {
        Self {
            is_attending: true,
            guest_count,
        }
    }

    #[must_use]
    pub const fn declining() -> Self {
        Self {
            is_attending: false,
            guest_count: 0,
        }
    }

    /// Party size to store, or an error if an attending reply is out of range.
    pub fn party_size(&self) -> Result<u32> {
        if !self.is_attending {
            return Ok(0);
        }
        match u32::try_from(self.guest_count) {
            Ok(n) if (1..=MAX_PARTY_SIZE).contains(&n) => Ok(n),
            _ => Err(Error::InvalidPartySize(self.guest_count)),
        }
    }
}

/// Computes the state that follows `current` once `submission` is accepted.
///
/// Out-of-range party sizes are rejected, not clamped. The first reply's
/// timestamp is carried over so the admin can see when a guest first
/// answered.
pub fn transition(
    current: &RsvpState,
    submission: Submission,
    now: NaiveDateTime,
) -> Result<RsvpState> {
    let guest_count = submission.party_size()?;

    Ok(RsvpState::Responded {
        is_attending: submission.is_attending,
        guest_count,
        responded_at: current.responded_at().unwrap_or(now),
    })
}
