//! Reply statistics for the admin dashboard.
//!
//! Everything here is a pure function of a guest snapshot.

use std::str::FromStr;

use serde::Serialize;
use strum::{Display, IntoStaticStr, VariantArray};

use crate::error::Error;
use crate::models::Guest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub replied: usize,
    pub attending: usize,
    pub not_attending: usize,
    pub pending: usize,
    /// Guests invited to the ceremony, whatever their reply.
    pub ceremony_invited: usize,
    /// People expected at the ceremony.
    pub ceremony_attending_count: u32,
    /// People expected at the banquet.
    pub total_attending_guest_count: u32,
}

/// Single pass over the guest list.
pub fn aggregate<'a>(guests: impl IntoIterator<Item = &'a Guest>) -> Stats {
    let mut stats = Stats::default();

    for guest in guests {
        stats.total += 1;
        if guest.ceremony {
            stats.ceremony_invited += 1;
        }

        if guest.rsvp.is_pending() {
            stats.pending += 1;
            continue;
        }

        stats.replied += 1;
        if guest.rsvp.is_attending() {
            let party = guest.rsvp.attending_count();
            stats.attending += 1;
            stats.total_attending_guest_count = stats.total_attending_guest_count.saturating_add(party);
            if guest.ceremony {
                stats.ceremony_attending_count = stats.ceremony_attending_count.saturating_add(party);
            }
        } else {
            stats.not_attending += 1;
        }
    }

    stats
}

/// Drill-down lists on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, VariantArray)]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Replied,
    Attending,
    NotAttending,
    Pending,
    /// Invited to the ceremony and attending.
    Ceremony,
}

impl Category {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    #[must_use]
    pub const fn contains(self, guest: &Guest) -> bool {
        match self {
            Self::Replied => !guest.rsvp.is_pending(),
            Self::Attending => guest.rsvp.is_attending(),
            Self::NotAttending => guest.rsvp.is_declined(),
            Self::Pending => guest.rsvp.is_pending(),
            Self::Ceremony => guest.ceremony && guest.rsvp.is_attending(),
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

pub fn list_by_category<'a>(
    guests: impl IntoIterator<Item = &'a Guest>,
    category: Category,
) -> Vec<&'a Guest> {
    guests
        .into_iter()
        .filter(|guest| category.contains(guest))
        .collect()
}
