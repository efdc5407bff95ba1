use super::schema::{guests, retired_codes};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Where a guest stands with their reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RsvpState {
    /// No reply yet. Only ever the initial state.
    #[default]
    Pending,
    Responded {
        is_attending: bool,
        /// Party size; always 0 when declining.
        guest_count: u32,
        /// First time the guest replied, kept across changes of mind.
        responded_at: NaiveDateTime,
    },
}

/// The part of a reply guests and the admin panel get to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpResponse {
    pub is_attending: bool,
    pub guest_count: u32,
}

impl RsvpState {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn is_attending(&self) -> bool {
        matches!(self, Self::Responded { is_attending: true, .. })
    }

    #[must_use]
    pub const fn is_declined(&self) -> bool {
        matches!(self, Self::Responded { is_attending: false, .. })
    }

    /// Number of people this reply brings along; 0 unless attending.
    #[must_use]
    pub const fn attending_count(&self) -> u32 {
        match self {
            Self::Responded {
                is_attending: true,
                guest_count,
                ..
            } => *guest_count,
            _ => 0,
        }
    }

    #[must_use]
    pub const fn response(&self) -> Option<RsvpResponse> {
        match *self {
            Self::Pending => None,
            Self::Responded {
                is_attending,
                guest_count,
                ..
            } => Some(RsvpResponse {
                is_attending,
                guest_count,
            }),
        }
    }

    #[must_use]
    pub const fn responded_at(&self) -> Option<NaiveDateTime> {
        match *self {
            Self::Pending => None,
            Self::Responded { responded_at, .. } => Some(responded_at),
        }
    }
}

/// One invited party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guest {
    pub code: String,
    pub name: String,
    pub ceremony: bool,
    pub rsvp: RsvpState,
    pub views: u32,
    pub created_at: NaiveDateTime,
    pub last_modified: Option<NaiveDateTime>,
}

impl Guest {
    #[must_use]
    pub const fn new(code: String, name: String, ceremony: bool, created_at: NaiveDateTime) -> Self {
        Self {
            code,
            name,
            ceremony,
            rsvp: RsvpState::Pending,
            views: 0,
            created_at,
            last_modified: None,
        }
    }

    /// Path of the guest's personal invitation page.
    #[must_use]
    pub fn invitation_path(&self) -> String {
        format!("/i/{}", self.code)
    }
}

#[derive(Debug, Insertable, Selectable, Queryable, AsChangeset)]
#[diesel(table_name = guests)]
#[diesel(primary_key(code))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GuestRow {
    pub code: String,
    pub name: String,
    pub ceremony: bool,
    pub is_attending: Option<bool>,
    pub guest_count: i32,
    pub responded_at: Option<NaiveDateTime>,
    pub views: i32,
    pub created_at: NaiveDateTime,
    pub last_modified: Option<NaiveDateTime>,
}

impl From<&Guest> for GuestRow {
    fn from(guest: &Guest) -> Self {
        let (is_attending, guest_count, responded_at) = match guest.rsvp {
            RsvpState::Pending => (None, 0, None),
            RsvpState::Responded {
                is_attending,
                guest_count,
                responded_at,
            } => (Some(is_attending), guest_count, Some(responded_at)),
        };

        Self {
            code: guest.code.clone(),
            name: guest.name.clone(),
            ceremony: guest.ceremony,
            is_attending,
            guest_count: i32::try_from(guest_count).unwrap_or(i32::MAX),
            responded_at,
            views: i32::try_from(guest.views).unwrap_or(i32::MAX),
            created_at: guest.created_at,
            last_modified: guest.last_modified,
        }
    }
}

impl From<GuestRow> for Guest {
    fn from(row: GuestRow) -> Self {
        let rsvp = match row.is_attending {
            None => RsvpState::Pending,
            Some(is_attending) => RsvpState::Responded {
                is_attending,
                guest_count: if is_attending {
                    u32::try_from(row.guest_count).unwrap_or(0)
                } else {
                    0
                },
                responded_at: row.responded_at.unwrap_or(row.created_at),
            },
        };

        Self {
            code: row.code,
            name: row.name,
            ceremony: row.ceremony,
            rsvp,
            views: u32::try_from(row.views).unwrap_or(0),
            created_at: row.created_at,
            last_modified: row.last_modified,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = retired_codes)]
pub struct RetiredCode<'a> {
    pub code: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 1)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    #[test]
    fn pending_guest_converts_to_row_without_reply() {
        let guest = Guest::new("a1b2c3d4".into(), "Alice".into(), true, at(9));
        let row = GuestRow::from(&guest);

        assert_eq!(row.is_attending, None);
        assert_eq!(row.responded_at, None);
        assert_eq!(row.guest_count, 0);
        assert_eq!(Guest::from(row), guest);
    }

    #[test]
    fn responded_guest_survives_row_conversion() {
        let mut guest = Guest::new("a1b2c3d4".into(), "Alice".into(), false, at(9));
        guest.views = 4;
        guest.last_modified = Some(at(12));
        guest.rsvp = RsvpState::Responded {
            is_attending: true,
            guest_count: 3,
            responded_at: at(11),
        };

        assert_eq!(Guest::from(GuestRow::from(&guest)), guest);
    }

    #[test]
    fn declined_row_ignores_stray_count() {
        let row = GuestRow {
            code: "a1b2c3d4".into(),
            name: "Bob".into(),
            ceremony: false,
            is_attending: Some(false),
            guest_count: 5,
            responded_at: None,
            views: -1,
            created_at: at(8),
            last_modified: None,
        };
        let guest = Guest::from(row);

        assert_eq!(guest.rsvp.attending_count(), 0);
        assert_eq!(guest.rsvp.responded_at(), Some(at(8)));
        assert_eq!(guest.views, 0);
    }

    #[test]
    fn state_predicates() {
        let attending = RsvpState::Responded {
            is_attending: true,
            guest_count: 2,
            responded_at: at(10),
        };
        assert!(attending.is_attending());
        assert!(!attending.is_pending());
        assert_eq!(attending.attending_count(), 2);
        assert_eq!(
            attending.response(),
            Some(RsvpResponse {
                is_attending: true,
                guest_count: 2
            })
        );

        assert!(RsvpState::Pending.is_pending());
        assert_eq!(RsvpState::Pending.response(), None);
    }
}
