//! The guest list: every invitation keyed by its code.
//!
//! The registry is plain in-memory state. It knows nothing about storage;
//! [`crate::store::Store`] owns one and writes each accepted change through
//! to the database.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::code;
use crate::error::{Error, Result};
use crate::models::Guest;
use crate::rsvp::{self, Submission};

/// Result of [`Registry::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new invitation with a fresh code.
    Created(Guest),
    /// A guest with this name already existed; their ceremony flag was
    /// replaced and their code kept.
    Updated(Guest),
}

impl AddOutcome {
    #[must_use]
    pub const fn guest(&self) -> &Guest {
        match self {
            Self::Created(guest) | Self::Updated(guest) => guest,
        }
    }

    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Admin edits to an existing guest. Absent fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GuestChanges {
    pub name: Option<String>,
    pub ceremony: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    guests: HashMap<String, Guest>,
    retired: HashSet<String>,
}

fn clean_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }
    Ok(name.to_string())
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from stored guests and the codes of deleted ones.
    pub fn from_parts(
        guests: impl IntoIterator<Item = Guest>,
        retired: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            guests: guests
                .into_iter()
                .map(|guest| (guest.code.clone(), guest))
                .collect(),
            retired: retired.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.guests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guests.is_empty()
    }

    /// Whether `code` is in use or was used by a deleted guest.
    #[must_use]
    pub fn is_taken(&self, code: &str) -> bool {
        self.guests.contains_key(code) || self.retired.contains(code)
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Guest> {
        self.guests.get(code)
    }

    /// All guests, in no particular order.
    pub fn guests(&self) -> impl Iterator<Item = &Guest> {
        self.guests.values()
    }

    /// Snapshot of the guest list, newest invitation first.
    #[must_use]
    pub fn list(&self) -> Vec<Guest> {
        let mut guests: Vec<Guest> = self.guests.values().cloned().collect();
        guests.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });
        guests
    }

    fn find_by_name(&self, name: &str) -> Option<&Guest> {
        self.guests.values().find(|guest| guest.name == name)
    }

    /// Adds a guest, or updates the one that already carries this name.
    ///
    /// Names are compared after trimming and are case-sensitive. On a name
    /// match only `ceremony` changes; code, reply and view count stay.
    pub fn create(&mut self, name: &str, ceremony: bool, now: NaiveDateTime) -> Result<AddOutcome> {
        let name = clean_name(name)?;

        if let Some(code) = self.find_by_name(&name).map(|g| g.code.clone()) {
            let guest = self
                .guests
                .get_mut(&code)
                .ok_or_else(|| Error::GuestNotFound(code.clone()))?;
            guest.ceremony = ceremony;
            guest.last_modified = Some(now);
            return Ok(AddOutcome::Updated(guest.clone()));
        }

        let code = code::generate(&mut rand::thread_rng(), |c| self.is_taken(c));
        let guest = Guest::new(code.clone(), name, ceremony, now);
        self.guests.insert(code, guest.clone());
        Ok(AddOutcome::Created(guest))
    }

    /// Applies admin edits. The code never changes.
    pub fn update(&mut self, code: &str, changes: GuestChanges, now: NaiveDateTime) -> Result<Guest> {
        if !self.guests.contains_key(code) {
            return Err(Error::GuestNotFound(code.to_string()));
        }

        let name = changes.name.as_deref().map(clean_name).transpose()?;
        if let Some(name) = &name {
            if self.find_by_name(name).is_some_and(|other| other.code != code) {
                return Err(Error::DuplicateName(name.clone()));
            }
        }

        let guest = self
            .guests
            .get_mut(code)
            .ok_or_else(|| Error::GuestNotFound(code.to_string()))?;
        if let Some(name) = name {
            guest.name = name;
        }
        if let Some(ceremony) = changes.ceremony {
            guest.ceremony = ceremony;
        }
        guest.last_modified = Some(now);
        Ok(guest.clone())
    }

    /// Removes a guest for good and retires their code.
    pub fn delete(&mut self, code: &str) -> Result<Guest> {
        let guest = self
            .guests
            .remove(code)
            .ok_or_else(|| Error::GuestNotFound(code.to_string()))?;
        self.retired.insert(guest.code.clone());
        Ok(guest)
    }

    /// Records a reply. A rejected submission leaves the guest untouched.
    pub fn submit_rsvp(
        &mut self,
        code: &str,
        submission: Submission,
        now: NaiveDateTime,
    ) -> Result<Guest> {
        let guest = self
            .guests
            .get_mut(code)
            .ok_or_else(|| Error::GuestNotFound(code.to_string()))?;
        guest.rsvp = rsvp::transition(&guest.rsvp, submission, now)?;
        guest.last_modified = Some(now);
        Ok(guest.clone())
    }

    /// Counts one visit to the guest's invitation page.
    pub fn record_view(&mut self, code: &str) -> Option<Guest> {
        let guest = self.guests.get_mut(code)?;
        guest.views = guest.views.saturating_add(1);
        Some(guest.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RsvpState;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 15)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    fn created(outcome: AddOutcome) -> Guest {
        match outcome {
            AddOutcome::Created(guest) => guest,
            AddOutcome::Updated(guest) => panic!("expected a new guest, got update of {}", guest.code),
        }
    }

    #[test]
    fn create_then_get_is_pending() {
        let mut registry = Registry::new();
        let guest = created(registry.create("  Alice  ", true, at(9)).unwrap());

        let stored = registry.get(&guest.code).unwrap();
        assert_eq!(stored.name, "Alice");
        assert!(stored.ceremony);
        assert_eq!(stored.rsvp, RsvpState::Pending);
        assert_eq!(stored.views, 0);
        assert!(code::is_well_formed(&stored.code));
    }

    #[test]
    fn create_rejects_blank_names() {
        let mut registry = Registry::new();
        assert!(matches!(registry.create("   ", false, at(9)), Err(Error::EmptyName)));
        assert!(matches!(registry.create("", false, at(9)), Err(Error::EmptyName)));
        assert!(registry.is_empty());
    }

    #[test]
    fn same_name_updates_existing_guest() {
        let mut registry = Registry::new();
        let first = created(registry.create("Alice", false, at(9)).unwrap());

        let second = registry.create("Alice ", true, at(10)).unwrap();
        assert!(!second.is_created());
        assert_eq!(second.guest().code, first.code);
        assert!(second.guest().ceremony);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn same_name_keeps_reply() {
        let mut registry = Registry::new();
        let guest = created(registry.create("Alice", false, at(9)).unwrap());
        registry
            .submit_rsvp(&guest.code, Submission::attending(2), at(10))
            .unwrap();

        let outcome = registry.create("Alice", true, at(11)).unwrap();
        assert_eq!(outcome.guest().rsvp.attending_count(), 2);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut registry = Registry::new();
        registry.create("alice", false, at(9)).unwrap();
        assert!(registry.create("Alice", false, at(9)).unwrap().is_created());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn rename_preserves_code_and_reply() {
        let mut registry = Registry::new();
        let guest = created(registry.create("Alice", true, at(9)).unwrap());
        let replied = registry
            .submit_rsvp(&guest.code, Submission::attending(2), at(10))
            .unwrap();

        let changes = GuestChanges {
            name: Some("Alice & Sam".into()),
            ..GuestChanges::default()
        };
        let renamed = registry.update(&guest.code, changes, at(11)).unwrap();

        assert_eq!(renamed.code, guest.code);
        assert_eq!(renamed.name, "Alice & Sam");
        assert_eq!(renamed.rsvp, replied.rsvp);
        assert_eq!(renamed.ceremony, guest.ceremony);
        assert_eq!(renamed.last_modified, Some(at(11)));
    }

    #[test]
    fn update_validates_before_changing_anything() {
        let mut registry = Registry::new();
        let guest = created(registry.create("Alice", false, at(9)).unwrap());

        let blank = GuestChanges {
            name: Some("  ".into()),
            ceremony: Some(true),
        };
        assert!(matches!(
            registry.update(&guest.code, blank, at(10)),
            Err(Error::EmptyName)
        ));
        assert_eq!(registry.get(&guest.code), Some(&guest));
    }

    #[test]
    fn update_rejects_taken_name() {
        let mut registry = Registry::new();
        registry.create("Alice", false, at(9)).unwrap();
        let bob = created(registry.create("Bob", false, at(9)).unwrap());

        let changes = GuestChanges {
            name: Some("Alice".into()),
            ceremony: None,
        };
        assert!(matches!(
            registry.update(&bob.code, changes, at(10)),
            Err(Error::DuplicateName(name)) if name == "Alice"
        ));

        let same = GuestChanges {
            name: Some("Bob".into()),
            ceremony: Some(true),
        };
        assert!(registry.update(&bob.code, same, at(10)).unwrap().ceremony);
    }

    #[test]
    fn update_unknown_code() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.update("nobody00", GuestChanges::default(), at(9)),
            Err(Error::GuestNotFound(_))
        ));
    }

    #[test]
    fn delete_removes_and_retires() {
        let mut registry = Registry::new();
        let guest = created(registry.create("Alice", false, at(9)).unwrap());

        registry.delete(&guest.code).unwrap();
        assert!(registry.get(&guest.code).is_none());
        assert!(registry.is_taken(&guest.code));
        assert!(matches!(
            registry.delete(&guest.code),
            Err(Error::GuestNotFound(code)) if code == guest.code
        ));
    }

    #[test]
    fn retired_codes_from_storage_are_taken() {
        let registry = Registry::from_parts(Vec::new(), vec!["gone0000".to_string()]);
        assert!(registry.is_taken("gone0000"));
        assert!(registry.get("gone0000").is_none());
    }

    #[test]
    fn last_reply_wins() {
        let mut registry = Registry::new();
        let guest = created(registry.create("Alice", false, at(9)).unwrap());

        registry
            .submit_rsvp(&guest.code, Submission::attending(4), at(10))
            .unwrap();
        let after = registry
            .submit_rsvp(&guest.code, Submission::declining(), at(11))
            .unwrap();

        let response = after.rsvp.response().unwrap();
        assert!(!response.is_attending);
        assert_eq!(response.guest_count, 0);
    }

    #[test]
    fn rejected_reply_keeps_previous_state() {
        let mut registry = Registry::new();
        let guest = created(registry.create("Alice", false, at(9)).unwrap());

        assert!(registry
            .submit_rsvp(&guest.code, Submission::attending(0), at(10))
            .is_err());
        assert_eq!(registry.get(&guest.code).unwrap().rsvp, RsvpState::Pending);
        assert_eq!(registry.get(&guest.code).unwrap().last_modified, None);

        registry
            .submit_rsvp(&guest.code, Submission::attending(2), at(10))
            .unwrap();
        assert!(registry
            .submit_rsvp(&guest.code, Submission::attending(99), at(11))
            .is_err());
        assert_eq!(registry.get(&guest.code).unwrap().rsvp.attending_count(), 2);
    }

    #[test]
    fn reply_to_unknown_code() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.submit_rsvp("nobody00", Submission::declining(), at(9)),
            Err(Error::GuestNotFound(_))
        ));
    }

    #[test]
    fn views_are_counted() {
        let mut registry = Registry::new();
        let guest = created(registry.create("Alice", false, at(9)).unwrap());

        registry.record_view(&guest.code);
        let seen = registry.record_view(&guest.code).unwrap();
        assert_eq!(seen.views, 2);
        assert!(registry.record_view("nobody00").is_none());
    }

    #[test]
    fn list_is_newest_first() {
        let mut registry = Registry::new();
        registry.create("Early", false, at(8)).unwrap();
        registry.create("Late", false, at(12)).unwrap();
        registry.create("Middle", false, at(10)).unwrap();

        let names: Vec<String> = registry.list().into_iter().map(|g| g.name).collect();
        assert_eq!(names, ["Late", "Middle", "Early"]);
    }
}
