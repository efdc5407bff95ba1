//! The guest list as the running service sees it.
//!
//! [`Store`] keeps the [`Registry`] and the active [`Theme`] in memory and
//! writes every accepted change through to SQLite. Writers take the
//! connection lock for the whole change, so two requests touching the same
//! guest never lose each other's writes. Each mutation is staged on a copy of
//! the registry, written to the database, and only then made visible; a
//! failed write leaves both memory and disk as they were. Readers only wait
//! for the brief swap, never for disk I/O.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use parking_lot::{Mutex, RwLock};
use rocket::fairing::{self, AdHoc};
use rocket::tokio::task;
use rocket::{Build, Rocket};

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{Guest, GuestRow, RetiredCode};
use crate::registry::{AddOutcome, GuestChanges, Registry};
use crate::rsvp::Submission;
use crate::schema::{guests, retired_codes, settings};
use crate::stats::{self, Category, Stats};
use crate::theme::Theme;

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS guests (
    code TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    ceremony BOOLEAN NOT NULL DEFAULT 0,
    is_attending BOOLEAN,
    guest_count INTEGER NOT NULL DEFAULT 0,
    responded_at TIMESTAMP,
    views INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMP NOT NULL,
    last_modified TIMESTAMP
);
CREATE TABLE IF NOT EXISTS retired_codes (
    code TEXT PRIMARY KEY NOT NULL
);
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
";

const THEME_KEY: &str = "theme";

struct State {
    registry: Registry,
    theme: Theme,
}

struct Shared {
    state: RwLock<State>,
    /// Held for the whole of every mutation.
    conn: Mutex<SqliteConnection>,
}

/// Cheap to clone; clones share the same guest list and connection.
#[derive(Clone)]
pub struct Store {
    shared: Arc<Shared>,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn save_guest(conn: &mut SqliteConnection, guest: &Guest) -> QueryResult<usize> {
    let row = GuestRow::from(guest);
    diesel::update(guests::table.find(&guest.code))
        .set(&row)
        .execute(conn)
}

impl Store {
    /// Opens (or creates) the database at `database_url` and loads the guest
    /// list and theme from it.
    pub fn open(database_url: &str) -> Result<Self> {
        if let Some(dir) = std::path::Path::new(database_url)
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
        {
            if let Err(err) = std::fs::create_dir_all(dir) {
                tracing::warn!(dir = %dir.display(), error = %err, "could not create data directory");
            }
        }

        let mut conn = SqliteConnection::establish(database_url)?;
        conn.batch_execute(CREATE_TABLES)?;

        let rows: Vec<GuestRow> = guests::table.select(GuestRow::as_select()).load(&mut conn)?;
        let retired: Vec<String> = retired_codes::table
            .select(retired_codes::code)
            .load(&mut conn)?;
        let stored_theme: Option<String> = settings::table
            .find(THEME_KEY)
            .select(settings::value)
            .first(&mut conn)
            .optional()?;

        let theme = match stored_theme {
            Some(name) => name.parse().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "ignoring stored theme");
                Theme::default()
            }),
            None => Theme::default(),
        };

        let registry = Registry::from_parts(rows.into_iter().map(Guest::from), retired);
        tracing::info!(guests = registry.len(), %theme, "guest list loaded");

        Ok(Self {
            shared: Arc::new(Shared {
                state: RwLock::new(State { registry, theme }),
                conn: Mutex::new(conn),
            }),
        })
    }

    /// Runs `op` on the blocking thread pool so database writes never stall
    /// the async workers.
    pub async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Store) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        task::spawn_blocking(move || op(&store)).await?
    }

    /// Stages a change on a copy of the registry, persists it, then swaps the
    /// copy in. The connection lock is held throughout.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Registry) -> Result<T>,
        persist: impl FnOnce(&mut SqliteConnection, &T) -> QueryResult<()>,
    ) -> Result<T> {
        let mut conn = self.shared.conn.lock();

        let mut staged = self.shared.state.read().registry.clone();
        let outcome = change(&mut staged)?;
        persist(&mut *conn, &outcome)?;

        self.shared.state.write().registry = staged;
        Ok(outcome)
    }

    /// Adds a guest or, if the name is already on the list, updates them.
    pub fn add_guest(&self, name: &str, ceremony: bool) -> Result<AddOutcome> {
        let outcome = self.mutate(
            |registry| registry.create(name, ceremony, now()),
            |conn, outcome| match outcome {
                AddOutcome::Created(guest) => diesel::insert_into(guests::table)
                    .values(GuestRow::from(guest))
                    .execute(conn)
                    .map(drop),
                AddOutcome::Updated(guest) => save_guest(conn, guest).map(drop),
            },
        )?;

        let guest = outcome.guest();
        if outcome.is_created() {
            tracing::info!(code = %guest.code, name = %guest.name, ceremony, "guest created");
        } else {
            tracing::info!(code = %guest.code, name = %guest.name, ceremony, "guest updated by name");
        }
        Ok(outcome)
    }

    pub fn update_guest(&self, code: &str, changes: GuestChanges) -> Result<Guest> {
        let guest = self.mutate(
            |registry| registry.update(code, changes, now()),
            |conn, guest| save_guest(conn, guest).map(drop),
        )?;
        tracing::info!(code = %guest.code, name = %guest.name, ceremony = guest.ceremony, "guest edited");
        Ok(guest)
    }

    pub fn delete_guest(&self, code: &str) -> Result<()> {
        let guest = self.mutate(
            |registry| registry.delete(code),
            |conn, guest| {
                conn.transaction(|conn| {
                    diesel::delete(guests::table.find(&guest.code)).execute(conn)?;
                    diesel::insert_or_ignore_into(retired_codes::table)
                        .values(RetiredCode { code: &guest.code })
                        .execute(conn)
                        .map(drop)
                })
            },
        )?;
        tracing::info!(code = %guest.code, name = %guest.name, "guest deleted");
        Ok(())
    }

    #[must_use]
    pub fn guest(&self, code: &str) -> Option<Guest> {
        self.shared.state.read().registry.get(code).cloned()
    }

    /// Newest invitation first.
    #[must_use]
    pub fn guests(&self) -> Vec<Guest> {
        self.shared.state.read().registry.list()
    }

    /// Newest invitation first, narrowed to one category.
    #[must_use]
    pub fn guests_in(&self, category: Category) -> Vec<Guest> {
        stats::list_by_category(&self.guests(), category)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        stats::aggregate(self.shared.state.read().registry.guests())
    }

    pub fn submit_rsvp(&self, code: &str, submission: Submission) -> Result<Guest> {
        let guest = self.mutate(
            |registry| registry.submit_rsvp(code, submission, now()),
            |conn, guest| save_guest(conn, guest).map(drop),
        )?;
        tracing::info!(
            code = %guest.code,
            is_attending = submission.is_attending,
            guest_count = guest.rsvp.attending_count(),
            "rsvp recorded"
        );
        Ok(guest)
    }

    /// Counts a visit to an invitation page. `Ok(None)` for unknown codes.
    ///
    /// Only the database write can fail, so the counter is bumped in place
    /// once the row is written.
    pub fn record_view(&self, code: &str) -> Result<Option<Guest>> {
        let mut conn = self.shared.conn.lock();

        let Some(views) = self.shared.state.read().registry.get(code).map(|g| g.views) else {
            return Ok(None);
        };
        let views = views.saturating_add(1);
        diesel::update(guests::table.find(code))
            .set(guests::views.eq(i32::try_from(views).unwrap_or(i32::MAX)))
            .execute(&mut *conn)?;

        Ok(self.shared.state.write().registry.record_view(code))
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.shared.state.read().theme
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        let mut conn = self.shared.conn.lock();

        diesel::replace_into(settings::table)
            .values((settings::key.eq(THEME_KEY), settings::value.eq(theme.as_str())))
            .execute(&mut *conn)?;
        self.shared.state.write().theme = theme;
        tracing::info!(%theme, "theme changed");
        Ok(())
    }

    /// Opens the store named by [`AppConfig`] and hands it to Rocket.
    pub fn fairing() -> AdHoc {
        AdHoc::try_on_ignite("Guest Store", |rocket| async move { Self::ignite(rocket) })
    }

    fn ignite(rocket: Rocket<Build>) -> fairing::Result {
        let config: AppConfig = match rocket.figment().extract() {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(error = %err, "invalid configuration");
                return Err(rocket);
            }
        };
        if config.uses_default_password() {
            tracing::warn!("admin password is the default; set ROCKET_ADMIN_PASSWORD");
        }

        match Self::open(&config.database_url) {
            Ok(store) => Ok(rocket.manage(store)),
            Err(err) => {
                tracing::error!(database = %config.database_url, error = %err, "could not open guest store");
                Err(rocket)
            }
        }
    }
}
