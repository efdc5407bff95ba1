//! Wedding invitations: a personal link for every guest, their replies, and
//! an admin panel that keeps count.

#[macro_use]
extern crate rocket;

pub mod auth;
pub mod code;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod registry;
pub mod routes;
pub mod rsvp;
pub mod schema;
pub mod stats;
pub mod store;
pub mod theme;

use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

use crate::config::AppConfig;
use crate::store::Store;

/// The service configured from `Rocket.toml` and `ROCKET_*` variables.
pub fn rocket() -> Rocket<Build> {
    build(rocket::Config::figment())
}

pub fn build(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .mount("/", routes::routes())
        .register("/", routes::catchers())
        .attach(Template::fairing())
        .attach(AdHoc::config::<AppConfig>())
        .attach(Store::fairing())
}
