//! HTTP surface: the public invitation pages, the admin panel and the JSON
//! API behind both.

use rocket::serde::json::Json;
use rocket::{Catcher, Request, Route};
use rocket_dyn_templates::{context, Template};
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::ErrorBody;
use crate::models::Guest;
use crate::stats::Category;

pub mod admin;
pub mod api;
pub mod invitation;

pub fn routes() -> Vec<Route> {
    routes![
        invitation::index,
        invitation::invitation,
        invitation::rsvp_context,
        invitation::rsvp_submit,
        admin::login_page,
        admin::login,
        admin::logout,
        admin::dashboard,
        api::create_guest,
        api::update_guest,
        api::delete_guest,
        api::list_guests,
        api::stats,
        api::export,
        api::theme,
        api::set_theme,
    ]
}

pub fn catchers() -> Vec<Catcher> {
    catchers![bad_request, unauthorized, not_found, unprocessable, internal_error]
}

/// A guest as shown in the admin table and returned by the list API.
#[derive(Debug, Serialize)]
pub struct GuestView {
    pub code: String,
    pub name: String,
    pub ceremony: bool,
    pub url: String,
    pub path: String,
    pub status: &'static str,
    pub guest_count: u32,
    pub views: u32,
    pub created_at: String,
}

impl GuestView {
    pub fn new(guest: &Guest, config: &AppConfig) -> Self {
        let status = if guest.rsvp.is_pending() {
            Category::Pending
        } else if guest.rsvp.is_attending() {
            Category::Attending
        } else {
            Category::NotAttending
        };
        let path = guest.invitation_path();

        Self {
            code: guest.code.clone(),
            name: guest.name.clone(),
            ceremony: guest.ceremony,
            url: config.invitation_url(&path),
            path,
            status: status.as_str(),
            guest_count: guest.rsvp.attending_count(),
            views: guest.views,
            created_at: guest.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[catch(400)]
fn bad_request() -> Json<ErrorBody> {
    Json(ErrorBody::new("malformed request"))
}

#[catch(401)]
fn unauthorized() -> Json<ErrorBody> {
    Json(ErrorBody::new("admin login required"))
}

#[catch(404)]
fn not_found(req: &Request<'_>) -> Template {
    tracing::debug!(uri = %req.uri(), "no such page");
    Template::render("not_found", context! {})
}

#[catch(422)]
fn unprocessable() -> Json<ErrorBody> {
    Json(ErrorBody::new("request body has the wrong shape"))
}

#[catch(500)]
fn internal_error() -> Json<ErrorBody> {
    Json(ErrorBody::new("internal server error"))
}
