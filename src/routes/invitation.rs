//! The guest-facing side. Knowing a code is all the access a guest needs.

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use rocket_dyn_templates::{context, Template};
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::models::RsvpResponse;
use crate::rsvp::{Submission, MAX_PARTY_SIZE};
use crate::store::Store;

/// Only personalised links lead anywhere.
#[get("/")]
pub async fn index() -> Status {
    Status::NotFound
}

#[get("/i/<code>")]
pub async fn invitation(
    code: &str,
    store: &State<Store>,
    config: &State<AppConfig>,
) -> (Status, Template) {
    let viewed = code.to_owned();
    let guest = match store.run(move |store| store.record_view(&viewed)).await {
        Ok(guest) => guest,
        Err(err) => {
            tracing::warn!(%code, error = %err, "could not count invitation view");
            store.guest(code)
        }
    };
    let Some(guest) = guest else {
        return (Status::NotFound, Template::render("not_found", context! {}));
    };

    let wedding = &config.wedding;
    let party_sizes: Vec<u32> = (1..=MAX_PARTY_SIZE).collect();
    let template = Template::render(
        "invitation",
        context! {
            code: &guest.code,
            name: &guest.name,
            ceremony: guest.ceremony,
            rsvp: guest.rsvp.response(),
            theme: store.theme(),
            wedding: wedding,
            invite_text: wedding.invite_text_rendered(),
            party_sizes: party_sizes,
        },
    );
    (Status::Ok, template)
}

/// What the invitation page needs to know about its guest.
#[derive(Debug, Serialize)]
pub struct RsvpContext {
    pub name: String,
    pub ceremony: bool,
    pub rsvp: Option<RsvpResponse>,
}

#[get("/api/rsvp/<code>")]
pub async fn rsvp_context(code: &str, store: &State<Store>) -> Result<Json<RsvpContext>> {
    let guest = store
        .guest(code)
        .ok_or_else(|| Error::GuestNotFound(code.to_string()))?;

    Ok(Json(RsvpContext {
        name: guest.name,
        ceremony: guest.ceremony,
        rsvp: guest.rsvp.response(),
    }))
}

#[derive(Debug, Serialize)]
pub struct RsvpReceipt {
    pub ok: bool,
    pub is_attending: bool,
    pub guest_count: u32,
    pub message: String,
}

#[post("/api/rsvp/<code>", data = "<submission>")]
pub async fn rsvp_submit(
    code: &str,
    submission: Json<Submission>,
    store: &State<Store>,
    config: &State<AppConfig>,
) -> Result<Json<RsvpReceipt>> {
    let code = code.to_owned();
    let submission = submission.into_inner();
    let guest = store
        .run(move |store| store.submit_rsvp(&code, submission))
        .await?;
    let is_attending = guest.rsvp.is_attending();
    let guest_count = guest.rsvp.attending_count();

    Ok(Json(RsvpReceipt {
        ok: true,
        is_attending,
        guest_count,
        message: config.wedding.rsvp_message(is_attending, guest_count),
    }))
}
