//! JSON endpoints used by the admin panel. All of them except the theme
//! lookup need an admin session.

use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::auth::Admin;
use crate::config::AppConfig;
use crate::error::Result;
use crate::export as csv_export;
use crate::registry::{AddOutcome, GuestChanges};
use crate::routes::GuestView;
use crate::stats::{Category, Stats};
use crate::store::Store;
use crate::theme::Theme;

#[derive(Debug, Deserialize)]
pub struct NewGuest {
    pub name: String,
    #[serde(default)]
    pub ceremony: bool,
}

#[derive(Debug, Serialize)]
pub struct GuestLink {
    pub code: String,
    pub name: String,
    pub url: String,
    pub ceremony: bool,
    /// True when the name was already on the list.
    pub updated: bool,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

const OK: Ack = Ack { ok: true };

/// 201 for a new invitation, 200 when an existing guest of the same name
/// was updated instead.
#[post("/api/guests", data = "<new_guest>")]
pub async fn create_guest(
    _admin: Admin,
    new_guest: Json<NewGuest>,
    store: &State<Store>,
    config: &State<AppConfig>,
) -> Result<(Status, Json<GuestLink>)> {
    let NewGuest { name, ceremony } = new_guest.into_inner();
    let outcome = store
        .run(move |store| store.add_guest(&name, ceremony))
        .await?;
    let status = match outcome {
        AddOutcome::Created(_) => Status::Created,
        AddOutcome::Updated(_) => Status::Ok,
    };
    let guest = outcome.guest();

    Ok((
        status,
        Json(GuestLink {
            code: guest.code.clone(),
            name: guest.name.clone(),
            url: config.invitation_url(&guest.invitation_path()),
            ceremony: guest.ceremony,
            updated: !outcome.is_created(),
        }),
    ))
}

#[patch("/api/guests/<code>", data = "<changes>")]
pub async fn update_guest(
    _admin: Admin,
    code: &str,
    changes: Json<GuestChanges>,
    store: &State<Store>,
) -> Result<Json<Ack>> {
    let code = code.to_owned();
    let changes = changes.into_inner();
    store
        .run(move |store| store.update_guest(&code, changes))
        .await?;
    Ok(Json(OK))
}

#[delete("/api/guests/<code>")]
pub async fn delete_guest(_admin: Admin, code: &str, store: &State<Store>) -> Result<Json<Ack>> {
    let code = code.to_owned();
    store.run(move |store| store.delete_guest(&code)).await?;
    Ok(Json(OK))
}

#[get("/api/guests?<category>")]
pub async fn list_guests(
    _admin: Admin,
    category: Option<&str>,
    store: &State<Store>,
    config: &State<AppConfig>,
) -> Result<Json<Vec<GuestView>>> {
    let guests = match category.map(str::parse::<Category>).transpose()? {
        Some(category) => store.guests_in(category),
        None => store.guests(),
    };

    Ok(Json(
        guests
            .iter()
            .map(|guest| GuestView::new(guest, config))
            .collect(),
    ))
}

#[get("/api/stats")]
pub async fn stats(_admin: Admin, store: &State<Store>) -> Json<Stats> {
    Json(store.stats())
}

#[derive(Responder)]
#[response(content_type = "text/csv")]
pub struct CsvFile {
    body: String,
    disposition: Header<'static>,
}

/// Defaults to the attending list, which is what the caterer needs.
#[get("/api/export?<category>")]
pub async fn export(_admin: Admin, category: Option<&str>, store: &State<Store>) -> Result<CsvFile> {
    let category = category
        .map(str::parse::<Category>)
        .transpose()?
        .unwrap_or(Category::Attending);
    let guests = store.guests_in(category);
    let body = csv_export::guests_csv(&guests)?;
    tracing::info!(%category, rows = guests.len(), "guest list exported");

    Ok(CsvFile {
        body,
        disposition: Header::new(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", csv_export::file_name(category)),
        ),
    })
}

#[derive(Debug, Serialize)]
pub struct ThemeInfo {
    pub theme: Theme,
    pub themes: &'static [Theme],
}

#[get("/api/theme")]
pub async fn theme(store: &State<Store>) -> Json<ThemeInfo> {
    Json(ThemeInfo {
        theme: store.theme(),
        themes: Theme::VARIANTS,
    })
}

#[derive(Debug, Deserialize)]
pub struct ThemeChoice {
    pub theme: String,
}

#[derive(Debug, Serialize)]
pub struct ThemeChanged {
    pub ok: bool,
    pub theme: Theme,
}

#[post("/api/theme", data = "<choice>")]
pub async fn set_theme(
    _admin: Admin,
    choice: Json<ThemeChoice>,
    store: &State<Store>,
) -> Result<Json<ThemeChanged>> {
    let theme: Theme = choice.theme.parse()?;
    store.run(move |store| store.set_theme(theme)).await?;
    Ok(Json(ThemeChanged { ok: true, theme }))
}
