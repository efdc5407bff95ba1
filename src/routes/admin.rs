use rocket::form::Form;
use rocket::http::{CookieJar, Status};
use rocket::response::Redirect;
use rocket::State;
use rocket_dyn_templates::{context, Template};
use strum::VariantArray;

use crate::auth::{self, Admin};
use crate::config::AppConfig;
use crate::routes::GuestView;
use crate::store::Store;
use crate::theme::Theme;

#[derive(FromForm)]
pub struct Login {
    password: String,
}

#[get("/admin")]
pub async fn login_page(admin: Option<Admin>) -> Result<Template, Redirect> {
    match admin {
        Some(_) => Err(Redirect::to(uri!(dashboard))),
        None => Ok(Template::render("admin_login", context! { error: Option::<&str>::None })),
    }
}

#[post("/admin", data = "<login>")]
pub async fn login(
    login: Form<Login>,
    cookies: &CookieJar<'_>,
    config: &State<AppConfig>,
) -> Result<Redirect, (Status, Template)> {
    if auth::password_matches(&login.password, &config.admin_password) {
        auth::log_in(cookies);
        tracing::info!("admin logged in");
        return Ok(Redirect::to(uri!(dashboard)));
    }

    tracing::warn!("failed admin login");
    Err((
        Status::Unauthorized,
        Template::render("admin_login", context! { error: "Wrong password, please try again" }),
    ))
}

#[get("/admin/logout")]
pub async fn logout(cookies: &CookieJar<'_>) -> Redirect {
    auth::log_out(cookies);
    Redirect::to(uri!(login_page))
}

#[get("/admin/dashboard")]
pub async fn dashboard(
    admin: Option<Admin>,
    store: &State<Store>,
    config: &State<AppConfig>,
) -> Result<Template, Redirect> {
    if admin.is_none() {
        return Err(Redirect::to(uri!(login_page)));
    }

    let guests: Vec<GuestView> = store
        .guests()
        .iter()
        .map(|guest| GuestView::new(guest, config))
        .collect();

    Ok(Template::render(
        "admin_dashboard",
        context! {
            guest_count: guests.len(),
            guests: guests,
            stats: store.stats(),
            theme: store.theme(),
            themes: Theme::VARIANTS,
            wedding: &config.wedding,
        },
    ))
}
